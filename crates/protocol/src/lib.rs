pub mod cpuprofile;
pub mod format;
pub mod views;

pub use cpuprofile::{CallFrame, CpuProfile, ProfileNode};
pub use format::{format_time, source_location};
pub use views::{BottomsUpRow, CallerFrame, FlameView};
