pub mod call_tree;
pub mod parents;
pub mod profile;
pub mod samples;

pub use call_tree::{FlameArena, FlameNode, FlameNodeId};
pub use parents::ParentIndex;
pub use profile::{Profile, ProfileError, display_name};
pub use samples::{ReducedSample, flatten_samples, reduce_samples};
