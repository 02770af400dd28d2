pub mod bottoms_up;
pub mod flame;
pub mod text;

pub use bottoms_up::{BottomsUpEntry, bottoms_up, rank_samples};
pub use flame::{FlameTree, build_flame_tree, node_module_name};
pub use text::{render_bottoms_up_text, render_flame_text};
