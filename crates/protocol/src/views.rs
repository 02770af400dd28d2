use serde::{Deserialize, Serialize};

/// One node of the merged flame tree handed to presentation.
///
/// `execution_time` is inclusive of all descendants. `self_time` is the
/// time sampled directly on this call path, so for every node
/// `execution_time == self_time + sum(children.execution_time)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlameView {
    pub name: String,
    pub execution_time: f64,
    pub self_time: f64,
    /// Id of the profile node this frame was built from.
    pub node_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_module: Option<String>,
    #[serde(default)]
    pub children: Vec<FlameView>,
}

impl FlameView {
    /// Degenerate tree returned for profiles without samples.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            execution_time: 0.0,
            self_time: 0.0,
            node_id: 0,
            node_module: None,
            children: Vec::new(),
        }
    }

    /// Drop the first child when it is the profiler's own entry frame.
    ///
    /// A profile captured from inside the target process starts with the
    /// harness that requested it. Profiles from `--cpu-prof` or DevTools do
    /// not, and are left untouched. The root keeps its `execution_time`.
    pub fn strip_harness_frame(&mut self, entry_point: &str) -> bool {
        let is_harness = self
            .children
            .first()
            .is_some_and(|first| first.name == entry_point);
        if is_harness {
            self.children.remove(0);
        }
        is_harness
    }

    /// Number of frames in this subtree, including `self`.
    pub fn frame_count(&self) -> usize {
        1 + self.children.iter().map(FlameView::frame_count).sum::<usize>()
    }
}

/// One caller in a bottoms-up caller chain. `depth` 0 is a direct caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerFrame {
    pub name: String,
    pub depth: usize,
}

/// A single row of the bottoms-up table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BottomsUpRow {
    pub function_name: String,
    /// The sampled node this row aggregates.
    pub node_id: u64,
    pub total_time: f64,
    /// `url:line:column`, empty when the frame has no script.
    pub source_location: String,
    /// Distinct callee names in first-occurrence order.
    pub immediate_children: Vec<String>,
    /// Full caller chain, only populated in verbose mode.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub callers: Vec<CallerFrame>,
}
