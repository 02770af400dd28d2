use serde::{Deserialize, Serialize};

/// Frames that identify the in-process profiling harness.
///
/// A sample on `dispatch_frame` whose outermost non-root ancestor is
/// `entry_point` is the harness doing its own bookkeeping and is hidden
/// from the bottoms-up view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessFrames {
    pub dispatch_frame: String,
    pub entry_point: String,
}

impl Default for HarnessFrames {
    fn default() -> Self {
        Self {
            dispatch_frame: "dispatch".to_string(),
            entry_point: "onStreamRead".to_string(),
        }
    }
}

/// Parameters for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Function name of the synthetic session root.
    pub root_marker: String,
    /// Function name of the idle pseudo-frame.
    pub idle_marker: String,
    /// Display name for frames with an empty function name.
    pub anonymous_name: String,
    /// `None` disables harness suppression entirely.
    pub harness: Option<HarnessFrames>,
    /// Attach full caller chains to bottoms-up rows.
    pub include_callers: bool,
    /// Drop the harness's top-level frame from the flame view.
    pub strip_harness_frame: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            root_marker: "(root)".to_string(),
            idle_marker: "(idle)".to_string(),
            anonymous_name: "(anonymous)".to_string(),
            harness: Some(HarnessFrames::default()),
            include_callers: false,
            strip_harness_frame: true,
        }
    }
}

impl AnalysisConfig {
    pub fn with_callers(mut self, include_callers: bool) -> Self {
        self.include_callers = include_callers;
        self
    }

    pub fn without_harness(mut self) -> Self {
        self.harness = None;
        self
    }
}
