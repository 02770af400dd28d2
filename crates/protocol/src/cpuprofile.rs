use serde::{Deserialize, Serialize};

/// V8 CPU profile as produced by `Profiler.stop` / `--cpu-prof`.
///
/// Only `nodes`, `samples` and `timeDeltas` drive the analysis. Timestamps
/// are carried through when present but never required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuProfile {
    pub nodes: Vec<ProfileNode>,
    pub samples: Vec<u64>,
    /// Microseconds attributed to the sample at the same index.
    pub time_deltas: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

/// One call-graph node. Nodes only know their children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileNode {
    pub id: u64,
    pub call_frame: CallFrame,
    #[serde(default)]
    pub children: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    /// Empty for anonymous functions.
    #[serde(default)]
    pub function_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_id: Option<String>,
    #[serde(default)]
    pub url: String,
    /// 0-indexed, `-1` when unknown.
    #[serde(default)]
    pub line_number: i64,
    /// 0-indexed, `-1` when unknown.
    #[serde(default)]
    pub column_number: i64,
}

impl CallFrame {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            script_id: None,
            url: String::new(),
            line_number: -1,
            column_number: -1,
        }
    }
}
