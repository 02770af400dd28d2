//! Flame tree and bottoms-up analysis of V8 CPU profiles.
//!
//! ```text
//!   .cpuprofile ──▶ Profile ──▶ reduce_samples ─┬─▶ flame paths ──▶ merge ──▶ FlameView
//!                     │                         │
//!                     └──▶ ParentIndex ─────────┴─▶ bottoms-up ranking ──▶ BottomsUpRow[]
//! ```
//!
//! Everything here is synchronous and allocation-bound. One `Profile` is
//! analysed per call and nothing is shared between calls.

pub mod config;
pub mod model;
pub mod parsers;
pub mod views;

use proftree_protocol::{BottomsUpRow, FlameView};
use serde::Serialize;
use tracing::debug;

pub use config::{AnalysisConfig, HarnessFrames};
pub use model::{Profile, ProfileError};

/// Both views of one profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// The merged flame tree. The harness frame is still present.
    pub flame: FlameView,
    /// Top-level trees after the first that the merge could not join to it,
    /// in chronological order. Empty for a profile with one root.
    pub detached_trees: Vec<FlameView>,
    pub bottoms_up: Vec<BottomsUpRow>,
    /// Sum of every time delta in the profile (µs).
    pub total_time: f64,
}

impl Analysis {
    /// The flame tree as it should be presented. When configured, a leading
    /// frame named after the harness entry point is removed.
    pub fn flame_for_display(&self, config: &AnalysisConfig) -> FlameView {
        let mut flame = self.flame.clone();
        if config.strip_harness_frame
            && let Some(harness) = &config.harness
            && flame.strip_harness_frame(&harness.entry_point)
        {
            debug!(entry_point = %harness.entry_point, "stripped harness frame");
        }
        flame
    }
}

/// Run both views over `profile`.
pub fn analyze(profile: &Profile, config: &AnalysisConfig) -> Result<Analysis, ProfileError> {
    let parents = model::ParentIndex::new(profile, &config.root_marker);
    let reduced = model::reduce_samples(profile.samples(), profile.time_deltas());
    debug!(
        raw = profile.samples().len(),
        reduced = reduced.len(),
        "reduced samples"
    );

    let tree = views::build_flame_tree(&parents, &reduced)?;
    let bottoms_up = views::bottoms_up(profile, &parents, &reduced, config)?;

    Ok(Analysis {
        flame: tree.to_view(profile, config),
        detached_trees: tree.detached_views(profile, config),
        bottoms_up,
        total_time: profile.total_time(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::profile::test_support::profile;

    const NODES: &[(u64, &str, &[u64])] = &[
        (1, "(root)", &[2, 3, 6]),
        (2, "onStreamRead", &[5]),
        (3, "main", &[4]),
        (4, "work", &[]),
        (5, "dispatch", &[]),
        (6, "(idle)", &[]),
    ];

    #[test]
    fn analyzes_both_views() {
        let p = profile(NODES, &[5, 4, 4, 6, 4], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let analysis = analyze(&p, &AnalysisConfig::default()).unwrap();

        assert_eq!(analysis.total_time, 15.0);
        assert_eq!(analysis.flame.execution_time, 15.0);
        assert!(analysis.detached_trees.is_empty());

        let names: Vec<_> = analysis
            .bottoms_up
            .iter()
            .map(|r| r.function_name.as_str())
            .collect();
        assert_eq!(names, vec!["work"]);
        assert_eq!(analysis.bottoms_up[0].total_time, 10.0);

        let shown = analysis.flame_for_display(&AnalysisConfig::default());
        let top: Vec<_> = shown.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(top, vec!["main", "(idle)", "main"]);
    }

    #[test]
    fn display_keeps_first_frame_without_harness() {
        let nodes: &[(u64, &str, &[u64])] =
            &[(1, "(root)", &[2, 3]), (2, "main", &[]), (3, "(idle)", &[])];
        let p = profile(nodes, &[2, 3], &[10.0, 5.0]);
        let config = AnalysisConfig::default();
        let analysis = analyze(&p, &config).unwrap();

        let shown = analysis.flame_for_display(&config);
        let names: Vec<_> = shown.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["main", "(idle)"]);
        assert_eq!(shown.children[0].execution_time, 10.0);

        let no_harness = AnalysisConfig::default().without_harness();
        let p = profile(NODES, &[5, 4], &[1.0, 2.0]);
        let analysis = analyze(&p, &no_harness).unwrap();
        let shown = analysis.flame_for_display(&no_harness);
        assert_eq!(shown.children[0].name, "onStreamRead");
    }

    #[test]
    fn samples_on_the_root_keep_their_time() {
        let p = profile(NODES, &[4, 1, 4], &[1.0, 2.0, 3.0]);
        let analysis = analyze(&p, &AnalysisConfig::default()).unwrap();

        assert_eq!(analysis.flame.execution_time, 1.0);
        assert_eq!(analysis.detached_trees.len(), 2);
        assert_eq!(analysis.detached_trees[0].name, "(root)");
        assert_eq!(analysis.detached_trees[0].self_time, 2.0);
        let flame_total: f64 = std::iter::once(&analysis.flame)
            .chain(&analysis.detached_trees)
            .map(|t| t.execution_time)
            .sum();
        assert_eq!(flame_total, analysis.total_time);
    }

    #[test]
    fn empty_profile_is_not_an_error() {
        let p = profile(NODES, &[], &[]);
        let analysis = analyze(&p, &AnalysisConfig::default()).unwrap();
        assert!(analysis.bottoms_up.is_empty());
        assert_eq!(analysis.flame.execution_time, 0.0);
        assert!(analysis.detached_trees.is_empty());
    }

    #[test]
    fn serializes_for_presentation() {
        let p = profile(NODES, &[4], &[3.0]);
        let analysis = analyze(&p, &AnalysisConfig::default()).unwrap();
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["flame"]["executionTime"], 3.0);
        assert_eq!(json["bottomsUp"][0]["functionName"], "work");
    }
}
