use std::collections::HashSet;

use proftree_protocol::{BottomsUpRow, ProfileNode, source_location};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::model::{
    ParentIndex, Profile, ProfileError, ReducedSample, display_name, flatten_samples,
};

/// Time attributed to one sampled node.
#[derive(Debug, Clone, Copy)]
pub struct BottomsUpEntry<'p> {
    pub node: &'p ProfileNode,
    pub total_time: f64,
}

/// One entry per distinct sampled node id, heaviest first.
///
/// Nodes are never merged by function name: two call sites of the same
/// function are two entries. Equal times keep discovery order.
pub fn rank_samples<'p>(profile: &'p Profile, reduced: &[ReducedSample]) -> Vec<BottomsUpEntry<'p>> {
    let mut entries: Vec<BottomsUpEntry<'p>> = flatten_samples(reduced)
        .into_iter()
        .filter_map(|sample| {
            profile.node(sample.node_id).map(|node| BottomsUpEntry {
                node,
                total_time: sample.duration,
            })
        })
        .collect();
    entries.sort_by(|a, b| b.total_time.total_cmp(&a.total_time));
    entries
}

/// Whether `node` is the harness's dispatch frame running under the
/// harness's own entry point.
pub fn is_harness_frame(
    parents: &ParentIndex<'_>,
    node: &ProfileNode,
    config: &AnalysisConfig,
) -> Result<bool, ProfileError> {
    let Some(harness) = &config.harness else {
        return Ok(false);
    };
    if node.call_frame.function_name != harness.dispatch_frame {
        return Ok(false);
    }
    let root = parents.find_root(node.id)?;
    Ok(root.is_some_and(|root| root.call_frame.function_name == harness.entry_point))
}

/// Build the ranked bottoms-up table.
pub fn bottoms_up(
    profile: &Profile,
    parents: &ParentIndex<'_>,
    reduced: &[ReducedSample],
    config: &AnalysisConfig,
) -> Result<Vec<BottomsUpRow>, ProfileError> {
    let entries = rank_samples(profile, reduced);
    let mut rows = Vec::with_capacity(entries.len());
    let mut suppressed = 0usize;

    for BottomsUpEntry { node, total_time } in entries {
        if node.call_frame.function_name == config.idle_marker {
            continue;
        }
        if is_harness_frame(parents, node, config)? {
            suppressed += 1;
            continue;
        }

        let callers = if config.include_callers {
            parents.caller_chain(node.id, &config.anonymous_name)?
        } else {
            Vec::new()
        };

        rows.push(BottomsUpRow {
            function_name: display_name(node, &config.anonymous_name).to_string(),
            node_id: node.id,
            total_time,
            source_location: source_location(&node.call_frame),
            immediate_children: immediate_children(profile, node, &config.anonymous_name),
            callers,
        });
    }

    debug!(rows = rows.len(), suppressed, "built bottoms-up view");
    Ok(rows)
}

/// Distinct child names, deduplicated by child id.
fn immediate_children(profile: &Profile, node: &ProfileNode, anonymous: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    node.children
        .iter()
        .filter(|&&id| seen.insert(id))
        .filter_map(|&id| profile.node(id))
        .map(|child| display_name(child, anonymous).to_string())
        .collect()
}
