//! Merged flame tree.
//!
//! Every reduced sample first becomes its own root-to-leaf path. Paths are
//! then folded together in chronological order: a path can only join the
//! tree along its right edge, because anything it shares with an earlier
//! sample must have been the most recent thing on the stack.

use proftree_protocol::FlameView;
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::model::{
    FlameArena, FlameNodeId, ParentIndex, Profile, ProfileError, ReducedSample, display_name,
};

/// The merged flame tree, still in arena form.
#[derive(Debug, Clone)]
pub struct FlameTree {
    arena: FlameArena,
    roots: Vec<FlameNodeId>,
}

impl FlameTree {
    /// Top-level trees that could not be merged. A profile with one
    /// synthetic root yields exactly one.
    pub fn roots(&self) -> &[FlameNodeId] {
        &self.roots
    }

    /// Inclusive time of the first top-level tree.
    pub fn total_time(&self) -> f64 {
        self.roots
            .first()
            .map_or(0.0, |&root| self.arena.node(root).execution_time)
    }

    /// Convert the first top-level tree for presentation. Empty profiles
    /// give a childless root with zero time.
    pub fn to_view(&self, profile: &Profile, config: &AnalysisConfig) -> FlameView {
        match self.roots.first() {
            Some(&root) => self.view_of(root, profile, config),
            None => FlameView::empty(config.root_marker.clone()),
        }
    }

    /// Top-level trees after the first, in emission order.
    pub fn detached_views(&self, profile: &Profile, config: &AnalysisConfig) -> Vec<FlameView> {
        self.roots
            .iter()
            .skip(1)
            .map(|&root| self.view_of(root, profile, config))
            .collect()
    }

    fn view_of(&self, id: FlameNodeId, profile: &Profile, config: &AnalysisConfig) -> FlameView {
        let node = self.arena.node(id);
        let (name, node_module) = match profile.node(node.profile_node) {
            Some(pn) => (
                display_name(pn, &config.anonymous_name).to_string(),
                node_module_name(&pn.call_frame.url).map(str::to_string),
            ),
            None => (config.anonymous_name.clone(), None),
        };
        FlameView {
            name,
            execution_time: node.execution_time,
            self_time: node.self_time,
            node_id: node.profile_node,
            node_module,
            children: node
                .children
                .iter()
                .map(|&child| self.view_of(child, profile, config))
                .collect(),
        }
    }
}

/// Build one isolated path tree per reduced sample.
///
/// Each path runs from the sampled node up to the topmost linked ancestor.
/// Every frame on it is freshly allocated and carries the sample's
/// duration; only the leaf gets self time.
pub fn build_path_trees(
    arena: &mut FlameArena,
    parents: &ParentIndex<'_>,
    reduced: &[ReducedSample],
) -> Result<Vec<FlameNodeId>, ProfileError> {
    let mut tops = Vec::with_capacity(reduced.len());
    for sample in reduced {
        let path = parents.path_to_root(sample.node_id)?;
        let mut current = arena.alloc(sample.node_id, sample.duration, sample.duration);
        for &ancestor in &path[1..] {
            let wrapper = arena.alloc(ancestor, sample.duration, 0.0);
            arena.adopt(wrapper, current);
            current = wrapper;
        }
        tops.push(current);
    }
    Ok(tops)
}

/// Two frames can be joined when they wrap the same profile node and both
/// have children. Childless leaves were already collapsed by the reducer.
fn mergeable(arena: &FlameArena, a: FlameNodeId, b: FlameNodeId) -> bool {
    arena.node(a).profile_node == arena.node(b).profile_node
        && arena.has_children(a)
        && arena.has_children(b)
}

/// Fold chronologically ordered path trees into as few trees as possible.
///
/// Returns every top-level tree that could not be merged into its
/// predecessor, in order.
pub fn merge_path_trees(arena: &mut FlameArena, paths: &[FlameNodeId]) -> Vec<FlameNodeId> {
    let mut roots = Vec::new();
    let Some((&first, rest)) = paths.split_first() else {
        return roots;
    };

    let mut current = first;
    for &next in rest {
        if !mergeable(arena, current, next) {
            roots.push(current);
            current = next;
            continue;
        }

        // Walk down the right edge of `current` and the left edge of `next`
        // while they still describe the same stack.
        let mut target = current;
        let mut incoming = next;
        while let (Some(tail), Some(head)) = (arena.last_child(target), arena.first_child(incoming))
        {
            if !mergeable(arena, tail, head) {
                break;
            }
            target = tail;
            incoming = head;
        }

        let Some(appended) = arena.first_child(incoming) else {
            continue;
        };
        arena.adopt(target, appended);
        let added = arena.node(appended).execution_time;
        arena.add_time_upwards(target, added);
    }
    roots.push(current);
    roots
}

/// Build the merged flame tree for `reduced`.
pub fn build_flame_tree(
    parents: &ParentIndex<'_>,
    reduced: &[ReducedSample],
) -> Result<FlameTree, ProfileError> {
    let mut arena = FlameArena::with_capacity(reduced.len() * 8);
    let paths = build_path_trees(&mut arena, parents, reduced)?;
    let roots = merge_path_trees(&mut arena, &paths);
    arena.clear_parents();

    debug!(
        paths = paths.len(),
        frames = arena.len(),
        trees = roots.len(),
        "merged flame tree"
    );
    if roots.len() > 1 {
        warn!(
            trees = roots.len(),
            "flame paths did not merge into one tree, later trees are reported separately"
        );
    }

    Ok(FlameTree { arena, roots })
}

/// Package directory following the last `/node_modules/` in `url`.
pub fn node_module_name(url: &str) -> Option<&str> {
    const NODE_MODULES: &str = "/node_modules/";
    let start = url.rfind(NODE_MODULES)? + NODE_MODULES.len();
    let rest = &url[start..];
    let end = rest.find('/')?;
    Some(&rest[..end])
}
