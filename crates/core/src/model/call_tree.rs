/// Index of a node inside a [`FlameArena`].
pub type FlameNodeId = usize;

/// One frame of a flame tree under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FlameNode {
    /// Id of the profile node this frame wraps.
    pub profile_node: u64,
    /// Inclusive of descendants.
    pub execution_time: f64,
    /// Time sampled directly on this frame before merging.
    pub self_time: f64,
    /// Chronological order.
    pub children: Vec<FlameNodeId>,
    /// Only meaningful while merging.
    parent: Option<FlameNodeId>,
}

/// Flat storage for flame frames. Merging relinks indices instead of
/// copying subtrees.
#[derive(Debug, Clone, Default)]
pub struct FlameArena {
    nodes: Vec<FlameNode>,
}

impl FlameArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub fn alloc(&mut self, profile_node: u64, execution_time: f64, self_time: f64) -> FlameNodeId {
        let id = self.nodes.len();
        self.nodes.push(FlameNode {
            profile_node,
            execution_time,
            self_time,
            children: Vec::new(),
            parent: None,
        });
        id
    }

    pub fn node(&self, id: FlameNodeId) -> &FlameNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: FlameNodeId) -> Option<FlameNodeId> {
        self.nodes[id].parent
    }

    pub fn first_child(&self, id: FlameNodeId) -> Option<FlameNodeId> {
        self.nodes[id].children.first().copied()
    }

    pub fn last_child(&self, id: FlameNodeId) -> Option<FlameNodeId> {
        self.nodes[id].children.last().copied()
    }

    pub fn has_children(&self, id: FlameNodeId) -> bool {
        !self.nodes[id].children.is_empty()
    }

    /// Append `child` as the last child of `parent`. Times are not touched.
    pub fn adopt(&mut self, parent: FlameNodeId, child: FlameNodeId) {
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
    }

    /// Add `time` to `from` and every ancestor above it.
    pub fn add_time_upwards(&mut self, from: FlameNodeId, time: f64) {
        let mut current = Some(from);
        while let Some(id) = current {
            self.nodes[id].execution_time += time;
            current = self.nodes[id].parent;
        }
    }

    /// Forget parent links once the tree is final.
    pub fn clear_parents(&mut self) {
        for node in &mut self.nodes {
            node.parent = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adopt_links_both_ways() {
        let mut arena = FlameArena::new();
        let root = arena.alloc(1, 0.0, 0.0);
        let a = arena.alloc(2, 5.0, 5.0);
        let b = arena.alloc(3, 2.0, 2.0);
        arena.adopt(root, a);
        arena.adopt(root, b);

        assert_eq!(arena.first_child(root), Some(a));
        assert_eq!(arena.last_child(root), Some(b));
        assert_eq!(arena.parent(b), Some(root));
        assert!(!arena.has_children(a));
    }

    #[test]
    fn time_propagates_to_every_ancestor() {
        let mut arena = FlameArena::new();
        let root = arena.alloc(1, 4.0, 0.0);
        let mid = arena.alloc(2, 4.0, 0.0);
        let leaf = arena.alloc(3, 4.0, 4.0);
        arena.adopt(root, mid);
        arena.adopt(mid, leaf);

        arena.add_time_upwards(mid, 3.0);
        assert_eq!(arena.node(root).execution_time, 7.0);
        assert_eq!(arena.node(mid).execution_time, 7.0);
        assert_eq!(arena.node(leaf).execution_time, 4.0);

        arena.clear_parents();
        assert_eq!(arena.parent(leaf), None);
        assert_eq!(arena.node(root).children, vec![mid]);
    }
}
