use std::collections::{HashMap, HashSet};

use proftree_protocol::{CallerFrame, ProfileNode};
use tracing::warn;

use super::profile::{Profile, ProfileError, display_name};

/// Reverse index over a children-only call graph.
///
/// Built once per analysis run. Children that reference ids missing from
/// the node set are dropped here, so upward walks never see them.
#[derive(Debug)]
pub struct ParentIndex<'p> {
    profile: &'p Profile,
    parents: HashMap<u64, Vec<u64>>,
    root_marker: &'p str,
}

impl<'p> ParentIndex<'p> {
    pub fn new(profile: &'p Profile, root_marker: &'p str) -> Self {
        let mut parents: HashMap<u64, Vec<u64>> = HashMap::new();
        for node in profile.nodes() {
            for &child_id in &node.children {
                if profile.node(child_id).is_none() {
                    warn!(
                        parent = node.id,
                        child = child_id,
                        "child id not in node set, excluded from parent walks"
                    );
                    continue;
                }
                let entry = parents.entry(child_id).or_default();
                if !entry.contains(&node.id) {
                    entry.push(node.id);
                }
            }
        }
        Self {
            profile,
            parents,
            root_marker,
        }
    }

    /// Every node listing `id` as a child, in node order.
    pub fn direct_parents(&self, id: u64) -> &[u64] {
        self.parents.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// The linked parent used for flame paths. The synthetic root counts.
    ///
    /// When several nodes list `id` as a child, the last one in node order
    /// is linked. `find_root` instead follows the first.
    pub fn parent(&self, id: u64) -> Option<u64> {
        self.direct_parents(id).last().copied()
    }

    /// Direct parents, skipping the synthetic root.
    pub fn find_parents(&self, id: u64) -> impl Iterator<Item = &'p ProfileNode> + '_ {
        self.direct_parents(id)
            .iter()
            .filter_map(|&pid| self.profile.node(pid))
            .filter(|node| node.call_frame.function_name != self.root_marker)
    }

    /// `[id, parent, grandparent, ..]` up to the node without a parent.
    pub fn path_to_root(&self, id: u64) -> Result<Vec<u64>, ProfileError> {
        let mut path = vec![id];
        let mut seen = HashSet::from([id]);
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if !seen.insert(parent) {
                return Err(ProfileError::ParentCycle(id));
            }
            path.push(parent);
            current = parent;
        }
        Ok(path)
    }

    /// Highest ancestor of `id` below the synthetic root, or the node
    /// itself. `None` when `id` is not in the profile.
    pub fn find_root(&self, id: u64) -> Result<Option<&'p ProfileNode>, ProfileError> {
        let Some(mut current) = self.profile.node(id) else {
            return Ok(None);
        };
        let mut seen = HashSet::from([id]);
        while let Some(parent) = self.find_parents(current.id).next() {
            if !seen.insert(parent.id) {
                return Err(ProfileError::ParentCycle(id));
            }
            current = parent;
        }
        Ok(Some(current))
    }

    /// Every caller of `id` up to the root, depth-first. A node with several
    /// parents contributes each branch in turn.
    pub fn caller_chain(
        &self,
        id: u64,
        anonymous: &str,
    ) -> Result<Vec<CallerFrame>, ProfileError> {
        let mut chain = Vec::new();
        let mut path = vec![id];
        self.collect_callers(id, anonymous, &mut path, &mut chain)?;
        Ok(chain)
    }

    fn collect_callers(
        &self,
        id: u64,
        anonymous: &str,
        path: &mut Vec<u64>,
        chain: &mut Vec<CallerFrame>,
    ) -> Result<(), ProfileError> {
        for parent in self.find_parents(id) {
            if path.contains(&parent.id) {
                return Err(ProfileError::ParentCycle(path[0]));
            }
            chain.push(CallerFrame {
                name: display_name(parent, anonymous).to_string(),
                depth: path.len() - 1,
            });
            path.push(parent.id);
            self.collect_callers(parent.id, anonymous, path, chain)?;
            path.pop();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::profile::test_support::profile;

    const TREE: &[(u64, &str, &[u64])] = &[
        (1, "(root)", &[2, 5]),
        (2, "main", &[3]),
        (3, "run", &[4]),
        (4, "work", &[]),
        (5, "(idle)", &[]),
    ];

    #[test]
    fn parents_skip_synthetic_root() {
        let p = profile(TREE, &[], &[]);
        let index = ParentIndex::new(&p, "(root)");
        assert_eq!(index.direct_parents(2), &[1]);
        assert_eq!(index.parent(2), Some(1));
        assert_eq!(index.find_parents(2).count(), 0);
        let names: Vec<_> = index
            .find_parents(4)
            .map(|n| n.call_frame.function_name.as_str())
            .collect();
        assert_eq!(names, vec!["run"]);
    }

    #[test]
    fn path_runs_up_to_root() {
        let p = profile(TREE, &[], &[]);
        let index = ParentIndex::new(&p, "(root)");
        assert_eq!(index.path_to_root(4).unwrap(), vec![4, 3, 2, 1]);
        assert_eq!(index.path_to_root(1).unwrap(), vec![1]);
    }

    #[test]
    fn root_is_highest_non_synthetic_ancestor() {
        let p = profile(TREE, &[], &[]);
        let index = ParentIndex::new(&p, "(root)");
        assert_eq!(index.find_root(4).unwrap().unwrap().id, 2);
        assert_eq!(index.find_root(2).unwrap().unwrap().id, 2);
        assert!(index.find_root(42).unwrap().is_none());
    }

    #[test]
    fn unknown_children_are_ignored() {
        let nodes: &[(u64, &str, &[u64])] = &[(1, "(root)", &[2, 99]), (2, "main", &[])];
        let p = profile(nodes, &[], &[]);
        let index = ParentIndex::new(&p, "(root)");
        assert!(index.direct_parents(99).is_empty());
        assert_eq!(index.path_to_root(2).unwrap(), vec![2, 1]);
    }

    #[test]
    fn cycles_are_reported() {
        let nodes: &[(u64, &str, &[u64])] = &[(1, "a", &[2]), (2, "b", &[1])];
        let p = profile(nodes, &[], &[]);
        let index = ParentIndex::new(&p, "(root)");
        assert_eq!(index.path_to_root(1), Err(ProfileError::ParentCycle(1)));
        assert_eq!(index.find_root(1), Err(ProfileError::ParentCycle(1)));
        assert_eq!(
            index.caller_chain(2, "(anonymous)"),
            Err(ProfileError::ParentCycle(2))
        );
    }

    #[test]
    fn shared_child_links_last_parent_but_roots_through_first() {
        let nodes: &[(u64, &str, &[u64])] = &[
            (1, "(root)", &[2, 3]),
            (2, "left", &[4]),
            (3, "right", &[4]),
            (4, "shared", &[]),
        ];
        let p = profile(nodes, &[], &[]);
        let index = ParentIndex::new(&p, "(root)");
        assert_eq!(index.direct_parents(4), &[2, 3]);
        assert_eq!(index.path_to_root(4).unwrap(), vec![4, 3, 1]);
        assert_eq!(index.find_root(4).unwrap().unwrap().id, 2);

        let callers: Vec<_> = index
            .caller_chain(4, "(anonymous)")
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(callers, vec!["left", "right"]);
    }

    #[test]
    fn caller_chain_tracks_depth() {
        let p = profile(TREE, &[], &[]);
        let index = ParentIndex::new(&p, "(root)");
        let chain = index.caller_chain(4, "(anonymous)").unwrap();
        assert_eq!(
            chain,
            vec![
                CallerFrame {
                    name: "run".into(),
                    depth: 0
                },
                CallerFrame {
                    name: "main".into(),
                    depth: 1
                },
            ]
        );
        assert!(index.caller_chain(2, "(anonymous)").unwrap().is_empty());
    }
}
