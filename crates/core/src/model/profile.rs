use std::collections::HashMap;

use proftree_protocol::{CpuProfile, ProfileNode};
use thiserror::Error;
use tracing::debug;

/// Every variant is a malformed input. Analysis of that profile stops.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("malformed profile: {samples} samples but {time_deltas} time deltas")]
    SampleCountMismatch { samples: usize, time_deltas: usize },
    #[error("malformed profile: sample {index} references unknown node {node_id}")]
    UnknownSampleNode { index: usize, node_id: u64 },
    #[error("malformed profile: node id {0} appears more than once")]
    DuplicateNodeId(u64),
    #[error("malformed profile: parent chain of node {0} contains a cycle")]
    ParentCycle(u64),
}

/// A validated CPU profile: unique node ids, one delta per sample, and
/// every sample resolving to a node.
#[derive(Debug, Clone)]
pub struct Profile {
    nodes: Vec<ProfileNode>,
    index: HashMap<u64, usize>,
    samples: Vec<u64>,
    time_deltas: Vec<f64>,
}

impl Profile {
    pub fn new(raw: CpuProfile) -> Result<Self, ProfileError> {
        let CpuProfile {
            nodes,
            samples,
            time_deltas,
            ..
        } = raw;

        if samples.len() != time_deltas.len() {
            return Err(ProfileError::SampleCountMismatch {
                samples: samples.len(),
                time_deltas: time_deltas.len(),
            });
        }

        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id, i).is_some() {
                return Err(ProfileError::DuplicateNodeId(node.id));
            }
        }

        if let Some((i, &node_id)) = samples
            .iter()
            .enumerate()
            .find(|(_, id)| !index.contains_key(*id))
        {
            return Err(ProfileError::UnknownSampleNode { index: i, node_id });
        }

        debug!(
            nodes = nodes.len(),
            samples = samples.len(),
            "validated cpu profile"
        );

        Ok(Self {
            nodes,
            index,
            samples,
            time_deltas,
        })
    }

    pub fn nodes(&self) -> &[ProfileNode] {
        &self.nodes
    }

    pub fn node(&self, id: u64) -> Option<&ProfileNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn samples(&self) -> &[u64] {
        &self.samples
    }

    pub fn time_deltas(&self) -> &[f64] {
        &self.time_deltas
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sum of all time deltas (µs).
    pub fn total_time(&self) -> f64 {
        self.time_deltas.iter().sum()
    }
}

impl TryFrom<CpuProfile> for Profile {
    type Error = ProfileError;

    fn try_from(raw: CpuProfile) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

/// Function name for display, substituting `anonymous` for empty names.
pub fn display_name<'a>(node: &'a ProfileNode, anonymous: &'a str) -> &'a str {
    if node.call_frame.function_name.is_empty() {
        anonymous
    } else {
        &node.call_frame.function_name
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::raw_profile;
    use super::*;

    const NODES: &[(u64, &str, &[u64])] = &[(1, "(root)", &[2]), (2, "main", &[])];

    #[test]
    fn rejects_length_mismatch() {
        let err = Profile::new(raw_profile(NODES, &[2, 2], &[1.0])).unwrap_err();
        assert_eq!(
            err,
            ProfileError::SampleCountMismatch {
                samples: 2,
                time_deltas: 1
            }
        );
    }

    #[test]
    fn rejects_unknown_sample() {
        let err = Profile::new(raw_profile(NODES, &[2, 9], &[1.0, 1.0])).unwrap_err();
        assert_eq!(
            err,
            ProfileError::UnknownSampleNode {
                index: 1,
                node_id: 9
            }
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let nodes: &[(u64, &str, &[u64])] = &[(1, "(root)", &[]), (1, "main", &[])];
        let err = Profile::new(raw_profile(nodes, &[], &[])).unwrap_err();
        assert_eq!(err, ProfileError::DuplicateNodeId(1));
    }

    #[test]
    fn empty_samples_are_valid() {
        let profile = Profile::new(raw_profile(NODES, &[], &[])).unwrap();
        assert!(profile.is_empty());
        assert_eq!(profile.total_time(), 0.0);
    }

    #[test]
    fn looks_up_nodes_by_id() {
        let profile = Profile::new(raw_profile(NODES, &[2], &[4.0])).unwrap();
        assert_eq!(profile.node(2).unwrap().call_frame.function_name, "main");
        assert!(profile.node(3).is_none());
        assert_eq!(profile.total_time(), 4.0);
    }

    #[test]
    fn anonymous_display_name() {
        let profile = Profile::new(raw_profile(&[(1, "", &[])], &[], &[])).unwrap();
        let node = profile.node(1).unwrap();
        assert_eq!(display_name(node, "(anonymous)"), "(anonymous)");
    }
}
