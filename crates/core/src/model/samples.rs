/// A maximal run of identical consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReducedSample {
    pub node_id: u64,
    /// Summed time deltas of the run (µs).
    pub duration: f64,
}

/// Collapse adjacent equal sample ids, summing their deltas.
///
/// Non-adjacent runs of the same id stay separate entries, in order of
/// first appearance. Extra trailing entries in the longer slice are ignored.
pub fn reduce_samples(samples: &[u64], time_deltas: &[f64]) -> Vec<ReducedSample> {
    let mut reduced: Vec<ReducedSample> = Vec::new();
    for (&node_id, &delta) in samples.iter().zip(time_deltas) {
        match reduced.last_mut() {
            Some(last) if last.node_id == node_id => last.duration += delta,
            _ => reduced.push(ReducedSample {
                node_id,
                duration: delta,
            }),
        }
    }
    reduced
}

/// Merge samples by node id regardless of adjacency, keeping the order in
/// which each id first appears.
pub fn flatten_samples(samples: &[ReducedSample]) -> Vec<ReducedSample> {
    let mut position = std::collections::HashMap::<u64, usize>::new();
    let mut flattened: Vec<ReducedSample> = Vec::new();
    for sample in samples {
        match position.get(&sample.node_id) {
            Some(&i) => flattened[i].duration += sample.duration,
            None => {
                position.insert(sample.node_id, flattened.len());
                flattened.push(*sample);
            }
        }
    }
    flattened
}
