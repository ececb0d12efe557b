//! Mapping from observation to child belief node.

use petgraph::graph::NodeIndex;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub(crate) struct ObservationMap<O: Eq + Hash>(HashMap<O, NodeIndex>);

impl<O: Eq + Hash> Default for ObservationMap<O> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<O: Eq + Hash> ObservationMap<O> {
    pub fn get(&self, observation: &O) -> Option<NodeIndex> {
        self.0.get(observation).copied()
    }

    pub fn insert(&mut self, observation: O, child: NodeIndex) {
        self.0.insert(observation, child);
    }

    /// Any child of this action node, used by observation-mismatch
    /// salvage when the real environment's observation was never seen
    /// during planning but a sibling belief is close enough to reuse.
    pub fn any(&self) -> Option<NodeIndex> {
        self.0.values().next().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All child indices, owned copies — used by `BeliefNode::children`
    /// for read-only tree navigation.
    pub fn clone_indices(&self) -> Vec<NodeIndex> {
        self.0.values().copied().collect()
    }

    /// Rewrite every child index in place after a `retain_nodes` pass,
    /// since `NodeIndex` values are not stable across a prune.
    /// `old_index_to_id` captures each surviving node's stable id *before*
    /// the reshuffle; `id_to_new_index` maps it back to its post-reshuffle
    /// index.
    pub fn relocate_by_id(&mut self, old_index_to_id: &HashMap<NodeIndex, u64>, id_to_new_index: &HashMap<u64, NodeIndex>) {
        for index in self.0.values_mut() {
            let id = old_index_to_id[index];
            *index = id_to_new_index[&id];
        }
    }
}
