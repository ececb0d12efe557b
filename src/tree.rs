//! Belief tree: root ownership, node allocation, pruning. Nodes live in a
//! `petgraph::graph::DiGraph` keyed by `NodeIndex`; parent links and
//! observation-map child links are plain fields on
//! [`crate::node::BeliefNodeData`], never graph edges — the graph here is
//! used purely as a stable-index arena.

use crate::action_map::ActionMap;
use crate::config::Config;
use crate::model::Model;
use crate::node::{BeliefNode, BeliefNodeData};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

pub struct BeliefTree<M: Model> {
    graph: DiGraph<BeliefNodeData<M>, ()>,
    root: NodeIndex,
    next_id: u64,
}

impl<M: Model> BeliefTree<M> {
    /// Fresh root: `num_start_states` particles from the model's
    /// initial-state distribution, no history.
    pub fn new(model: &mut M, config: &Config) -> Self {
        let particles = (0..config.num_start_states)
            .map(|_| model.sample_initial_state())
            .collect();
        let mut graph = DiGraph::new();
        let root = graph.add_node(BeliefNodeData::root(0, particles, model.root_info()));
        Self { graph, root, next_id: 1 }
    }

    pub fn root_index(&self) -> NodeIndex {
        self.root
    }

    pub fn root(&self) -> BeliefNode<'_, M> {
        BeliefNode::new(self.root, &self.graph)
    }

    /// Total live nodes in the arena. After `prune_siblings`, this must
    /// equal the count of nodes reachable from the new root.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub(crate) fn data(&self, index: NodeIndex) -> &BeliefNodeData<M> {
        self.graph
            .node_weight(index)
            .expect("belief node indices are only handed out for live nodes")
    }

    pub(crate) fn data_mut(&mut self, index: NodeIndex) -> &mut BeliefNodeData<M> {
        self.graph
            .node_weight_mut(index)
            .expect("belief node indices are only handed out for live nodes")
    }

    pub(crate) fn action_map_mut(&mut self, index: NodeIndex) -> &mut ActionMap<M::Action, M::Observation> {
        self.data_mut(index).action_map_mut()
    }

    /// Look up an existing child reached from `parent` via `(bin_number,
    /// observation)`, if the tree has seen that edge before.
    pub(crate) fn get_child(&mut self, parent: NodeIndex, bin_number: u32, action: M::Action, observation: &M::Observation) -> Option<NodeIndex> {
        self.data_mut(parent)
            .action_map_mut()
            .ensure(action, bin_number)
            .children()
            .get(observation)
    }

    /// Create a new frontier node under `parent` for `(bin_number,
    /// observation)` — the first-visit expansion of a previously unseen
    /// edge. Registers the child in the parent's observation map.
    pub(crate) fn create_child(
        &mut self,
        parent: NodeIndex,
        bin_number: u32,
        action: M::Action,
        observation: M::Observation,
        info: M::Info,
    ) -> NodeIndex {
        let depth = self.data(parent).depth() + 1;
        let id = self.next_id;
        self.next_id += 1;
        let child_data = BeliefNodeData::child(id, depth, Vec::new(), info, action, observation.clone(), parent);
        let child = self.graph.add_node(child_data);
        self.data_mut(parent)
            .action_map_mut()
            .ensure(action, bin_number)
            .children_mut()
            .insert(observation, child);
        child
    }

    /// `prune_siblings(keep)`: destroy every node except the subtree
    /// rooted at `keep`, then reroot at `keep`. Implemented via
    /// `petgraph::Graph::retain_nodes` plus an id-keyed remap, since
    /// `retain_nodes` reshuffles `NodeIndex` values for surviving nodes
    /// and our own parent/child links inside node data are plain
    /// `NodeIndex` fields the graph knows nothing about.
    pub fn prune_siblings(&mut self, keep: NodeIndex) {
        let keep_id = self.data(keep).id();

        let mut reachable_ids = std::collections::HashSet::new();
        let mut old_index_to_id = HashMap::new();
        for index in self.graph.node_indices() {
            old_index_to_id.insert(index, self.graph[index].id());
        }
        let mut stack = vec![keep];
        while let Some(index) = stack.pop() {
            if !reachable_ids.insert(self.graph[index].id()) {
                continue;
            }
            for (_, entry) in self.graph[index].action_map().entries() {
                for child in entry.children().clone_indices() {
                    stack.push(child);
                }
            }
        }

        self.graph.retain_nodes(|frozen, idx| reachable_ids.contains(&frozen[idx].id()));

        let id_to_new_index: HashMap<u64, NodeIndex> =
            self.graph.node_indices().map(|i| (self.graph[i].id(), i)).collect();

        for index in self.graph.node_indices().collect::<Vec<_>>() {
            let id = self.graph[index].id();
            if id == keep_id {
                self.graph[index].clear_parent();
            } else if let Some(old_parent) = self.graph[index].parent() {
                let parent_id = old_index_to_id[&old_parent];
                let new_parent = id_to_new_index[&parent_id];
                self.graph[index].relocate_parent(new_parent);
            }
            for (_, entry) in self.graph[index].action_map_mut().entries_mut() {
                entry.children_mut().relocate_by_id(&old_index_to_id, &id_to_new_index);
            }
        }

        self.root = id_to_new_index[&keep_id];
    }
}
