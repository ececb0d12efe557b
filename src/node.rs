//! Belief node: particle set + action map + back-link.

use crate::action_map::ActionMap;
use crate::model::Model;
use petgraph::graph::{DiGraph, NodeIndex};

/// The data actually stored in the tree's arena. Kept separate from the
/// navigational wrapper below so the owned graph payload (`BeliefNodeData`)
/// and the cheap-to-copy index-plus-graph-reference handle (`BeliefNode`)
/// can each be passed around on their own terms.
pub(crate) struct BeliefNodeData<M: Model> {
    id: u64,
    depth: usize,
    particles: Vec<M::State>,
    action_map: ActionMap<M::Action, M::Observation>,
    info: M::Info,
    incoming_action: Option<M::Action>,
    incoming_observation: Option<M::Observation>,
    parent: Option<NodeIndex>,
}

impl<M: Model> BeliefNodeData<M> {
    pub fn root(id: u64, particles: Vec<M::State>, info: M::Info) -> Self {
        Self {
            id,
            depth: 0,
            particles,
            action_map: ActionMap::default(),
            info,
            incoming_action: None,
            incoming_observation: None,
            parent: None,
        }
    }

    pub fn child(
        id: u64,
        depth: usize,
        particles: Vec<M::State>,
        info: M::Info,
        incoming_action: M::Action,
        incoming_observation: M::Observation,
        parent: NodeIndex,
    ) -> Self {
        Self {
            id,
            depth,
            particles,
            action_map: ActionMap::default(),
            info,
            incoming_action: Some(incoming_action),
            incoming_observation: Some(incoming_observation),
            parent: Some(parent),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn particles(&self) -> &[M::State] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut Vec<M::State> {
        &mut self.particles
    }

    pub fn info(&self) -> &M::Info {
        &self.info
    }

    pub fn set_info(&mut self, info: M::Info) {
        self.info = info;
    }

    pub fn action_map(&self) -> &ActionMap<M::Action, M::Observation> {
        &self.action_map
    }

    pub fn action_map_mut(&mut self) -> &mut ActionMap<M::Action, M::Observation> {
        &mut self.action_map
    }

    pub fn incoming_action(&self) -> Option<M::Action> {
        self.incoming_action
    }

    pub fn incoming_observation(&self) -> Option<&M::Observation> {
        self.incoming_observation.as_ref()
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn clear_parent(&mut self) {
        self.parent = None;
        self.incoming_action = None;
        self.incoming_observation = None;
    }

    /// Rewrite the parent link to a relocated index, used by
    /// `BeliefTree::prune_siblings` when it rebuilds the arena — indices
    /// are not stable across a prune.
    pub fn relocate_parent(&mut self, parent: NodeIndex) {
        self.parent = Some(parent);
    }
}

/// A read-only, cheap-to-copy handle into the tree: an index plus a
/// `&Graph` reference, useful for navigation without taking ownership of
/// the arena.
#[derive(Clone, Copy)]
pub struct BeliefNode<'tree, M: Model> {
    index: NodeIndex,
    graph: &'tree DiGraph<BeliefNodeData<M>, ()>,
}

impl<'tree, M: Model> BeliefNode<'tree, M> {
    pub(crate) fn new(index: NodeIndex, graph: &'tree DiGraph<BeliefNodeData<M>, ()>) -> Self {
        Self { index, graph }
    }

    pub fn index(&self) -> NodeIndex {
        self.index
    }

    fn data(&self) -> &'tree BeliefNodeData<M> {
        self.graph
            .node_weight(self.index)
            .expect("belief node indices are only handed out for live nodes")
    }

    pub fn depth(&self) -> usize {
        self.data().depth()
    }

    pub fn particle_count(&self) -> usize {
        self.data().particles().len()
    }

    pub fn total_visits(&self) -> u64 {
        self.data().action_map().total_visits()
    }

    pub fn parent(&self) -> Option<BeliefNode<'tree, M>> {
        self.data().parent().map(|index| BeliefNode::new(index, self.graph))
    }

    pub fn children(&self) -> Vec<BeliefNode<'tree, M>> {
        self.data()
            .action_map()
            .entries()
            .flat_map(|(_, entry)| entry.children().clone_indices())
            .map(|index| BeliefNode::new(index, self.graph))
            .collect()
    }

    /// `(bin_number, visit_count, mean_q)` for every visited action entry,
    /// for introspection and diagnostics (e.g. confirming the incremental
    /// mean and zero-visit-exploration behavior of the selector).
    pub fn action_entries(&self) -> Vec<(u32, u64, crate::Reward)> {
        self.data()
            .action_map()
            .entries()
            .map(|(&bin, entry)| (bin, entry.visit_count(), entry.mean_q()))
            .collect()
    }
}
