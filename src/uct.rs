//! UCT simulation loop (selection/expansion/rollout/backup) and the
//! public `Planner` that ties every other component together: belief tree,
//! RNG, and search statistics behind `select_action`, `update`, and
//! `reset`.

use crate::config::Config;
use crate::history::History;
use crate::model::{Model, StepResult};
use crate::select;
use crate::stats::Statistic;
use crate::tree::BeliefTree;
use crate::ucb::UcbTable;
use crate::Reward;
use petgraph::graph::NodeIndex;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

/// Online POMCP planner over a model `M`. Owns the belief tree, the shared
/// RNG stream, and per-search statistics; the model is the only
/// out-of-process collaborator — it supplies state/action/observation
/// domains, transition sampling, and particle generation.
pub struct Planner<M: Model> {
    model: M,
    tree: BeliefTree<M>,
    config: Config,
    ucb: UcbTable,
    rng: SmallRng,
    history: History<M::State, M::Action, M::Observation>,
    total_reward_stats: Statistic,
    tree_depth_stats: Statistic,
    rollout_depth_stats: Statistic,
}

impl<M: Model> Planner<M> {
    /// Build a planner with a fresh root belief and an explicitly seeded
    /// RNG, so runs are reproducible.
    pub fn new(mut model: M, config: Config, seed: u64) -> Self {
        let tree = BeliefTree::new(&mut model, &config);
        let ucb = UcbTable::new(config.ucb_coefficient);
        Self {
            model,
            tree,
            config,
            ucb,
            rng: SmallRng::seed_from_u64(seed),
            history: History::new(),
            total_reward_stats: Statistic::new("total_reward"),
            tree_depth_stats: Statistic::new("tree_depth"),
            rollout_depth_stats: Statistic::new("rollout_depth"),
        }
    }

    pub fn history(&self) -> &History<M::State, M::Action, M::Observation> {
        &self.history
    }

    pub fn root_particle_count(&self) -> usize {
        self.tree.root().particle_count()
    }

    /// Read-only access to the belief tree, for introspection of tree
    /// shape, visit counts, and pruning behavior.
    pub fn tree(&self) -> &BeliefTree<M> {
        &self.tree
    }

    /// Step the real environment forward. Not part of the planner's own
    /// responsibilities — a convenience for callers, such as
    /// `demos/bandit_episode.rs`, that use the same `Model` instance to
    /// play both planner and environment. Sampling a fresh root particle
    /// mirrors how `select_action` itself picks a representative state to
    /// hand the model.
    pub fn step_model(&mut self, action: M::Action) -> (StepResult<M::State, M::Action, M::Observation>, bool) {
        let root = self.tree.root_index();
        let particle = self
            .tree
            .data(root)
            .particles()
            .first()
            .cloned()
            .expect("root.particles.size is kept in [min, max] by invariant 4");
        self.model.generate_step(&particle, action)
    }

    /// `select_action()`: run `uct_search`, then greedily pick the root's
    /// best action.
    pub fn select_action(&mut self) -> M::Action {
        self.uct_search();

        let root = self.tree.root_index();
        let particle = self
            .tree
            .data(root)
            .particles()
            .first()
            .cloned()
            .expect("root.particles.size is kept in [min, max] by invariant 4");
        let info = self.tree.data(root).info().clone();
        let legal = self.model.legal_actions(&info, &particle);
        let action = select::select(&legal, self.tree.action_map_mut(root), &self.ucb, true);

        log::debug!(
            "select_action: {:?} ({})",
            action,
            self.total_reward_stats
        );
        action
    }

    /// `uct_search()`: clear stats, snapshot `root.data`, run up to
    /// `num_sims` simulations bounded conjunctively by
    /// `action_selection_time_out`, restore `root.data`.
    fn uct_search(&mut self) {
        self.total_reward_stats.clear();
        self.tree_depth_stats.clear();

        let root = self.tree.root_index();
        let snapshot = self.tree.data(root).info().clone();
        let deadline = Instant::now() + Duration::from_secs_f64(self.config.action_selection_time_out.max(0.0));

        for _ in 0..self.config.num_sims {
            if Instant::now() >= deadline {
                break;
            }
            self.model.reset();
            self.tree.data_mut(root).set_info(snapshot.clone());

            let particles = self.tree.data(root).particles();
            if particles.is_empty() {
                break;
            }
            let index = self.rng.random_range(0..particles.len());
            let state = particles[index].clone();

            let mut peak_depth = 0usize;
            let reward = self.simulate_node(state, root, 0, deadline, &mut peak_depth);
            self.total_reward_stats.add(reward);
            self.tree_depth_stats.add(peak_depth as Reward);
        }

        self.tree.data_mut(root).set_info(snapshot);
    }

    /// `simulate_node(state, node, depth, t0)`. Depth is threaded by value
    /// all the way down — no mutable counter, so there is no spurious
    /// decrement to guard against on return.
    fn simulate_node(&mut self, state: M::State, node: NodeIndex, depth: usize, deadline: Instant, peak_depth: &mut usize) -> Reward {
        *peak_depth = (*peak_depth).max(depth);

        if Instant::now() >= deadline {
            return 0.0;
        }

        let info = self.tree.data(node).info().clone();
        let legal = self.model.legal_actions(&info, &state);
        let action = select::select(&legal, self.tree.action_map_mut(node), &self.ucb, false);

        if depth >= self.config.maximum_depth {
            return 0.0;
        }

        if depth == 1 {
            let data = self.tree.data_mut(node);
            if data.particles().len() < self.config.max_particle_count {
                data.particles_mut().push(state.clone());
            }
        }

        self.step_node(node, state, action, depth, deadline, peak_depth)
    }

    /// `step_node(node, state, action, depth, t0)`: sample a transition,
    /// recurse into an existing child or expand-then-rollout a fresh one,
    /// back up the discounted, step-scaled return.
    fn step_node(&mut self, node: NodeIndex, state: M::State, action: M::Action, depth: usize, deadline: Instant, peak_depth: &mut usize) -> Reward {
        let (step, _is_legal) = self.model.generate_step(&state, action);
        let bin = action.bin_number();

        let delayed = if step.is_terminal {
            0.0
        } else {
            match self.tree.get_child(node, bin, action, &step.observation) {
                Some(child) => self.simulate_node(step.next_state.clone(), child, depth + 1, deadline, peak_depth),
                None => {
                    let parent_info = self.tree.data(node).info().clone();
                    let child_info = self
                        .model
                        .advance_info(&parent_info, action, &step.observation, &step.next_state);
                    self.tree
                        .create_child(node, bin, action, step.observation.clone(), child_info.clone());
                    crate::rollout::rollout(
                        &mut self.model,
                        child_info,
                        step.next_state.clone(),
                        &self.config,
                        &mut self.rng,
                        &mut self.rollout_depth_stats,
                    )
                }
            }
        };

        let q = (step.reward + self.config.discount * delayed) * self.config.step_size;
        self.tree.action_map_mut(node).ensure(action, bin).backup(q);
        q
    }

    /// `update(step_result) -> depleted`: consume a real step, refill
    /// particles, and reuse the surviving subtree as the new root.
    /// Returns `true` when the belief is depleted and the caller should
    /// replan from scratch.
    pub fn update(&mut self, step: StepResult<M::State, M::Action, M::Observation>) -> bool {
        self.model.update(&step);

        let root = self.tree.root_index();
        let bin = step.action.bin_number();

        if self.tree.data(root).action_map().get(bin).is_none() {
            log::warn!("update: action {:?} never visited at root, reporting depletion", step.action);
            return true;
        }

        let direct_child = self.tree.get_child(root, bin, step.action, &step.observation);
        let child = match direct_child {
            Some(child) => child,
            None => {
                log::warn!(
                    "update: observation {:?} never seen under action {:?}, salvaging a sibling belief",
                    step.observation,
                    step.action
                );
                match self.tree.data(root).action_map().get(bin).and_then(|e| e.children().any()) {
                    Some(child) => child,
                    None => {
                        log::warn!("update: no belief to salvage, reporting depletion");
                        return true;
                    }
                }
            }
        };

        self.history.push(&step);

        let have = self.tree.data(child).particle_count();
        if have < self.config.max_particle_count {
            let need = self.config.max_particle_count - have;
            let parent_info = self.tree.data(root).info().clone();
            let source: Vec<M::State> = self.tree.data(root).particles().to_vec();
            let mut refill = self
                .model
                .generate_particles(&parent_info, step.action, &step.observation, need, &source);
            if refill.is_empty() {
                refill = self.model.generate_particles_uninformed(
                    &parent_info,
                    step.action,
                    &step.observation,
                    self.config.min_particle_count,
                );
            }
            let data = self.tree.data_mut(child);
            data.particles_mut().extend(refill);
            if data.particles().len() > self.config.max_particle_count {
                data.particles_mut().truncate(self.config.max_particle_count);
            }
        }

        if self.tree.data(child).particle_count() == 0 {
            log::warn!("update: particle refill yielded nothing, reporting depletion");
            return true;
        }

        self.tree.prune_siblings(child);
        log::info!(
            "update: advanced root, {} particles, history length {}",
            self.tree.root().particle_count(),
            self.history.len()
        );
        false
    }

    /// `reset()`: reinitialise the root with fresh particles, discarding
    /// the tree and history.
    pub fn reset(&mut self) {
        self.tree = BeliefTree::new(&mut self.model, &self.config);
        self.history = History::new();
        self.total_reward_stats.clear();
        self.tree_depth_stats.clear();
        self.rollout_depth_stats.clear();
        log::info!("reset: fresh root with {} particles", self.config.num_start_states);
    }
}
