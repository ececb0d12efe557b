//! A toy multi-armed-Bernoulli-bandit `Model`, always compiled (not
//! test-gated) and used as a fixture for the generic POMCP machinery.
//!
//! A bandit is a degenerate POMDP: one state, fully observed reward, no
//! hidden dynamics. It still exercises the full planner — particle
//! bookkeeping, UCB1 selection, rollout, backup — with closed-form
//! expected behavior that's easy to check by hand.

use crate::model::{Action, Model, StepResult};
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

/// The bandit has exactly one (unobservable, because unnecessary) state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BanditState;

impl std::fmt::Display for BanditState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s0")
    }
}

/// Pull arm `bin_number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BanditAction(pub u32);

impl Action for BanditAction {
    fn bin_number(&self) -> u32 {
        self.0
    }
}

/// Number of arms — the only thing a node needs to know to enumerate its
/// legal actions. Identical at every depth, since pulling an arm never
/// changes which arms exist.
#[derive(Debug, Clone, Copy)]
pub struct BanditInfo {
    pub arms: usize,
}

/// A stationary multi-armed bandit with per-arm Bernoulli reward
/// probabilities. Observation is the raw 0/1 reward outcome, reused
/// directly as the map key since observations must be usable as map keys.
pub struct BanditModel {
    probabilities: Vec<f64>,
    rng: SmallRng,
}

impl BanditModel {
    pub fn new(probabilities: Vec<f64>, seed: u64) -> Self {
        assert!(!probabilities.is_empty(), "a bandit needs at least one arm");
        Self {
            probabilities,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// A two-arm fixture: Bernoulli(0.9) vs Bernoulli(0.1), useful for
    /// checking that the selector reliably prefers the better arm.
    pub fn two_arm(seed: u64) -> Self {
        Self::new(vec![0.9, 0.1], seed)
    }

    /// A one-arm fixture: deterministic reward 1, useful for checking
    /// exact visit-count and backup arithmetic.
    pub fn one_arm(seed: u64) -> Self {
        Self::new(vec![1.0], seed)
    }
}

impl Model for BanditModel {
    type State = BanditState;
    type Action = BanditAction;
    type Observation = u8;
    type Info = BanditInfo;

    fn sample_initial_state(&mut self) -> Self::State {
        BanditState
    }

    fn legal_actions(&self, info: &Self::Info, _state: &Self::State) -> Vec<Self::Action> {
        (0..info.arms as u32).map(BanditAction).collect()
    }

    fn generate_step(
        &mut self,
        _state: &Self::State,
        action: Self::Action,
    ) -> (StepResult<Self::State, Self::Action, Self::Observation>, bool) {
        let index = action.bin_number() as usize;
        let is_legal = index < self.probabilities.len();
        let p = self.probabilities.get(index).copied().unwrap_or(0.0);
        let observation = if self.rng.random::<f64>() < p { 1u8 } else { 0u8 };
        let step = StepResult {
            action,
            observation,
            reward: observation as crate::Reward,
            next_state: BanditState,
            is_terminal: false,
        };
        (step, is_legal)
    }

    fn reset(&mut self) {}

    fn update(&mut self, _step: &StepResult<Self::State, Self::Action, Self::Observation>) {}

    fn generate_particles(
        &mut self,
        _parent: &Self::Info,
        _action: Self::Action,
        _observation: &Self::Observation,
        n: usize,
        _source: &[Self::State],
    ) -> Vec<Self::State> {
        std::iter::repeat(BanditState).take(n).collect()
    }

    fn generate_particles_uninformed(
        &mut self,
        _parent: &Self::Info,
        _action: Self::Action,
        _observation: &Self::Observation,
        n: usize,
    ) -> Vec<Self::State> {
        std::iter::repeat(BanditState).take(n).collect()
    }

    fn advance_info(
        &self,
        parent: &Self::Info,
        _action: Self::Action,
        _observation: &Self::Observation,
        _state: &Self::State,
    ) -> Self::Info {
        *parent
    }

    fn root_info(&self) -> Self::Info {
        BanditInfo {
            arms: self.probabilities.len(),
        }
    }
}
