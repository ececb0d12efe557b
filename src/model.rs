//! The external collaborator interface.
//!
//! Everything in this module is a contract the caller implements; the
//! planner is opaque to state/action/observation semantics and only ever
//! calls through these trait methods.

/// A discrete action identified by a `bin_number` drawn from a fixed
/// alphabet known to the model.
pub trait Action: Copy + Eq + Ord + std::fmt::Debug {
    fn bin_number(&self) -> u32;
}

/// The result of stepping the model forward from a state under an action.
#[derive(Debug, Clone)]
pub struct StepResult<S, A, O> {
    pub action: A,
    pub observation: O,
    pub reward: crate::Reward,
    pub next_state: S,
    pub is_terminal: bool,
}

/// The POMDP model: state/action/observation domains, transition sampling,
/// legal-action enumeration, reward, and particle-filter refill. The
/// concrete domain logic lives entirely on the caller's side — only the
/// interface lives here.
///
/// `Info` is the per-node "information state" snapshot: clonable, cheap
/// enough that the tree clones it once per simulation at the root and
/// restores it on exit.
pub trait Model {
    type State: Clone + std::fmt::Display;
    type Action: Action;
    type Observation: Clone + Eq + std::hash::Hash + std::fmt::Debug;
    type Info: Clone;

    /// Sample a state from the initial-state distribution (used to seed
    /// the root particle filter).
    fn sample_initial_state(&mut self) -> Self::State;

    /// The legal actions at `state`, given the information state `info`
    /// that accumulated to reach it. Must be non-empty.
    fn legal_actions(&self, info: &Self::Info, state: &Self::State) -> Vec<Self::Action>;

    /// Sample a transition. `is_legal` reports whether `action` was legal
    /// at `state`; the planner itself never calls this with an action
    /// outside `legal_actions`, but the model may be driven directly.
    fn generate_step(
        &mut self,
        state: &Self::State,
        action: Self::Action,
    ) -> (StepResult<Self::State, Self::Action, Self::Observation>, bool);

    /// Reset any transient simulator state. Called at the start of every
    /// UCT simulation — the model is shared across simulations and must
    /// not leak state between them.
    fn reset(&mut self);

    /// Notify the model that `step` was committed for real — distinct
    /// from `reset`, which rewinds transient simulator state for the
    /// *next* simulation batch.
    fn update(&mut self, step: &StepResult<Self::State, Self::Action, Self::Observation>);

    /// Model-guided posterior sampling for particle reinvigoration.
    /// May return fewer than `n` particles, or zero.
    fn generate_particles(
        &mut self,
        parent: &Self::Info,
        action: Self::Action,
        observation: &Self::Observation,
        n: usize,
        source: &[Self::State],
    ) -> Vec<Self::State>;

    /// Domain-specific fallback sampler used only when `generate_particles`
    /// yields nothing.
    fn generate_particles_uninformed(
        &mut self,
        parent: &Self::Info,
        action: Self::Action,
        observation: &Self::Observation,
        n: usize,
    ) -> Vec<Self::State>;

    /// Derive the information state of a child reached from `parent` via
    /// `(action, observation)`, having landed on `state`. The tree only
    /// owns an opaque "data" snapshot it clones and restores; every real
    /// model needs to answer how a child's snapshot derives from its
    /// parent's.
    fn advance_info(
        &self,
        parent: &Self::Info,
        action: Self::Action,
        observation: &Self::Observation,
        state: &Self::State,
    ) -> Self::Info;

    /// The information state of a fresh root, with no history.
    fn root_info(&self) -> Self::Info;
}
