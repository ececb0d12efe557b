//! Online POMDP planning via Partially Observable Monte-Carlo Planning (POMCP).
//!
//! At every decision epoch the planner grows a belief-conditioned search
//! tree rooted at the agent's current belief (a particle filter), runs many
//! forward simulations guided by UCB1 inside the tree and a random policy
//! beyond its frontier, then returns the greedy best action for the root.
//! After the agent acts and observes, [`Planner::update`] prunes the tree to
//! the new belief and reuses the surviving subtree.
//!
//! The concrete POMDP — state/action/observation domains, transition
//! sampling, legal-action enumeration, reward — is supplied by the caller
//! through the [`Model`] trait; this crate owns only the tree, the belief
//! representation, and the UCT search.

pub mod bandit;
pub mod config;
pub mod history;
pub mod logging;
pub mod model;
pub mod node;
pub mod rollout;
pub mod select;
pub mod stats;
pub mod tree;
pub mod uct;

mod action_map;
mod observation_map;
mod ucb;

pub use config::Config;
pub use history::{History, HistoryEntry};
pub use model::{Model, StepResult};
pub use tree::BeliefTree;
pub use uct::Planner;

/// Reward/utility/probability precision used throughout the planner.
pub type Reward = f64;
/// Probability mass, reused as the type for UCB scores and mean returns.
pub type Probability = f64;

/// Rows of the precomputed UCB table (total-visit axis).
pub(crate) const UCB_N_MAX: usize = 10_000;
/// Columns of the precomputed UCB table (per-action-visit axis).
pub(crate) const UCB_N_MAX_INNER: usize = 100;
