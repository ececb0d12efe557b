//! Planner configuration, loadable from a JSON file.
//!
//! Derives `serde::{Serialize, Deserialize}` for externally-loaded
//! structured data, and returns `anyhow::Result` on load failure rather
//! than a hand-rolled error type.

use crate::{Probability, Reward};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// All tuning knobs for the planner. The two UCB table dimensions
/// (`N_MAX`, `n_MAX`) are crate constants, not configuration — they size a
/// precomputed table rather than tune search behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial particle count at root.
    pub num_start_states: usize,
    /// Lower bound before uninformed refill is attempted.
    pub min_particle_count: usize,
    /// Upper bound for refill and depth-1 reinvigoration.
    pub max_particle_count: usize,
    /// Simulations per `select_action` call.
    pub num_sims: usize,
    /// Hard horizon for both tree descent and rollouts.
    pub maximum_depth: usize,
    /// Wall-clock budget per `select_action`, in seconds.
    pub action_selection_time_out: f64,
    /// `c` in the UCB1 formula.
    pub ucb_coefficient: Probability,
    /// `gamma` applied per step inside rollouts and backups.
    pub discount: Reward,
    /// Multiplicative scaling applied to all backed-up Q values.
    pub step_size: Reward,
}

impl Default for Config {
    /// Reasonable defaults for a small-to-medium belief tree.
    fn default() -> Self {
        Self {
            num_start_states: 1_000,
            min_particle_count: 100,
            max_particle_count: 1_000,
            num_sims: 1_000,
            maximum_depth: 50,
            action_selection_time_out: 1.0,
            ucb_coefficient: 1.0,
            discount: 0.95,
            step_size: 1.0,
        }
    }
}

impl Config {
    /// Load a config from a JSON file, falling back to `Default` for any
    /// key the file omits (`#[serde(default)]` above).
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_worked_examples() {
        let config = Config::default();
        assert!(config.min_particle_count <= config.max_particle_count);
        assert!(config.num_sims > 0);
    }

    #[test]
    fn round_trips_through_json() {
        let config = Config::default();
        let text = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(back.num_sims, config.num_sims);
    }
}
