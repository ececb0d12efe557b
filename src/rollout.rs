//! Random-policy discounted return from a state.

use crate::config::Config;
use crate::model::Model;
use crate::stats::Statistic;
use crate::Reward;
use rand::prelude::IndexedRandom;
use rand::Rng;

/// `rollout(start_state, legal_actions) -> R`: uniformly-random legal
/// actions for up to `maximum_depth` steps, accumulating
/// `reward * discount^k`, stopping early on `is_terminal`. Refreshes legal
/// actions (and the information state driving them) from the new state
/// every step, since the legal set and its probabilities can change as the
/// rollout state evolves.
pub(crate) fn rollout<M: Model>(
    model: &mut M,
    mut info: M::Info,
    mut state: M::State,
    config: &Config,
    rng: &mut impl Rng,
    rollout_depth_stats: &mut Statistic,
) -> Reward {
    let mut total = 0.0;
    let mut discount = 1.0;
    let mut depth = 0usize;

    while depth < config.maximum_depth {
        let legal = model.legal_actions(&info, &state);
        let action = *legal.choose(rng).expect("legal_actions is non-empty by contract");
        let (step, _is_legal) = model.generate_step(&state, action);
        total += step.reward * discount;
        depth += 1;
        if step.is_terminal {
            break;
        }
        info = model.advance_info(&info, action, &step.observation, &step.next_state);
        state = step.next_state;
        discount *= config.discount;
    }

    rollout_depth_stats.add(depth as Reward);
    total
}
