//! UCB1 argmax over an action map.

use crate::action_map::{score, ActionMap};
use crate::model::Action;
use crate::ucb::UcbTable;

/// Select an action from `legal` by UCB1 score over `action_map`, creating
/// a zero-visit entry for any legal action not yet visited. Ties break on
/// the lowest `bin_number`, which `BTreeMap` iteration order already gives
/// us for free.
///
/// Panics if `legal` is empty — an empty legal-action set is a programmer
/// error in the model, not a recoverable condition.
pub(crate) fn select<A, O>(legal: &[A], action_map: &mut ActionMap<A, O>, ucb: &UcbTable, greedy: bool) -> A
where
    A: Action,
    O: Eq + std::hash::Hash,
{
    assert!(!legal.is_empty(), "NoLegalAction: model returned no legal actions");

    for &action in legal {
        action_map.ensure(action, action.bin_number());
    }

    let total_visits = action_map.total_visits();
    let log_n = (total_visits.max(1) as f64).ln();

    let mut best: Option<(u32, f64)> = None;
    for &action in legal {
        let bin = action.bin_number();
        let entry = action_map.get(bin).expect("just ensured above");
        let bonus = ucb.fast_ucb(total_visits, entry.visit_count(), log_n);
        let value = score(entry.mean_q(), bonus, greedy);
        let better = match best {
            None => true,
            Some((best_bin, best_value)) => value > best_value || (value == best_value && bin < best_bin),
        };
        if better {
            best = Some((bin, value));
        }
    }

    let best_bin = best.expect("legal is non-empty").0;
    legal
        .iter()
        .copied()
        .find(|a| a.bin_number() == best_bin)
        .expect("best_bin came from legal")
}
