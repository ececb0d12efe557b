//! Per-action visit count and running mean Q, plus the observation map each
//! action entry owns so that
//! `node.action_map[action].observation_map[observation] == child`
//! is a direct field lookup rather than a separate structure the planner
//! has to keep in sync.

use crate::observation_map::ObservationMap;
use crate::{Probability, Reward};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub(crate) struct ActionEntry<A, O: Eq + std::hash::Hash> {
    action: A,
    visit_count: u64,
    mean_q: Reward,
    children: ObservationMap<O>,
}

impl<A: Copy, O: Eq + std::hash::Hash> ActionEntry<A, O> {
    fn new(action: A) -> Self {
        Self {
            action,
            visit_count: 0,
            mean_q: 0.0,
            children: ObservationMap::default(),
        }
    }

    pub fn action(&self) -> A {
        self.action
    }

    pub fn visit_count(&self) -> u64 {
        self.visit_count
    }

    /// Undefined (by convention `0.0`) until the first backup; the UCB
    /// selector never reads this for a zero-visit entry because
    /// `fast_ucb` already returns `+inf` there.
    pub fn mean_q(&self) -> Reward {
        self.mean_q
    }

    pub fn children(&self) -> &ObservationMap<O> {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut ObservationMap<O> {
        &mut self.children
    }

    /// Incremental mean update: `mean_q += (x - mean_q) / visit_count`.
    pub fn backup(&mut self, x: Reward) {
        self.visit_count += 1;
        self.mean_q += (x - self.mean_q) / self.visit_count as Reward;
    }
}

/// Mapping `bin_number -> ActionEntry`, populated lazily on first visit of
/// each legal action. Keyed by `bin_number` (a `u32`) rather than by `A`
/// directly so that `A` need not be hashable — only `Action::bin_number`
/// and `Ord` are required of it.
#[derive(Debug, Clone, Default)]
pub(crate) struct ActionMap<A, O: Eq + std::hash::Hash> {
    entries: BTreeMap<u32, ActionEntry<A, O>>,
}

impl<A: Copy, O: Eq + std::hash::Hash> ActionMap<A, O> {
    pub fn ensure(&mut self, action: A, bin_number: u32) -> &mut ActionEntry<A, O> {
        self.entries
            .entry(bin_number)
            .or_insert_with(|| ActionEntry::new(action))
    }

    pub fn get(&self, bin_number: u32) -> Option<&ActionEntry<A, O>> {
        self.entries.get(&bin_number)
    }

    pub fn get_mut(&mut self, bin_number: u32) -> Option<&mut ActionEntry<A, O>> {
        self.entries.get_mut(&bin_number)
    }

    pub fn total_visits(&self) -> u64 {
        self.entries.values().map(ActionEntry::visit_count).sum()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&u32, &ActionEntry<A, O>)> {
        self.entries.iter()
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = (&u32, &mut ActionEntry<A, O>)> {
        self.entries.iter_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Score used by the UCB1 selector: `mean_q` alone when greedy,
/// `mean_q + fast_ucb(...)` otherwise.
pub(crate) fn score(mean_q: Reward, exploration_bonus: Probability, greedy: bool) -> Reward {
    if greedy {
        mean_q
    } else {
        mean_q + exploration_bonus
    }
}
