//! Real-step history log. Used for reporting and debugging only — the
//! planner never reads its own history back.

use crate::model::StepResult;
use crate::Reward;

/// `{action, observation, reward, next_state}` appended after each real
/// step. Deliberately drops `is_terminal` relative to `StepResult` — the
/// history is a report, not a replay buffer.
#[derive(Clone)]
pub struct HistoryEntry<S, A, O> {
    pub action: A,
    pub observation: O,
    pub reward: Reward,
    pub next_state: S,
}

impl<S: Clone, A: Copy, O: Clone> HistoryEntry<S, A, O> {
    fn from_step(step: &StepResult<S, A, O>) -> Self {
        Self {
            action: step.action,
            observation: step.observation.clone(),
            reward: step.reward,
            next_state: step.next_state.clone(),
        }
    }
}

/// Append-only log of committed steps.
#[derive(Clone)]
pub struct History<S, A, O>(Vec<HistoryEntry<S, A, O>>);

impl<S, A, O> Default for History<S, A, O> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<S: Clone, A: Copy, O: Clone> History<S, A, O> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, step: &StepResult<S, A, O>) {
        self.0.push(HistoryEntry::from_step(step));
    }

    pub fn entries(&self) -> &[HistoryEntry<S, A, O>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: std::fmt::Display, A: std::fmt::Debug, O: std::fmt::Debug> std::fmt::Display
    for HistoryEntry<S, A, O>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "a={:?} o={:?} r={:.3} s'={}",
            self.action, self.observation, self.reward, self.next_state
        )
    }
}
