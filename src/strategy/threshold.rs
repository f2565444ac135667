//! Fixed-threshold heuristic.

use crate::game::{Action, GameState, Goal, RuleViolation};
use crate::strategy::Strategy;

/// Hold once `pending` reaches `threshold`, or as soon as holding wins.
#[derive(Debug, Clone)]
pub struct HoldAt {
    threshold: u32,
    goal: Goal,
    name: String,
}

impl HoldAt {
    /// Create a threshold strategy playing to `goal`.
    pub fn new(threshold: u32, goal: Goal) -> Self {
        Self {
            threshold,
            goal,
            name: format!("hold_at({})", threshold),
        }
    }

    /// The pending total at which this strategy holds.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl Strategy for HoldAt {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, state: &GameState) -> Result<Action, RuleViolation> {
        if state.pending >= self.threshold || state.can_win_by_holding(self.goal) {
            Ok(Action::Hold)
        } else {
            Ok(Action::Roll)
        }
    }
}
