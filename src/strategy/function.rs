//! Strategies backed by a plain function.

use std::fmt;

use crate::game::{Action, GameState, RuleViolation};
use crate::strategy::Strategy;

/// Decision function signature.
pub type DecideFn = fn(&GameState) -> Result<Action, RuleViolation>;

/// A named decision function.
///
/// Useful for baselines and for strategies that produce text, which can
/// parse it with `str::parse::<Action>()` and let an unknown word surface
/// as a rule violation.
#[derive(Clone)]
pub struct FnStrategy {
    name: String,
    decide: DecideFn,
}

impl FnStrategy {
    /// Create a strategy from a name and a function.
    pub fn new(name: impl Into<String>, decide: DecideFn) -> Self {
        Self {
            name: name.into(),
            decide,
        }
    }
}

impl fmt::Debug for FnStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStrategy").field("name", &self.name).finish()
    }
}

impl Strategy for FnStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, state: &GameState) -> Result<Action, RuleViolation> {
        (self.decide)(state)
    }
}

/// Roll every time. Only pig-outs ever bank points.
pub fn always_roll() -> FnStrategy {
    FnStrategy::new("always_roll", |_| Ok(Action::Roll))
}

/// Hold every time, even with nothing pending.
pub fn always_hold() -> FnStrategy {
    FnStrategy::new("always_hold", |_| Ok(Action::Hold))
}
