//! Utility semantics the value solver can optimize.
//!
//! A utility answers two questions: what a terminal state is worth to the
//! mover, and how a value seen from the next mover's seat translates back
//! to the current mover once the turn passes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::{ConfigError, GameState, Goal};

/// Runtime selector for a utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilityKind {
    /// Probability of winning the match.
    WinProbability,
    /// Expected final score margin over the opponent.
    ScoreDifferential,
}

impl UtilityKind {
    /// Both kinds, in a fixed order.
    pub const ALL: [UtilityKind; 2] = [UtilityKind::WinProbability, UtilityKind::ScoreDifferential];

    /// Stable snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            UtilityKind::WinProbability => "win_probability",
            UtilityKind::ScoreDifferential => "score_differential",
        }
    }
}

impl fmt::Display for UtilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UtilityKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win" | "win_probability" => Ok(UtilityKind::WinProbability),
            "diff" | "score_differential" => Ok(UtilityKind::ScoreDifferential),
            other => Err(ConfigError::UnknownUtility(other.to_string())),
        }
    }
}

/// Value semantics plugged into the shared expected-utility recurrence.
pub trait Utility: Default + fmt::Debug + Send + Sync + 'static {
    /// Which utility this is.
    const KIND: UtilityKind;

    /// Value to the mover if `state` is terminal for valuation, else `None`.
    ///
    /// A state is terminal once the mover could bank `goal` by holding or the
    /// opponent has already banked it.
    fn terminal_value(&self, state: &GameState, goal: Goal) -> Option<f64>;

    /// Translate a value from the next mover's seat to the current mover's.
    fn complement(&self, value: f64) -> f64;
}

/// Maximize the probability of winning.
#[derive(Debug, Clone, Copy, Default)]
pub struct WinProbability;

impl Utility for WinProbability {
    const KIND: UtilityKind = UtilityKind::WinProbability;

    fn terminal_value(&self, state: &GameState, goal: Goal) -> Option<f64> {
        if state.can_win_by_holding(goal) {
            Some(1.0)
        } else if state.score_other >= goal.get() {
            Some(0.0)
        } else {
            None
        }
    }

    fn complement(&self, value: f64) -> f64 {
        1.0 - value
    }
}

/// Maximize the expected final score margin.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreDifferential;

impl ScoreDifferential {
    fn margin(state: &GameState) -> f64 {
        (i64::from(state.score_mover) + i64::from(state.pending) - i64::from(state.score_other))
            as f64
    }
}

impl Utility for ScoreDifferential {
    const KIND: UtilityKind = UtilityKind::ScoreDifferential;

    fn terminal_value(&self, state: &GameState, goal: Goal) -> Option<f64> {
        if state.can_win_by_holding(goal) || state.score_other >= goal.get() {
            Some(Self::margin(state))
        } else {
            None
        }
    }

    // margins are zero-sum, so the seat swap negates
    fn complement(&self, value: f64) -> f64 {
        -value
    }
}
