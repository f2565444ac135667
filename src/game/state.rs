//! Game state and transitions for Pig.
//!
//! ## Rules
//!
//! - Two players take turns rolling a single six-sided die
//! - A roll of 2..=6 adds the face to the turn's pending points
//! - A roll of 1 ("pig out") loses the pending points, banks a single
//!   point and ends the turn
//! - Holding banks the pending points and ends the turn
//! - The first player to bank `goal` points wins
//!
//! States are stored from the mover's perspective: `score_mover` always
//! belongs to the player about to act, so every transition that ends a
//! turn swaps the two score fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::config::Goal;

/// Number of faces on the die.
pub const DIE_FACES: u8 = 6;

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Player 0, who moves first.
    First,
    /// Player 1.
    Second,
}

impl Player {
    /// Player from a 0/1 index.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Player::First),
            1 => Some(Player::Second),
            _ => None,
        }
    }

    /// The 0/1 index of this player.
    pub fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }

    /// The opponent.
    pub fn other(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.index())
    }
}

/// A move available to the player whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Roll the die again.
    Roll,
    /// Bank the pending points and pass the turn.
    Hold,
}

impl Action {
    /// Lowercase name, as used in strategy output.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Roll => "roll",
            Action::Hold => "hold",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy produced something that is not a Pig action.
///
/// The simulator resolves this as an immediate forfeit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    /// The named action does not exist in Pig.
    #[error("'{0}' is not a legal action")]
    UnknownAction(String),
}

impl FromStr for Action {
    type Err = RuleViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "roll" => Ok(Action::Roll),
            "hold" => Ok(Action::Hold),
            other => Err(RuleViolation::UnknownAction(other.to_string())),
        }
    }
}

/// Complete game state, seen from the player to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    /// Player about to act.
    pub mover: Player,
    /// Banked score of the mover.
    pub score_mover: u32,
    /// Banked score of the opponent.
    pub score_other: u32,
    /// Points accumulated this turn, not yet banked.
    pub pending: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

impl GameState {
    /// Create a state.
    pub fn new(mover: Player, score_mover: u32, score_other: u32, pending: u32) -> Self {
        Self {
            mover,
            score_mover,
            score_other,
            pending,
        }
    }

    /// The start of a match: player 0 to move, nothing scored.
    pub fn initial() -> Self {
        Self::new(Player::First, 0, 0, 0)
    }

    /// Bank the pending points and pass the turn.
    pub fn hold(self) -> Self {
        Self::new(
            self.mover.other(),
            self.score_other,
            self.score_mover + self.pending,
            0,
        )
    }

    /// Apply a die roll.
    ///
    /// A 1 ends the turn, dropping pending points and banking a single
    /// point; any other face is added to pending.
    pub fn roll(self, die: u8) -> Self {
        debug_assert!((1..=DIE_FACES).contains(&die), "die face {} out of range", die);

        if die == 1 {
            Self::new(self.mover.other(), self.score_other, self.score_mover + 1, 0)
        } else {
            Self::new(
                self.mover,
                self.score_mover,
                self.score_other,
                self.pending + u32::from(die),
            )
        }
    }

    /// Apply an action, using `die` when rolling.
    pub fn apply(self, action: Action, die: u8) -> Self {
        match action {
            Action::Roll => self.roll(die),
            Action::Hold => self.hold(),
        }
    }

    /// Actions worth considering, in tie-breaking order.
    ///
    /// Holding on zero pending only wastes a turn, so it is excluded.
    pub fn legal_actions(&self) -> &'static [Action] {
        if self.pending > 0 {
            &[Action::Roll, Action::Hold]
        } else {
            &[Action::Roll]
        }
    }

    /// The mover would reach the goal by holding now.
    pub fn can_win_by_holding(&self, goal: Goal) -> bool {
        self.score_mover + self.pending >= goal.get()
    }

    /// The player that has already banked `goal` points, if any.
    pub fn winner(&self, goal: Goal) -> Option<Player> {
        if self.score_mover >= goal.get() {
            Some(self.mover)
        } else if self.score_other >= goal.get() {
            Some(self.mover.other())
        } else {
            None
        }
    }

    /// Banked score of `player`.
    pub fn score_of(&self, player: Player) -> u32 {
        if player == self.mover {
            self.score_mover
        } else {
            self.score_other
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, me={}, you={}, pending={})",
            self.mover.index(),
            self.score_mover,
            self.score_other,
            self.pending
        )
    }
}
