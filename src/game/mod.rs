//! Pig game model.
//!
//! - [`state`]: game state, actions and the two transitions
//! - [`config`]: the goal and simulator/tournament settings

pub mod config;
pub mod state;

pub use config::{ConfigError, Goal, PigConfig, DEFAULT_GOAL};
pub use state::{Action, GameState, Player, RuleViolation, DIE_FACES};
