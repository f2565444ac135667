//! # Pig Solver
//!
//! Optimal play for the two-player dice game Pig.
//!
//! On each turn the player to move either **rolls** a six-sided die or
//! **holds**. A 2 through 6 is added to the turn total; a 1 ends the turn,
//! scores a single point and throws the turn total away. Holding banks the
//! turn total. The first player to bank the goal wins.
//!
//! ## Features
//!
//! - **Exact Values**: win probability or expected score margin for any state
//! - **Shared Memoization**: per-goal value caches, safe to share across threads
//! - **Pluggable Strategies**: threshold, random, optimal and function-backed players
//! - **Simulation**: single matches with random or scripted dice
//! - **Tournaments**: reproducible round-robins run in parallel with rayon
//!
//! ## Quick Start
//!
//! ```
//! use pig_solver::game::{Action, GameState, Goal, Player};
//! use pig_solver::solver::{PigSolver, UtilityKind};
//!
//! let solver = PigSolver::new(Goal::new(40).unwrap());
//! let state = GameState::new(Player::First, 31, 22, 9);
//!
//! assert_eq!(solver.best_action(&state, UtilityKind::WinProbability), Action::Hold);
//! ```
//!
//! ## Modules
//!
//! - [`game`]: states, transitions and configuration
//! - [`solver`]: the value recurrence, caches and policy comparison
//! - [`strategy`]: the [`Strategy`] trait and its implementations
//! - [`simulation`]: die sources, matches and tournaments
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    ValueSolver<U: Utility>                      │
//! │  - Expected-utility recurrence   - Explicit-stack evaluation    │
//! │  - ValueCache (one per goal)     - Parallel warm-up             │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ shared via Arc
//!                               ▼
//!         ┌─────────────────────┼─────────────────────┐
//!         │                     │                     │
//!         ▼                     ▼                     ▼
//!    ┌──────────┐         ┌───────────┐         ┌────────────┐
//!    │ Optimal  │         │  HoldAt   │         │  Random /  │
//!    │ Strategy │         │           │         │ FnStrategy │
//!    └──────────┘         └───────────┘         └────────────┘
//!                               │
//!                               ▼
//!                 MatchRunner / Tournament (dice)
//! ```

#![warn(missing_docs)]

/// Game model: states, actions, transitions and configuration.
pub mod game;

/// Optimal-play solver.
///
/// Computes state values under a chosen utility and picks the best action.
pub mod solver;

/// Decision makers that can take a seat in a match.
pub mod strategy;

/// Match and tournament simulation.
pub mod simulation;

// Re-export commonly used types at crate root for convenience
pub use game::{Action, ConfigError, GameState, Goal, PigConfig, Player, RuleViolation};
pub use simulation::{play_match, MatchError, MatchOutcome, Tournament, TournamentReport};
pub use solver::{PigSolver, UtilityKind, ValueSolver};
pub use strategy::{build_strategy, Strategy};
