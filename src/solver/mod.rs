//! Optimal-play solver for Pig.
//!
//! This module computes, for any state, the value to the player about to
//! move when both players play optimally, together with the action that
//! achieves it.
//!
//! # Overview
//!
//! The solver evaluates one expected-utility recurrence, generic over a
//! [`Utility`]:
//!
//! - [`WinProbability`]: the chance of winning the match
//! - [`ScoreDifferential`]: the expected final margin over the opponent
//!
//! Values are memoized in a [`ValueCache`] owned by each [`ValueSolver`].
//! A cache is bound to the goal it was created for and is never shared
//! between goals.
//!
//! # Usage
//!
//! ```
//! use pig_solver::game::{GameState, Goal, Player};
//! use pig_solver::solver::{PigSolver, UtilityKind};
//!
//! let solver = PigSolver::new(Goal::new(40).unwrap());
//! let state = GameState::new(Player::First, 25, 32, 8);
//! let p = solver.solve(&state, UtilityKind::WinProbability);
//! assert!((p - 0.736357).abs() < 1e-4);
//! ```

pub mod policy;
#[allow(clippy::module_inception)]
pub mod solver;
pub mod storage;
pub mod utility;

pub use policy::{Disagreement, PigSolver, PolicyComparison};
pub use solver::ValueSolver;
pub use storage::{CacheStats, StateKey, ValueCache};
pub use utility::{ScoreDifferential, Utility, UtilityKind, WinProbability};
