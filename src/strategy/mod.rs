//! Decision makers for Pig.
//!
//! Any type implementing [`Strategy`] can take a seat in a match. A
//! strategy maps the state it is shown, always from its own seat, to an
//! [`Action`]. Returning a [`RuleViolation`] instead forfeits the match.
//!
//! ## Available Strategies
//!
//! - [`HoldAt`]: hold once pending reaches a threshold or the goal is in reach
//! - [`RandomChoice`]: roll or hold with equal probability
//! - [`OptimalStrategy`]: follow a [`ValueSolver`](crate::solver::ValueSolver)
//! - [`FnStrategy`]: a named function, e.g. [`always_roll`] and [`always_hold`]
//!
//! [`build_strategy`] turns textual specs such as `"hold_at(20)"` into
//! strategy objects.

use std::fmt;

use crate::game::{Action, GameState, RuleViolation};

pub mod function;
pub mod optimal;
pub mod random;
pub mod registry;
pub mod threshold;

pub use function::{always_hold, always_roll, FnStrategy};
pub use optimal::{OptimalDiff, OptimalStrategy, OptimalWin};
pub use random::RandomChoice;
pub use registry::build_strategy;
pub use threshold::HoldAt;

/// A player's policy.
///
/// Strategies are shared between threads by the tournament, so they must
/// be `Send + Sync`; any internal state (an RNG, a solver cache) needs
/// interior mutability.
pub trait Strategy: Send + Sync {
    /// Stable display name, used to report winners.
    fn name(&self) -> &str;

    /// Choose an action for the mover of `state`.
    fn decide(&self, state: &GameState) -> Result<Action, RuleViolation>;
}

impl fmt::Debug for dyn Strategy + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Strategy({})", self.name())
    }
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn decide(&self, state: &GameState) -> Result<Action, RuleViolation> {
        (**self).decide(state)
    }
}

impl<S: Strategy + ?Sized> Strategy for std::sync::Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn decide(&self, state: &GameState) -> Result<Action, RuleViolation> {
        (**self).decide(state)
    }
}
