//! Strategies that follow the value solver.

use std::sync::Arc;

use crate::game::{Action, GameState, RuleViolation};
use crate::solver::{ScoreDifferential, Utility, UtilityKind, ValueSolver, WinProbability};
use crate::strategy::Strategy;

/// Play the action the solver rates highest under `U`.
#[derive(Debug)]
pub struct OptimalStrategy<U: Utility> {
    solver: Arc<ValueSolver<U>>,
}

/// Maximize the probability of winning.
pub type OptimalWin = OptimalStrategy<WinProbability>;

/// Maximize the expected final score margin.
pub type OptimalDiff = OptimalStrategy<ScoreDifferential>;

impl<U: Utility> OptimalStrategy<U> {
    /// Wrap a shared solver.
    pub fn new(solver: Arc<ValueSolver<U>>) -> Self {
        Self { solver }
    }

    /// The solver backing this strategy.
    pub fn solver(&self) -> &ValueSolver<U> {
        &self.solver
    }
}

impl<U: Utility> Clone for OptimalStrategy<U> {
    fn clone(&self) -> Self {
        Self {
            solver: Arc::clone(&self.solver),
        }
    }
}

impl<U: Utility> Strategy for OptimalStrategy<U> {
    fn name(&self) -> &str {
        match U::KIND {
            UtilityKind::WinProbability => "optimal_win",
            UtilityKind::ScoreDifferential => "optimal_diff",
        }
    }

    fn decide(&self, state: &GameState) -> Result<Action, RuleViolation> {
        Ok(self.solver.best_action(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Goal, Player};
    use crate::solver::PigSolver;

    #[test]
    fn test_optimal_win_spot_checks() {
        let solver = PigSolver::new(Goal::new(40).unwrap());
        let strategy = OptimalWin::new(solver.win_solver());

        assert_eq!(strategy.name(), "optimal_win");
        assert_eq!(
            strategy.decide(&GameState::new(Player::First, 31, 22, 9)),
            Ok(Action::Hold)
        );
        assert_eq!(
            strategy.decide(&GameState::new(Player::Second, 5, 34, 4)),
            Ok(Action::Roll)
        );
    }

    #[test]
    fn test_optimal_diff_agrees_with_facade() {
        let solver = PigSolver::new(Goal::new(30).unwrap());
        let strategy = OptimalDiff::new(solver.diff_solver());
        assert_eq!(strategy.name(), "optimal_diff");

        for pending in [0, 4, 9, 15, 22] {
            let state = GameState::new(Player::First, 6, 14, pending);
            assert_eq!(
                strategy.decide(&state),
                Ok(solver.best_action(&state, UtilityKind::ScoreDifferential))
            );
        }
    }

    #[test]
    fn test_never_holds_on_zero_pending() {
        let solver = PigSolver::new(Goal::new(30).unwrap());
        let strategy = OptimalWin::new(solver.win_solver());
        let state = GameState::new(Player::First, 29, 29, 0);
        assert_eq!(strategy.decide(&state), Ok(Action::Roll));
    }
}
