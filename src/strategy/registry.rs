//! Build strategies from textual specs.
//!
//! Recognized specs:
//!
//! | spec              | strategy                     |
//! |-------------------|------------------------------|
//! | `hold_at(N)`      | [`HoldAt`] with threshold N  |
//! | `random`          | [`RandomChoice`]             |
//! | `optimal_win`     | [`OptimalWin`]               |
//! | `optimal_diff`    | [`OptimalDiff`]              |
//! | `always_roll`     | [`always_roll`]              |
//! | `always_hold`     | [`always_hold`]              |

use std::sync::Arc;

use crate::game::ConfigError;
use crate::solver::PigSolver;
use crate::strategy::{
    always_hold, always_roll, HoldAt, OptimalDiff, OptimalWin, RandomChoice, Strategy,
};

/// Resolve `spec` into a strategy playing to the solver's goal.
///
/// Optimal strategies share the caches of `solver`. `seed` seeds the
/// random strategy.
pub fn build_strategy(
    spec: &str,
    solver: &PigSolver,
    seed: Option<u64>,
) -> Result<Arc<dyn Strategy>, ConfigError> {
    let spec = spec.trim();

    let strategy: Arc<dyn Strategy> = match spec {
        "random" | "random_choice" => Arc::new(RandomChoice::new(seed)),
        "optimal_win" => Arc::new(OptimalWin::new(solver.win_solver())),
        "optimal_diff" => Arc::new(OptimalDiff::new(solver.diff_solver())),
        "always_roll" => Arc::new(always_roll()),
        "always_hold" => Arc::new(always_hold()),
        _ => {
            let threshold = spec
                .strip_prefix("hold_at(")
                .and_then(|rest| rest.strip_suffix(')'))
                .and_then(|n| n.trim().parse::<u32>().ok())
                .ok_or_else(|| ConfigError::UnknownStrategy(spec.to_string()))?;
            Arc::new(HoldAt::new(threshold, solver.goal()))
        }
    };

    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Goal;

    #[test]
    fn test_known_specs() {
        let solver = PigSolver::new(Goal::new(40).unwrap());
        for (spec, name) in [
            ("hold_at(20)", "hold_at(20)"),
            (" hold_at( 7 ) ", "hold_at(7)"),
            ("random", "random_choice"),
            ("optimal_win", "optimal_win"),
            ("optimal_diff", "optimal_diff"),
            ("always_roll", "always_roll"),
            ("always_hold", "always_hold"),
        ] {
            let strategy = build_strategy(spec, &solver, Some(1)).unwrap();
            assert_eq!(strategy.name(), name);
        }
    }

    #[test]
    fn test_unknown_specs() {
        let solver = PigSolver::new(Goal::new(40).unwrap());
        for spec in ["hold_at", "hold_at(x)", "hold_at(-3)", "gambler", ""] {
            assert!(matches!(
                build_strategy(spec, &solver, None),
                Err(ConfigError::UnknownStrategy(_))
            ));
        }
    }
}
