//! Solver facade selecting a utility at runtime, plus policy comparison.

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::game::{Action, GameState, Goal, Player};
use crate::solver::solver::ValueSolver;
use crate::solver::storage::CacheStats;
use crate::solver::utility::{ScoreDifferential, UtilityKind, WinProbability};

/// Both value solvers for one goal.
///
/// The solvers are reference counted so that optimal strategies can share
/// them with the facade and with each other.
///
/// # Example
/// ```
/// use pig_solver::game::{Action, GameState, Goal, Player};
/// use pig_solver::solver::{PigSolver, UtilityKind};
///
/// let solver = PigSolver::new(Goal::new(40).unwrap());
/// let state = GameState::new(Player::First, 42, 25, 0);
/// assert_eq!(solver.solve(&state, UtilityKind::WinProbability), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct PigSolver {
    goal: Goal,
    win: Arc<ValueSolver<WinProbability>>,
    diff: Arc<ValueSolver<ScoreDifferential>>,
}

impl PigSolver {
    /// Create both solvers with empty caches.
    pub fn new(goal: Goal) -> Self {
        Self {
            goal,
            win: Arc::new(ValueSolver::new(goal)),
            diff: Arc::new(ValueSolver::new(goal)),
        }
    }

    /// The goal both solvers play to.
    pub fn goal(&self) -> Goal {
        self.goal
    }

    /// Value of `state` to its mover under `kind`.
    pub fn solve(&self, state: &GameState, kind: UtilityKind) -> f64 {
        match kind {
            UtilityKind::WinProbability => self.win.value(state),
            UtilityKind::ScoreDifferential => self.diff.value(state),
        }
    }

    /// Best action for the mover of `state` under `kind`.
    pub fn best_action(&self, state: &GameState, kind: UtilityKind) -> Action {
        match kind {
            UtilityKind::WinProbability => self.win.best_action(state),
            UtilityKind::ScoreDifferential => self.diff.best_action(state),
        }
    }

    /// Expected utility of each legal action under `kind`.
    pub fn action_values(&self, state: &GameState, kind: UtilityKind) -> Vec<(Action, f64)> {
        match kind {
            UtilityKind::WinProbability => self.win.action_values(state),
            UtilityKind::ScoreDifferential => self.diff.action_values(state),
        }
    }

    /// Fill the cache for `kind`.
    pub fn warm_up(&self, kind: UtilityKind) -> CacheStats {
        match kind {
            UtilityKind::WinProbability => self.win.warm_up(),
            UtilityKind::ScoreDifferential => self.diff.warm_up(),
        }
    }

    /// Cache counters for `kind`.
    pub fn cache_stats(&self, kind: UtilityKind) -> CacheStats {
        match kind {
            UtilityKind::WinProbability => self.win.cache_stats(),
            UtilityKind::ScoreDifferential => self.diff.cache_stats(),
        }
    }

    /// Estimated cache memory for `kind`, in bytes.
    pub fn cache_memory_usage(&self, kind: UtilityKind) -> usize {
        match kind {
            UtilityKind::WinProbability => self.win.cache().memory_usage(),
            UtilityKind::ScoreDifferential => self.diff.cache().memory_usage(),
        }
    }

    /// Shared handle to the win-probability solver.
    pub fn win_solver(&self) -> Arc<ValueSolver<WinProbability>> {
        Arc::clone(&self.win)
    }

    /// Shared handle to the score-differential solver.
    pub fn diff_solver(&self) -> Arc<ValueSolver<ScoreDifferential>> {
        Arc::clone(&self.diff)
    }

    /// Count the states where the two utilities recommend different actions.
    ///
    /// Only decision points with something to hold are compared; on zero
    /// pending both policies must roll.
    pub fn compare_policies(&self, max_samples: usize) -> PolicyComparison {
        self.warm_up(UtilityKind::WinProbability);
        self.warm_up(UtilityKind::ScoreDifferential);

        let goal = self.goal.get();
        let mut comparison = PolicyComparison {
            goal,
            states: 0,
            disagreements: 0,
            samples: Vec::new(),
        };

        for me in 0..goal {
            for you in 0..goal {
                for pending in 1..(goal - me) {
                    let state = GameState::new(Player::First, me, you, pending);
                    let win = self.win.best_action(&state);
                    let diff = self.diff.best_action(&state);

                    comparison.states += 1;
                    if win != diff {
                        comparison.disagreements += 1;
                        if comparison.samples.len() < max_samples {
                            comparison.samples.push(Disagreement {
                                state,
                                win_probability: win,
                                score_differential: diff,
                            });
                        }
                    }
                }
            }
        }

        info!(
            "policies disagree in {} of {} states ({:.1}%) for goal {}",
            comparison.disagreements,
            comparison.states,
            comparison.disagreement_rate() * 100.0,
            goal
        );
        comparison
    }
}

/// A state where the two utilities pick different actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disagreement {
    /// The decision point.
    pub state: GameState,
    /// Action maximizing win probability.
    pub win_probability: Action,
    /// Action maximizing the expected score margin.
    pub score_differential: Action,
}

/// Summary of how the win-maximizing and margin-maximizing policies differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyComparison {
    /// Goal the policies were solved for.
    pub goal: u32,
    /// Decision points compared.
    pub states: usize,
    /// Decision points with different actions.
    pub disagreements: usize,
    /// The first few disagreements found.
    pub samples: Vec<Disagreement>,
}

impl PolicyComparison {
    /// Fraction of compared states where the policies differ.
    pub fn disagreement_rate(&self) -> f64 {
        if self.states == 0 {
            0.0
        } else {
            self.disagreements as f64 / self.states as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(p: usize, me: u32, you: u32, pending: u32) -> GameState {
        GameState::new(Player::from_index(p).unwrap(), me, you, pending)
    }

    #[test]
    fn test_facade_spot_checks() {
        let solver = PigSolver::new(Goal::new(40).unwrap());
        let win = UtilityKind::WinProbability;

        assert_eq!(solver.solve(&state(0, 42, 25, 0), win), 1.0);
        assert_eq!(solver.solve(&state(1, 12, 43, 0), win), 0.0);
        assert!((solver.solve(&state(0, 25, 32, 8), win) - 0.736357).abs() < 1e-4);
        assert!((solver.solve(&state(0, 19, 35, 4), win) - 0.493174).abs() < 1e-4);
        assert_eq!(solver.best_action(&state(0, 31, 22, 9), win), Action::Hold);
        assert_eq!(solver.best_action(&state(1, 5, 34, 4), win), Action::Roll);
    }

    #[test]
    fn test_caches_are_separate_per_utility() {
        let solver = PigSolver::new(Goal::new(30).unwrap());
        solver.solve(&GameState::initial(), UtilityKind::WinProbability);

        assert!(solver.cache_stats(UtilityKind::WinProbability).entries > 0);
        assert_eq!(solver.cache_stats(UtilityKind::ScoreDifferential).entries, 0);
    }

    #[test]
    fn test_shared_handles_see_same_cache() {
        let solver = PigSolver::new(Goal::new(30).unwrap());
        let handle = solver.win_solver();
        handle.value(&GameState::initial());
        assert_eq!(
            solver.cache_stats(UtilityKind::WinProbability).entries,
            handle.cache().len()
        );
    }

    #[test]
    fn test_utilities_agree_at_small_goals() {
        let comparison = PigSolver::new(Goal::new(30).unwrap()).compare_policies(5);
        assert_eq!(comparison.states, 30 * (29 * 30 / 2));
        assert_eq!(comparison.disagreements, 0);
        assert!(comparison.samples.is_empty());
    }

    #[test]
    fn test_large_goal_solves_lazily() {
        let solver = PigSolver::new(Goal::new(1000).unwrap());
        let state = GameState::new(Player::First, 995, 990, 0);

        let v = solver.solve(&state, UtilityKind::WinProbability);
        assert!(v > 0.5 && v < 1.0, "got {}", v);

        let entries = solver.cache_stats(UtilityKind::WinProbability).entries;
        assert!(entries < 1_000, "{} entries", entries);
        assert!(solver.cache_memory_usage(UtilityKind::WinProbability) > 0);
        assert_eq!(solver.cache_stats(UtilityKind::ScoreDifferential).entries, 0);
    }

    #[test]
    fn test_compare_policies() {
        let solver = PigSolver::new(Goal::new(40).unwrap());
        let comparison = solver.compare_policies(5);

        // pending runs over 1..(goal - me) for each (me, you)
        assert_eq!(comparison.states, 40 * (39 * 40 / 2));
        assert_eq!(comparison.disagreements, 3420);
        assert!(comparison.samples.len() <= 5);
        for sample in &comparison.samples {
            assert_ne!(sample.win_probability, sample.score_differential);
        }
        assert!(comparison.disagreement_rate() > 0.0 && comparison.disagreement_rate() < 1.0);
    }
}
