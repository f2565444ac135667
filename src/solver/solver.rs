//! Exhaustive expected-utility solver.
//!
//! The value of a state to its mover is
//!
//! ```text
//! U(s) = terminal(s)                      if s is terminal
//!      = max_{a in legal(s)} Q(s, a)      otherwise
//!
//! Q(s, hold) = c(U(hold(s)))
//! Q(s, roll) = ( c(U(roll(s, 1))) + sum_{d=2..6} U(roll(s, d)) ) / 6
//! ```
//!
//! where `c` maps a value from the next mover's seat back to the current
//! mover (`1 - v` for win probability, `-v` for the score margin).
//!
//! Every edge either raises `pending` or resets it while raising a banked
//! score, and the terminal guard fires as soon as a total reaches the
//! goal, so the recursion always bottoms out. Memoization makes the cost
//! proportional to the number of distinct `(me, you, pending)` triples.

use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;

use crate::game::{Action, ConfigError, GameState, Goal, Player, DIE_FACES};
use crate::solver::storage::{CacheStats, StateKey, ValueCache};
use crate::solver::utility::{Utility, UtilityKind};

/// Memoized solver for one utility and one goal.
///
/// # Example
/// ```
/// use pig_solver::game::{Action, GameState, Goal, Player};
/// use pig_solver::solver::{ValueSolver, WinProbability};
///
/// let solver = ValueSolver::<WinProbability>::new(Goal::new(40).unwrap());
/// let state = GameState::new(Player::First, 31, 22, 9);
/// assert_eq!(solver.best_action(&state), Action::Hold);
/// ```
#[derive(Debug)]
pub struct ValueSolver<U: Utility> {
    goal: Goal,
    utility: U,
    cache: ValueCache,
}

impl<U: Utility> ValueSolver<U> {
    /// Create a solver with an empty cache.
    pub fn new(goal: Goal) -> Self {
        Self {
            goal,
            utility: U::default(),
            cache: ValueCache::new(goal),
        }
    }

    /// Create a solver around an existing cache.
    ///
    /// A cache is only valid for the goal it was filled under.
    pub fn with_cache(goal: Goal, cache: ValueCache) -> Result<Self, ConfigError> {
        if cache.goal() != goal {
            return Err(ConfigError::GoalMismatch {
                cache: cache.goal().get(),
                solver: goal.get(),
            });
        }

        Ok(Self {
            goal,
            utility: U::default(),
            cache,
        })
    }

    /// Number of non-terminal `(me, you, pending)` triples for `goal`.
    pub fn state_count(goal: Goal) -> usize {
        let g = goal.get() as usize;
        // me in 0..g, you in 0..g, pending in 0..(g - me)
        g * g * (g + 1) / 2
    }

    /// The goal this solver plays to.
    pub fn goal(&self) -> Goal {
        self.goal
    }

    /// The utility this solver maximizes.
    pub fn kind(&self) -> UtilityKind {
        U::KIND
    }

    /// Value of `state` to its mover under optimal play by both sides.
    pub fn value(&self, state: &GameState) -> f64 {
        if let Some(value) = self.utility.terminal_value(state, self.goal) {
            return value;
        }

        match self.cache.lookup(&StateKey::from(state)) {
            Some(value) => value,
            None => self.fill(*state),
        }
    }

    /// Solve `root` and everything it depends on that is not cached yet.
    ///
    /// Uses an explicit work stack: a state is only evaluated once all of
    /// its successors are terminal or cached, so evaluating it never
    /// recurses more than one level, however long the chain of turns below
    /// it is.
    fn fill(&self, root: GameState) -> f64 {
        let mut stack = vec![root];
        let mut value = f64::NAN;

        while let Some(state) = stack.pop() {
            let missing: Vec<GameState> = successors(&state)
                .filter(|next| self.needs_solving(next))
                .collect();

            if missing.is_empty() {
                value = self
                    .cache
                    .get_or_compute(StateKey::from(&state), || self.best(&state).1);
            } else {
                stack.push(state);
                stack.extend(missing);
            }
        }

        value
    }

    fn needs_solving(&self, state: &GameState) -> bool {
        self.utility.terminal_value(state, self.goal).is_none()
            && !self.cache.contains(&StateKey::from(state))
    }

    /// Expected utility of taking `action` in `state`.
    pub fn q_value(&self, state: &GameState, action: Action) -> f64 {
        match action {
            Action::Hold => self.utility.complement(self.value(&state.hold())),
            Action::Roll => {
                let pig_out = self.utility.complement(self.value(&state.roll(1)));
                let gains: f64 = (2..=DIE_FACES).map(|d| self.value(&state.roll(d))).sum();
                (pig_out + gains) / f64::from(DIE_FACES)
            }
        }
    }

    /// The legal action with the highest expected utility.
    ///
    /// Ties go to the action listed first, so `roll` beats an equal `hold`.
    pub fn best_action(&self, state: &GameState) -> Action {
        self.best(state).0
    }

    /// Expected utility of each legal action, in enumeration order.
    pub fn action_values(&self, state: &GameState) -> Vec<(Action, f64)> {
        state
            .legal_actions()
            .iter()
            .map(|&action| (action, self.q_value(state, action)))
            .collect()
    }

    fn best(&self, state: &GameState) -> (Action, f64) {
        let mut best = (Action::Roll, f64::NEG_INFINITY);
        for &action in state.legal_actions() {
            let q = self.q_value(state, action);
            if q > best.1 {
                best = (action, q);
            }
        }
        best
    }

    /// Solve every non-terminal triple.
    ///
    /// States are swept by descending `me + you`, then descending pending.
    /// Every successor of a state either has a larger score sum or the same
    /// sum with more pending, so it is already cached when the state is
    /// reached and recursion never goes deeper than one level. Triples that
    /// share a score sum are independent and solved in parallel.
    pub fn warm_up(&self) -> CacheStats {
        let start = Instant::now();
        let goal = self.goal.get();
        let missing = Self::state_count(self.goal).saturating_sub(self.cache.len());
        self.cache.reserve(missing);

        for sum in (0..=2 * (goal - 1)).rev() {
            let low = sum.saturating_sub(goal - 1);
            let high = sum.min(goal - 1);

            (low..=high).into_par_iter().for_each(|me| {
                let you = sum - me;
                for pending in (0..goal - me).rev() {
                    self.value(&GameState::new(Player::First, me, you, pending));
                }
            });
        }

        let stats = self.cache.stats();
        info!(
            "warmed {} cache for goal {}: {} states (~{} KiB) in {:.2}s",
            U::KIND,
            self.goal,
            stats.entries,
            self.cache.memory_usage() / 1024,
            start.elapsed().as_secs_f64()
        );
        stats
    }

    /// Cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Get reference to the cache for analysis.
    pub fn cache(&self) -> &ValueCache {
        &self.cache
    }

    /// Take the cache out of the solver.
    pub fn into_cache(self) -> ValueCache {
        debug!("releasing {} cache with {} entries", U::KIND, self.cache.len());
        self.cache
    }
}

/// Every state the solver can move to from `state`.
///
/// Holding on zero pending is left out: it would hand the mirrored
/// position back and forth forever.
fn successors(state: &GameState) -> impl Iterator<Item = GameState> + '_ {
    let hold = (state.pending > 0).then(|| state.hold());
    hold.into_iter().chain((1..=DIE_FACES).map(move |d| state.roll(d)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::utility::{ScoreDifferential, WinProbability};

    const TOLERANCE: f64 = 1e-4;

    fn state(p: usize, me: u32, you: u32, pending: u32) -> GameState {
        GameState::new(Player::from_index(p).unwrap(), me, you, pending)
    }

    fn win_solver(goal: u32) -> ValueSolver<WinProbability> {
        ValueSolver::new(Goal::new(goal).unwrap())
    }

    #[test]
    fn test_terminal_values() {
        let solver = win_solver(40);
        assert_eq!(solver.value(&state(0, 42, 25, 0)), 1.0);
        assert_eq!(solver.value(&state(1, 12, 43, 0)), 0.0);
        assert!(solver.cache().is_empty());
    }

    #[test]
    fn test_interior_values() {
        let solver = win_solver(40);

        let v = solver.value(&state(0, 25, 32, 8));
        assert!((v - 0.736357).abs() < TOLERANCE, "got {}", v);

        let v = solver.value(&state(0, 19, 35, 4));
        assert!((v - 0.493174).abs() < TOLERANCE, "got {}", v);
    }

    #[test]
    fn test_best_actions() {
        let solver = win_solver(40);
        assert_eq!(solver.best_action(&state(0, 31, 22, 9)), Action::Hold);
        assert_eq!(solver.best_action(&state(1, 5, 34, 4)), Action::Roll);
    }

    #[test]
    fn test_best_action_matches_max_q() {
        let solver = win_solver(40);
        let s = state(0, 20, 20, 14);
        let values = solver.action_values(&s);
        assert_eq!(values.len(), 2);

        let best = solver.best_action(&s);
        let best_q = values.iter().find(|(a, _)| *a == best).unwrap().1;
        assert!(values.iter().all(|&(_, q)| q <= best_q));
        assert_eq!(solver.value(&s), best_q);
    }

    #[test]
    fn test_zero_pending_never_holds() {
        let solver = win_solver(30);
        for me in 0..30 {
            for you in 0..30 {
                assert_eq!(solver.best_action(&state(0, me, you, 0)), Action::Roll);
            }
        }
    }

    #[test]
    fn test_win_probabilities_are_probabilities() {
        let solver = win_solver(25);
        solver.warm_up();
        for me in 0..25 {
            for you in 0..25 {
                for pending in 0..(25 - me) {
                    let v = solver.value(&state(0, me, you, pending));
                    assert!(
                        v > -1e-12 && v < 1.0 + 1e-12,
                        "{} {} {} -> {}",
                        me,
                        you,
                        pending,
                        v
                    );
                }
            }
        }
    }

    #[test]
    fn test_value_ignores_mover() {
        let solver = win_solver(40);
        let a = solver.value(&state(0, 17, 23, 6));
        let b = solver.value(&state(1, 17, 23, 6));
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_requery_is_bit_identical() {
        let solver = win_solver(40);
        let s = state(0, 25, 32, 8);
        let first = solver.value(&s);
        solver.warm_up();
        let second = solver.value(&s);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_warm_up_matches_lazy_solving() {
        let warmed = win_solver(40);
        warmed.warm_up();
        let lazy = win_solver(40);

        for s in [state(0, 25, 32, 8), state(1, 0, 0, 0), state(0, 39, 39, 0)] {
            assert!((warmed.value(&s) - lazy.value(&s)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cache_size_bound() {
        let solver = win_solver(40);
        solver.value(&GameState::initial());
        let lazy_entries = solver.cache().len();
        assert!(lazy_entries <= 50_000, "{} entries", lazy_entries);

        let stats = solver.warm_up();
        assert!(stats.entries <= 50_000, "{} entries", stats.entries);
        assert_eq!(stats.entries, ValueSolver::<WinProbability>::state_count(solver.goal()));
    }

    #[test]
    fn test_goal_mismatch_rejected() {
        let cache = ValueCache::new(Goal::new(40).unwrap());
        let result = ValueSolver::<WinProbability>::with_cache(Goal::new(50).unwrap(), cache);
        assert!(matches!(
            result,
            Err(ConfigError::GoalMismatch { cache: 40, solver: 50 })
        ));
    }

    #[test]
    fn test_cache_reused_for_same_goal() {
        let goal = Goal::new(30).unwrap();
        let solver = ValueSolver::<WinProbability>::new(goal);
        let before = solver.value(&GameState::initial());
        let entries = solver.cache().len();

        let reused = ValueSolver::<WinProbability>::with_cache(goal, solver.into_cache()).unwrap();
        assert_eq!(reused.cache().len(), entries);
        assert_eq!(reused.value(&GameState::initial()).to_bits(), before.to_bits());
    }

    #[test]
    fn test_first_player_advantage() {
        let solver = win_solver(40);
        let v = solver.value(&GameState::initial());
        assert!(v > 0.5 && v < 0.65, "got {}", v);
    }

    #[test]
    fn test_differential_is_antisymmetric_at_start_of_turn() {
        let solver = ValueSolver::<ScoreDifferential>::new(Goal::new(20).unwrap());
        // holding hands the opponent the mirrored position
        let s = state(0, 12, 7, 5);
        let q_hold = solver.q_value(&s, Action::Hold);
        assert_eq!(q_hold, -solver.value(&state(1, 7, 17, 0)));
    }

    #[test]
    fn test_differential_initial_value() {
        let solver = ValueSolver::<ScoreDifferential>::new(Goal::new(40).unwrap());
        let v = solver.value(&GameState::initial());
        assert!((v - 4.9217).abs() < 1e-3, "got {}", v);
    }

    #[test]
    fn test_differential_takes_sure_win() {
        let solver = ValueSolver::<ScoreDifferential>::new(Goal::new(40).unwrap());
        // holding now wins; a terminal margin is the best the mover can lock in
        let s = state(0, 35, 10, 5);
        assert_eq!(solver.value(&s), 30.0);
    }
}
