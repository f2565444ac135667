//! Match simulator.
//!
//! A match is a loop over decision points. Before every decision the
//! banked scores are checked against the goal; the player to move is then
//! asked for an action, which is applied with the next die value when it is
//! a roll. A strategy that answers with something other than roll or hold
//! loses on the spot.

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use crate::game::{Action, GameState, Goal, Player, RuleViolation, DIE_FACES};
use crate::strategy::Strategy;

/// Problems that stop a simulation before it reaches a result.
///
/// These indicate a malformed setup, not a game outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// A finite die source ran out mid-match.
    #[error("die source exhausted after {rolls} rolls")]
    DiceExhausted {
        /// Rolls consumed before running out.
        rolls: usize,
    },

    /// A die source produced a face outside 1..=6.
    #[error("die source produced {0}, outside 1..=6")]
    InvalidDieFace(u8),

    /// The decision limit was reached without a winner.
    #[error("no winner after {0} decisions")]
    DecisionLimit(u64),

    /// A seat could not be filled.
    #[error("failed to set up match: {0}")]
    Setup(String),
}

/// How a match ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Victory {
    /// The winner banked the goal.
    ReachedGoal,
    /// The loser broke the rules.
    Forfeit(String),
}

/// Result of a finished match.
#[derive(Debug)]
pub struct MatchOutcome<'a> {
    /// The winning strategy.
    pub winner: &'a dyn Strategy,
    /// The losing strategy.
    pub loser: &'a dyn Strategy,
    /// Seat of the winner.
    pub winning_seat: Player,
    /// How the match was decided.
    pub victory: Victory,
    /// State when the match ended.
    pub final_state: GameState,
    /// Decisions asked of the strategies.
    pub decisions: u64,
    /// Dice consumed.
    pub rolls: usize,
}

impl MatchOutcome<'_> {
    /// Whether the match ended by forfeit.
    pub fn is_forfeit(&self) -> bool {
        matches!(self.victory, Victory::Forfeit(_))
    }
}

/// Plays matches to a fixed goal.
#[derive(Debug, Clone, Copy)]
pub struct MatchRunner {
    goal: Goal,
    decision_limit: Option<u64>,
}

impl MatchRunner {
    /// Create a runner with no decision limit.
    pub fn new(goal: Goal) -> Self {
        Self {
            goal,
            decision_limit: None,
        }
    }

    /// Builder method: cap the number of decisions per match.
    pub fn with_decision_limit(mut self, limit: Option<u64>) -> Self {
        self.decision_limit = limit;
        self
    }

    /// The goal matches are played to.
    pub fn goal(&self) -> Goal {
        self.goal
    }

    /// Play `first` (moving first) against `second`.
    pub fn play<'a, D>(
        &self,
        first: &'a dyn Strategy,
        second: &'a dyn Strategy,
        dice: &mut D,
    ) -> Result<MatchOutcome<'a>, MatchError>
    where
        D: Iterator<Item = u8> + ?Sized,
    {
        let seats = [first, second];
        let mut state = GameState::initial();
        let mut decisions = 0u64;
        let mut rolls = 0usize;

        loop {
            if let Some(winner) = state.winner(self.goal) {
                let outcome = MatchOutcome {
                    winner: seats[winner.index()],
                    loser: seats[winner.other().index()],
                    winning_seat: winner,
                    victory: Victory::ReachedGoal,
                    final_state: state,
                    decisions,
                    rolls,
                };
                debug!(
                    "{} beat {} {}-{} after {} decisions",
                    outcome.winner.name(),
                    outcome.loser.name(),
                    state.score_of(winner),
                    state.score_of(winner.other()),
                    decisions
                );
                return Ok(outcome);
            }

            if let Some(limit) = self.decision_limit {
                if decisions >= limit {
                    return Err(MatchError::DecisionLimit(limit));
                }
            }

            let mover = state.mover;
            let strategy = seats[mover.index()];
            decisions += 1;

            match strategy.decide(&state) {
                Ok(Action::Hold) => state = state.hold(),
                Ok(Action::Roll) => {
                    let die = dice.next().ok_or(MatchError::DiceExhausted { rolls })?;
                    if !(1..=DIE_FACES).contains(&die) {
                        return Err(MatchError::InvalidDieFace(die));
                    }
                    rolls += 1;
                    state = state.roll(die);
                }
                Err(violation) => {
                    return Ok(self.forfeit(seats, state, violation, decisions, rolls));
                }
            }
        }
    }

    fn forfeit<'a>(
        &self,
        seats: [&'a dyn Strategy; 2],
        state: GameState,
        violation: RuleViolation,
        decisions: u64,
        rolls: usize,
    ) -> MatchOutcome<'a> {
        let offender = state.mover;
        let winner = offender.other();
        warn!(
            "{} forfeits to {}: {}",
            seats[offender.index()].name(),
            seats[winner.index()].name(),
            violation
        );

        MatchOutcome {
            winner: seats[winner.index()],
            loser: seats[offender.index()],
            winning_seat: winner,
            victory: Victory::Forfeit(violation.to_string()),
            final_state: state,
            decisions,
            rolls,
        }
    }
}

/// Play a single match to `goal` with no decision limit.
pub fn play_match<'a, D>(
    goal: Goal,
    first: &'a dyn Strategy,
    second: &'a dyn Strategy,
    dice: &mut D,
) -> Result<MatchOutcome<'a>, MatchError>
where
    D: Iterator<Item = u8> + ?Sized,
{
    MatchRunner::new(goal).play(first, second, dice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Action, RuleViolation};
    use crate::simulation::dice::{FixedDice, RandomDie};
    use crate::solver::PigSolver;
    use crate::strategy::{always_hold, always_roll, FnStrategy, HoldAt, OptimalWin, RandomChoice};

    fn goal(g: u32) -> Goal {
        Goal::new(g).unwrap()
    }

    fn same(a: &dyn Strategy, b: &dyn Strategy) -> bool {
        std::ptr::addr_eq(a, b)
    }

    #[test]
    fn test_always_roll_beats_always_hold() {
        let holder = always_hold();
        let roller = always_roll();

        for trial in 0..20u64 {
            let mut dice = RandomDie::seeded(trial);
            let outcome = play_match(goal(50), &holder, &roller, &mut dice).unwrap();
            assert!(same(outcome.winner, &roller));
            assert_eq!(outcome.winning_seat, Player::Second);

            let mut dice = RandomDie::seeded(trial + 1_000);
            let outcome = play_match(goal(50), &roller, &holder, &mut dice).unwrap();
            assert_eq!(outcome.winner.name(), "always_roll");
            assert_eq!(outcome.victory, Victory::ReachedGoal);
        }
    }

    #[test]
    fn test_nine_sixes_is_deterministic() {
        let hold_at = HoldAt::new(50, goal(50));
        let random = RandomChoice::new(None);

        for _ in 0..5 {
            let mut dice = FixedDice::new(vec![6; 9]).unwrap();
            let outcome = play_match(goal(50), &hold_at, &random, &mut dice).unwrap();

            assert!(same(outcome.winner, &hold_at));
            assert_eq!(outcome.winner.name(), "hold_at(50)");
            assert_eq!(outcome.rolls, 9);
            assert_eq!(outcome.decisions, 10);
            assert_eq!(outcome.final_state, GameState::new(Player::Second, 0, 54, 0));
            assert_eq!(dice.remaining(), 0);
        }
    }

    #[test]
    fn test_restarted_dice_replay_match() {
        let a = HoldAt::new(10, goal(30));
        let b = HoldAt::new(15, goal(30));
        let rolls: Vec<u8> = RandomDie::seeded(5).take(500).collect();
        let mut dice = FixedDice::new(rolls).unwrap();

        let first = play_match(goal(30), &a, &b, &mut dice).unwrap();
        let used = dice.consumed();
        let first_state = first.final_state;
        dice.restart();
        let second = play_match(goal(30), &a, &b, &mut dice).unwrap();

        assert_eq!(second.final_state, first_state);
        assert_eq!(dice.consumed(), used);
    }

    #[test]
    fn test_dice_exhaustion_is_an_error() {
        let a = always_roll();
        let b = always_roll();
        let mut dice = FixedDice::new(vec![3, 4, 5]).unwrap();

        let result = play_match(goal(50), &a, &b, &mut dice);
        assert_eq!(result.unwrap_err(), MatchError::DiceExhausted { rolls: 3 });
    }

    #[test]
    fn test_out_of_range_die_is_an_error() {
        let a = always_roll();
        let b = always_roll();
        let mut dice = vec![2u8, 9].into_iter();

        let result = play_match(goal(50), &a, &b, &mut dice);
        assert_eq!(result.unwrap_err(), MatchError::InvalidDieFace(9));
    }

    #[test]
    fn test_rule_violation_forfeits() {
        let cheat = FnStrategy::new("cheat", |state| {
            if state.pending >= 8 {
                "double".parse()
            } else {
                Ok(Action::Roll)
            }
        });
        let honest = HoldAt::new(20, goal(50));
        let mut dice = FixedDice::new(vec![4, 4, 4]).unwrap();

        let outcome = play_match(goal(50), &cheat, &honest, &mut dice).unwrap();

        assert!(same(outcome.winner, &honest));
        assert!(same(outcome.loser, &cheat));
        assert!(outcome.is_forfeit());
        assert_eq!(
            outcome.victory,
            Victory::Forfeit(RuleViolation::UnknownAction("double".to_string()).to_string())
        );
        // the forfeit happens before any further die is drawn
        assert_eq!(outcome.rolls, 2);
        assert_eq!(dice.remaining(), 1);
    }

    #[test]
    fn test_mutual_holding_hits_decision_limit() {
        let a = always_hold();
        let b = always_hold();
        let runner = MatchRunner::new(goal(50)).with_decision_limit(Some(100));

        let result = runner.play(&a, &b, &mut RandomDie::seeded(1));
        assert_eq!(result.unwrap_err(), MatchError::DecisionLimit(100));
    }

    #[test]
    fn test_optimal_beats_random_mostly() {
        let solver = PigSolver::new(goal(40));
        let optimal = OptimalWin::new(solver.win_solver());
        let random = RandomChoice::new(Some(17));

        let mut wins = 0;
        for trial in 0..100u64 {
            let mut dice = RandomDie::seeded(trial);
            let (first, second): (&dyn Strategy, &dyn Strategy) = if trial % 2 == 0 {
                (&optimal, &random)
            } else {
                (&random, &optimal)
            };
            let outcome = play_match(goal(40), first, second, &mut dice).unwrap();
            if outcome.winner.name() == "optimal_win" {
                wins += 1;
            }
        }

        assert!(wins >= 85, "optimal won {} of 100", wins);
    }
}
