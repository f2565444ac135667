//! Round-robin tournaments.
//!
//! Every pair of roster entries plays `games_per_pair` matches, alternating
//! who moves first. Matches run in parallel with rayon. Each match builds
//! its own strategies and die from a seed derived from the tournament seed
//! and the match index, so a report depends only on the seed and never on
//! thread scheduling.
//!
//! A match that hits the decision limit is recorded as a stalemate.

use std::time::Instant;

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::{ConfigError, Goal, PigConfig, Player};
use crate::simulation::dice::RandomDie;
use crate::simulation::play::{MatchError, MatchRunner};
use crate::solver::PigSolver;
use crate::strategy::build_strategy;

/// Results of one pairing, seen from the roster entry listed first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingResult {
    /// Roster entry listed first.
    pub first: String,
    /// Roster entry listed second.
    pub second: String,
    /// Matches played.
    pub games: usize,
    /// Matches won by `first`.
    pub first_wins: usize,
    /// Matches won by `second`.
    pub second_wins: usize,
    /// Matches that hit the decision limit.
    pub stalemates: usize,
    /// Matches decided by forfeit.
    pub forfeits: usize,
}

/// Aggregate record of one roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// Roster entry.
    pub name: String,
    /// Matches won.
    pub wins: usize,
    /// Matches lost, forfeits included.
    pub losses: usize,
    /// Matches lost by forfeit.
    pub forfeits: usize,
    /// Matches that hit the decision limit.
    pub stalemates: usize,
}

impl Standing {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            wins: 0,
            losses: 0,
            forfeits: 0,
            stalemates: 0,
        }
    }

    /// Matches played.
    pub fn games(&self) -> usize {
        self.wins + self.losses + self.stalemates
    }

    /// Share of played matches won.
    pub fn win_rate(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            games => self.wins as f64 / games as f64,
        }
    }
}

/// Full tournament result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentReport {
    /// Goal every match was played to.
    pub goal: u32,
    /// Seed all match seeds were derived from.
    pub seed: u64,
    /// Matches per pairing.
    pub games_per_pair: usize,
    /// One entry per unordered pair, in roster order.
    pub pairings: Vec<PairingResult>,
    /// One entry per roster entry, most wins first.
    pub standings: Vec<Standing>,
}

impl TournamentReport {
    /// Total matches played.
    pub fn total_games(&self) -> usize {
        self.pairings.iter().map(|p| p.games).sum()
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// How a single match ended, by roster index.
#[derive(Debug, Clone, Copy)]
enum MatchRecord {
    Won {
        pairing: usize,
        winner: usize,
        loser: usize,
        forfeit: bool,
    },
    Stalemate {
        pairing: usize,
    },
}

/// A configured round-robin.
#[derive(Debug, Clone)]
pub struct Tournament {
    solver: PigSolver,
    roster: Vec<String>,
    games_per_pair: usize,
    seed: u64,
    decision_limit: Option<u64>,
}

impl Tournament {
    /// Create a tournament over `roster`, playing to the solver's goal.
    ///
    /// Every roster entry must be a known strategy spec, appear once, and
    /// there must be at least two of them.
    pub fn new<I, S>(solver: PigSolver, roster: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roster: Vec<String> = roster
            .into_iter()
            .map(|s| s.into().trim().to_string())
            .collect();

        if roster.len() < 2 {
            return Err(ConfigError::InvalidTournament(format!(
                "need at least two strategies, got {}",
                roster.len()
            )));
        }
        for (i, spec) in roster.iter().enumerate() {
            if roster[..i].contains(spec) {
                return Err(ConfigError::InvalidTournament(format!(
                    "'{}' appears more than once",
                    spec
                )));
            }
            build_strategy(spec, &solver, None)?;
        }

        Ok(Self {
            solver,
            roster,
            games_per_pair: 1,
            seed: rand::random(),
            decision_limit: None,
        })
    }

    /// Create a tournament from a validated configuration.
    pub fn from_config(config: &PigConfig, solver: PigSolver) -> Result<Self, ConfigError> {
        config.validate()?;
        let goal = config.goal()?;
        if solver.goal() != goal {
            return Err(ConfigError::GoalMismatch {
                cache: solver.goal().get(),
                solver: goal.get(),
            });
        }

        let mut tournament = Self::new(solver, config.roster.iter().cloned())?
            .with_games_per_pair(config.games_per_pair)?
            .with_decision_limit(config.decision_limit);
        if let Some(seed) = config.seed {
            tournament = tournament.with_seed(seed);
        }
        Ok(tournament)
    }

    /// Builder method: set matches per pairing (must be positive).
    pub fn with_games_per_pair(mut self, games: usize) -> Result<Self, ConfigError> {
        if games == 0 {
            return Err(ConfigError::InvalidTournament(
                "games per pair must be positive".to_string(),
            ));
        }
        self.games_per_pair = games;
        Ok(self)
    }

    /// Builder method: set the tournament seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method: cap decisions per match.
    pub fn with_decision_limit(mut self, limit: Option<u64>) -> Self {
        self.decision_limit = limit;
        self
    }

    /// Goal matches are played to.
    pub fn goal(&self) -> Goal {
        self.solver.goal()
    }

    /// Seed the matches derive from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Roster entries in order.
    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    /// Unordered pairs of roster indices.
    fn pairings(&self) -> Vec<(usize, usize)> {
        let n = self.roster.len();
        (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect()
    }

    /// Number of matches a run plays.
    pub fn match_count(&self) -> usize {
        let n = self.roster.len();
        n * (n - 1) / 2 * self.games_per_pair
    }

    /// Play every match.
    pub fn run(&self) -> Result<TournamentReport, MatchError> {
        self.run_with_progress(|| {})
    }

    /// Play every match, calling `progress` once per finished match.
    pub fn run_with_progress<F>(&self, progress: F) -> Result<TournamentReport, MatchError>
    where
        F: Fn() + Sync,
    {
        let start = Instant::now();
        let pairings = self.pairings();
        let total = pairings.len() * self.games_per_pair;

        info!(
            "Tournament: {} strategies, {} pairings, {} matches to goal {} (seed {})",
            self.roster.len(),
            pairings.len(),
            total,
            self.goal(),
            self.seed
        );

        let records = (0..total)
            .into_par_iter()
            .map(|index| {
                let record = self.play_one(&pairings, index);
                progress();
                record
            })
            .collect::<Result<Vec<_>, _>>()?;

        let report = self.tally(&pairings, &records);

        info!(
            "Tournament finished in {:.2}s, leader: {}",
            start.elapsed().as_secs_f64(),
            report
                .standings
                .first()
                .map(|s| s.name.as_str())
                .unwrap_or("-")
        );

        Ok(report)
    }

    fn play_one(
        &self,
        pairings: &[(usize, usize)],
        index: usize,
    ) -> Result<MatchRecord, MatchError> {
        let pairing = index / self.games_per_pair;
        let game = index % self.games_per_pair;
        let (a, b) = pairings[pairing];
        let (first, second) = if game % 2 == 0 { (a, b) } else { (b, a) };

        let seed = match_seed(self.seed, index as u64);
        let die_seed = match_seed(seed, 0);

        let build = |idx: usize, salt: u64| {
            build_strategy(&self.roster[idx], &self.solver, Some(match_seed(seed, salt)))
                .map_err(|e| MatchError::Setup(e.to_string()))
        };
        let first_strategy = build(first, 1)?;
        let second_strategy = build(second, 2)?;

        let runner = MatchRunner::new(self.goal()).with_decision_limit(self.decision_limit);
        let mut dice = RandomDie::seeded(die_seed);

        match runner.play(&*first_strategy, &*second_strategy, &mut dice) {
            Ok(outcome) => {
                let (winner, loser) = match outcome.winning_seat {
                    Player::First => (first, second),
                    Player::Second => (second, first),
                };
                Ok(MatchRecord::Won {
                    pairing,
                    winner,
                    loser,
                    forfeit: outcome.is_forfeit(),
                })
            }
            Err(MatchError::DecisionLimit(_)) => Ok(MatchRecord::Stalemate { pairing }),
            Err(e) => Err(e),
        }
    }

    fn tally(&self, pairings: &[(usize, usize)], records: &[MatchRecord]) -> TournamentReport {
        let mut results: Vec<PairingResult> = pairings
            .iter()
            .map(|&(a, b)| PairingResult {
                first: self.roster[a].clone(),
                second: self.roster[b].clone(),
                games: 0,
                first_wins: 0,
                second_wins: 0,
                stalemates: 0,
                forfeits: 0,
            })
            .collect();
        let mut standings: Vec<Standing> = self.roster.iter().map(|s| Standing::new(s)).collect();

        for record in records {
            match *record {
                MatchRecord::Won {
                    pairing,
                    winner,
                    loser,
                    forfeit,
                } => {
                    let result = &mut results[pairing];
                    result.games += 1;
                    if winner == pairings[pairing].0 {
                        result.first_wins += 1;
                    } else {
                        result.second_wins += 1;
                    }
                    standings[winner].wins += 1;
                    standings[loser].losses += 1;
                    if forfeit {
                        result.forfeits += 1;
                        standings[loser].forfeits += 1;
                    }
                }
                MatchRecord::Stalemate { pairing } => {
                    let (a, b) = pairings[pairing];
                    results[pairing].games += 1;
                    results[pairing].stalemates += 1;
                    standings[a].stalemates += 1;
                    standings[b].stalemates += 1;
                }
            }
        }

        standings.sort_by(|x, y| y.wins.cmp(&x.wins));

        TournamentReport {
            goal: self.goal().get(),
            seed: self.seed,
            games_per_pair: self.games_per_pair,
            pairings: results,
            standings,
        }
    }
}

/// SplitMix64 step, used to spread a base seed over matches.
fn match_seed(seed: u64, index: u64) -> u64 {
    let mut z = seed.wrapping_add(index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
