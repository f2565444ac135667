//! Configuration for solving and simulating Pig.
//!
//! The single rule parameter is the `goal`, the banked score that ends a
//! match. Everything else here tunes the simulator and the tournament.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target score used when none is configured.
pub const DEFAULT_GOAL: u32 = 100;

/// Default cap on decisions in a single simulated match.
pub const DEFAULT_DECISION_LIMIT: u64 = 1_000_000;

/// Errors raised while building or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The goal must be strictly positive.
    #[error("goal must be positive, got {0}")]
    InvalidGoal(u32),

    /// A value cache built for one goal was handed to a solver for another.
    #[error("value cache was built for goal {cache} but the solver uses goal {solver}")]
    GoalMismatch {
        /// Goal the cache was created with.
        cache: u32,
        /// Goal the solver was asked to use.
        solver: u32,
    },

    /// A die face outside 1..=6.
    #[error("die face {0} is outside 1..=6")]
    InvalidDieFace(u8),

    /// A strategy spec that does not name a known strategy.
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    /// A utility name that is neither win probability nor differential.
    #[error("unknown utility '{0}'")]
    UnknownUtility(String),

    /// Tournament settings that cannot produce a single match.
    #[error("invalid tournament: {0}")]
    InvalidTournament(String),

    /// The configured decision limit is zero.
    #[error("decision limit must be positive")]
    InvalidDecisionLimit,

    /// Failed to read a configuration file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse configuration JSON.
    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A validated, strictly positive target score.
///
/// A solver and its cache are bound to one `Goal` for their whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Goal(u32);

impl Goal {
    /// Create a goal, rejecting zero.
    pub fn new(goal: u32) -> Result<Self, ConfigError> {
        if goal == 0 {
            return Err(ConfigError::InvalidGoal(goal));
        }
        Ok(Self(goal))
    }

    /// The raw target score.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Goal {
    fn default() -> Self {
        Self(DEFAULT_GOAL)
    }
}

impl TryFrom<u32> for Goal {
    type Error = ConfigError;

    fn try_from(goal: u32) -> Result<Self, Self::Error> {
        Self::new(goal)
    }
}

impl From<Goal> for u32 {
    fn from(goal: Goal) -> Self {
        goal.0
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Configuration for the solver, the match simulator and the tournament.
///
/// # Example
/// ```
/// use pig_solver::game::PigConfig;
///
/// let config = PigConfig::default().with_goal(40).with_seed(7);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.goal().unwrap().get(), 40);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PigConfig {
    /// Banked score that ends the match.
    pub goal: u32,

    /// Random seed for reproducible dice and random strategies.
    ///
    /// If `None`, entropy from the OS is used.
    pub seed: Option<u64>,

    /// Maximum number of decisions in a single match.
    ///
    /// Two strategies that only ever hold on zero pending never finish;
    /// the limit turns that into an error instead of a hang.
    pub decision_limit: Option<u64>,

    /// Matches played per unordered pairing in a tournament, seats alternating.
    pub games_per_pair: usize,

    /// Strategy specs taking part in a tournament, e.g. `"hold_at(20)"`.
    pub roster: Vec<String>,
}

impl Default for PigConfig {
    fn default() -> Self {
        Self {
            goal: DEFAULT_GOAL,
            seed: None,
            decision_limit: Some(DEFAULT_DECISION_LIMIT),
            games_per_pair: 1_000,
            roster: vec![
                "optimal_win".to_string(),
                "optimal_diff".to_string(),
                "hold_at(20)".to_string(),
                "hold_at(25)".to_string(),
                "random".to_string(),
            ],
        }
    }
}

impl PigConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the goal.
    pub fn with_goal(mut self, goal: u32) -> Self {
        self.goal = goal;
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set the per-match decision limit.
    pub fn with_decision_limit(mut self, limit: Option<u64>) -> Self {
        self.decision_limit = limit;
        self
    }

    /// Builder method: set matches per pairing.
    pub fn with_games_per_pair(mut self, games: usize) -> Self {
        self.games_per_pair = games;
        self
    }

    /// Builder method: replace the tournament roster.
    pub fn with_roster<I, S>(mut self, roster: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roster = roster.into_iter().map(Into::into).collect();
        self
    }

    /// The validated goal.
    pub fn goal(&self) -> Result<Goal, ConfigError> {
        Goal::new(self.goal)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration as pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration and return the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.goal()?;

        if self.decision_limit == Some(0) {
            return Err(ConfigError::InvalidDecisionLimit);
        }

        Ok(())
    }
}
