//! Playing matches and tournaments.
//!
//! ## Components
//!
//! - [`dice`]: die sources, random ([`RandomDie`]) or scripted ([`FixedDice`])
//! - [`play`]: a single match between two strategies
//! - [`tournament`]: parallel round-robin over a roster of strategy specs
//!
//! ## Example
//!
//! ```
//! use pig_solver::game::Goal;
//! use pig_solver::simulation::{play_match, RandomDie};
//! use pig_solver::strategy::HoldAt;
//!
//! let goal = Goal::new(50).unwrap();
//! let cautious = HoldAt::new(15, goal);
//! let bold = HoldAt::new(25, goal);
//!
//! let outcome = play_match(goal, &cautious, &bold, &mut RandomDie::seeded(1)).unwrap();
//! assert!(outcome.final_state.winner(goal).is_some());
//! ```

pub mod dice;
pub mod play;
pub mod tournament;

pub use dice::{FixedDice, RandomDie};
pub use play::{play_match, MatchError, MatchOutcome, MatchRunner, Victory};
pub use tournament::{PairingResult, Standing, Tournament, TournamentReport};
