//! Coin-flip baseline.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::{Action, GameState, RuleViolation};
use crate::strategy::Strategy;

/// Roll or hold with equal probability, ignoring the state.
#[derive(Debug)]
pub struct RandomChoice {
    rng: Mutex<StdRng>,
}

impl RandomChoice {
    /// Display name of this strategy.
    pub const NAME: &'static str = "random_choice";

    /// Create a random strategy, seeded for reproducibility if `seed` is set.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl Default for RandomChoice {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Strategy for RandomChoice {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn decide(&self, _state: &GameState) -> Result<Action, RuleViolation> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        if rng.gen_bool(0.5) {
            Ok(Action::Roll)
        } else {
            Ok(Action::Hold)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_choices_repeat() {
        let a = RandomChoice::new(Some(42));
        let b = RandomChoice::new(Some(42));
        let state = GameState::initial();

        for _ in 0..100 {
            assert_eq!(a.decide(&state), b.decide(&state));
        }
    }

    #[test]
    fn test_both_actions_appear() {
        let strategy = RandomChoice::new(Some(7));
        let state = GameState::initial();
        let rolls = (0..1_000)
            .filter(|_| strategy.decide(&state) == Ok(Action::Roll))
            .count();

        assert!(rolls > 400 && rolls < 600, "{} rolls", rolls);
    }
}
