//! Die-roll sources.
//!
//! A die source is any `Iterator<Item = u8>`. The simulator pulls one value
//! per roll; `None` means a finite source ran dry.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::{ConfigError, DIE_FACES};

/// An endless, fair six-sided die.
#[derive(Debug, Clone)]
pub struct RandomDie {
    rng: StdRng,
}

impl RandomDie {
    /// Create a die, seeded for reproducibility if `seed` is set.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Create a reproducible die.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }
}

impl Default for RandomDie {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Iterator for RandomDie {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        Some(self.rng.gen_range(1..=DIE_FACES))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// A predetermined, finite sequence of rolls.
///
/// Values are checked on construction; [`FixedDice::restart`] replays the
/// sequence from the beginning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDice {
    rolls: Vec<u8>,
    cursor: usize,
}

impl FixedDice {
    /// Create a sequence, rejecting faces outside 1..=6.
    pub fn new(rolls: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let rolls = rolls.into();
        if let Some(&bad) = rolls.iter().find(|&&d| !(1..=DIE_FACES).contains(&d)) {
            return Err(ConfigError::InvalidDieFace(bad));
        }
        Ok(Self { rolls, cursor: 0 })
    }

    /// Rewind to the first roll.
    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    /// Number of rolls handed out so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    /// Number of rolls left.
    pub fn remaining(&self) -> usize {
        self.rolls.len() - self.cursor
    }
}

impl Iterator for FixedDice {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let roll = self.rolls.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(roll)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl ExactSizeIterator for FixedDice {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_die_is_fair_and_in_range() {
        let mut counts = [0usize; 6];
        for roll in RandomDie::seeded(3).take(60_000) {
            assert!((1..=6).contains(&roll));
            counts[usize::from(roll - 1)] += 1;
        }
        for count in counts {
            assert!(count > 9_000 && count < 11_000, "{:?}", counts);
        }
    }

    #[test]
    fn test_seeded_dice_repeat() {
        let a: Vec<u8> = RandomDie::seeded(9).take(50).collect();
        let b: Vec<u8> = RandomDie::seeded(9).take(50).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fixed_dice_run_out_and_restart() {
        let mut dice = FixedDice::new(vec![6, 6, 1]).unwrap();
        assert_eq!(dice.len(), 3);
        assert_eq!(dice.by_ref().collect::<Vec<_>>(), vec![6, 6, 1]);
        assert_eq!(dice.next(), None);
        assert_eq!(dice.consumed(), 3);

        dice.restart();
        assert_eq!(dice.remaining(), 3);
        assert_eq!(dice.next(), Some(6));
    }

    #[test]
    fn test_fixed_dice_reject_bad_faces() {
        assert!(matches!(
            FixedDice::new([2u8, 7]),
            Err(ConfigError::InvalidDieFace(7))
        ));
        assert!(matches!(
            FixedDice::new([0u8]),
            Err(ConfigError::InvalidDieFace(0))
        ));
    }
}
