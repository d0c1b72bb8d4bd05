//! A single playable round.

use rand::Rng;

use crate::config::{GameConfig, MIN_POOL};
use crate::game::{ACTOR_COUNT, Allocations};

/// One round: a pool of power-ups, the player's allocations and the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    /// Power-ups available this round. Never below [`MIN_POOL`].
    pub available_pool: u32,
    /// Power-ups handed to each hero so far.
    pub allocations: Allocations,
    /// Seconds left on the clock.
    pub remaining_seconds: u32,
}

impl Round {
    /// Create a round with the given pool, zero allocations and a full clock.
    ///
    /// A pool below [`MIN_POOL`] is raised to it.
    #[must_use]
    pub fn new(available_pool: u32, round_seconds: u32) -> Self {
        Self {
            available_pool: available_pool.max(MIN_POOL),
            allocations: [0; ACTOR_COUNT],
            remaining_seconds: round_seconds,
        }
    }

    /// Draw a fresh round with a pool chosen uniformly from the configured range.
    ///
    /// The range is clamped to [`MIN_POOL`] so an unvalidated config still
    /// cannot produce an empty pool.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig) -> Self {
        let low = config.pool_min.max(MIN_POOL);
        let high = config.pool_max.max(low);
        Self::new(rng.gen_range(low..=high), config.round_seconds)
    }

    /// Sum of all allocations.
    #[must_use]
    pub fn total_allocated(&self) -> u32 {
        self.allocations
            .iter()
            .fold(0u32, |sum, &units| sum.saturating_add(units))
    }

    /// Whether the clock has run out.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// Change one hero's allocation by `delta`, flooring at zero.
    ///
    /// Not bounded by the pool; over-allocation is only judged on submit.
    #[must_use]
    pub(crate) fn adjusted(mut self, actor: usize, delta: i32) -> Self {
        if let Some(units) = self.allocations.get_mut(actor) {
            *units = units.saturating_add_signed(delta);
        }
        self
    }

    /// Advance the clock by one step.
    #[must_use]
    pub(crate) const fn ticked(mut self) -> Self {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_round_is_zeroed() {
        let round = Round::new(7, 60);
        assert_eq!(round.available_pool, 7);
        assert_eq!(round.allocations, [0, 0, 0]);
        assert_eq!(round.remaining_seconds, 60);
        assert_eq!(round.total_allocated(), 0);
    }

    #[test]
    fn test_new_round_floors_pool() {
        assert_eq!(Round::new(0, 60).available_pool, MIN_POOL);
    }

    #[test]
    fn test_generate_within_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = GameConfig::default();
        for _ in 0..500 {
            let round = Round::generate(&mut rng, &config);
            assert!((config.pool_min..=config.pool_max).contains(&round.available_pool));
            assert_eq!(round.remaining_seconds, config.round_seconds);
        }
    }

    #[test]
    fn test_generate_with_unvalidated_config() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = GameConfig {
            pool_min: 0,
            pool_max: 0,
            ..GameConfig::default()
        };
        assert_eq!(Round::generate(&mut rng, &config).available_pool, 1);
    }

    #[test]
    fn test_adjust_floors_at_zero() {
        let round = Round::new(5, 60).adjusted(0, -1);
        assert_eq!(round.allocations, [0, 0, 0]);

        let round = round.adjusted(2, 1).adjusted(2, 1).adjusted(2, -1);
        assert_eq!(round.allocations, [0, 0, 1]);
    }

    #[test]
    fn test_adjust_may_exceed_pool() {
        let mut round = Round::new(1, 60);
        for _ in 0..4 {
            round = round.adjusted(1, 1);
        }
        assert_eq!(round.total_allocated(), 4);
    }

    #[test]
    fn test_tick_stops_at_zero() {
        let round = Round::new(5, 1).ticked();
        assert!(round.is_expired());
        assert_eq!(round.ticked().remaining_seconds, 0);
    }
}
