//! Difficulty curve
//!
//! Each correctly answered block tightens the pacing one step: shorter block
//! lifetimes, shorter gaps between spawns. Failure never eases or tightens
//! anything.

use serde::{Deserialize, Serialize};

use crate::tuning::GameTuning;

/// The two pacing parameters the curve operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    /// How long a block spawned right now would stay clickable (ms)
    pub block_lifetime_ms: u32,
    /// Delay the spawner will arm after its next iteration (ms)
    pub spawn_interval_ms: u32,
}

impl Pacing {
    /// Pacing at session start.
    pub fn initial(tuning: &GameTuning) -> Self {
        Self {
            block_lifetime_ms: tuning.initial_block_lifetime_ms,
            spawn_interval_ms: tuning.initial_spawn_interval_ms,
        }
    }
}

/// One difficulty step. Pure: same inputs, same output, no side effects.
/// Both parameters step down by their configured decrement and clamp at
/// their configured floor.
pub fn advance(current: Pacing, tuning: &GameTuning) -> Pacing {
    Pacing {
        block_lifetime_ms: current
            .block_lifetime_ms
            .saturating_sub(tuning.lifetime_decrement_ms)
            .max(tuning.min_block_lifetime_ms),
        spawn_interval_ms: current
            .spawn_interval_ms
            .saturating_sub(tuning.spawn_decrement_ms)
            .max(tuning.min_spawn_interval_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_advance_steps_down() {
        let tuning = GameTuning::default();
        let next = advance(Pacing::initial(&tuning), &tuning);
        assert_eq!(next.block_lifetime_ms, 19_500);
        assert_eq!(next.spawn_interval_ms, 1_475);
    }

    #[test]
    fn test_advance_clamps_at_floors() {
        let tuning = GameTuning::default();
        let near_floor = Pacing {
            block_lifetime_ms: 1_200,
            spawn_interval_ms: 410,
        };
        let next = advance(near_floor, &tuning);
        assert_eq!(next.block_lifetime_ms, 1_000);
        assert_eq!(next.spawn_interval_ms, 400);

        // Once at the floor, further advances are a fixed point
        let again = advance(next, &tuning);
        assert_eq!(again, next);
    }

    proptest! {
        #[test]
        fn prop_advance_never_below_floors_never_increases(
            min_lifetime in 0u32..=5_000,
            min_interval in 0u32..=2_000,
            lifetime_over in 0u32..=60_000,
            interval_over in 0u32..=10_000,
            lifetime_dec in 0u32..=10_000,
            spawn_dec in 0u32..=1_000,
        ) {
            let tuning = GameTuning {
                min_block_lifetime_ms: min_lifetime,
                min_spawn_interval_ms: min_interval,
                lifetime_decrement_ms: lifetime_dec,
                spawn_decrement_ms: spawn_dec,
                ..Default::default()
            };
            let current = Pacing {
                block_lifetime_ms: min_lifetime + lifetime_over,
                spawn_interval_ms: min_interval + interval_over,
            };
            let next = advance(current, &tuning);

            prop_assert!(next.block_lifetime_ms >= tuning.min_block_lifetime_ms);
            prop_assert!(next.spawn_interval_ms >= tuning.min_spawn_interval_ms);
            prop_assert!(next.block_lifetime_ms <= current.block_lifetime_ms);
            prop_assert!(next.spawn_interval_ms <= current.spawn_interval_ms);
        }
    }
}
