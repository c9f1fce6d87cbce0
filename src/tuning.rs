//! Data-driven game balance
//!
//! One immutable set of pacing constants per session. Defaults mirror the
//! original arcade tuning; a JSON override can be supplied by the front-end.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Balance constants fixed for the lifetime of a session.
///
/// `initial_*` values are where every new session starts; the difficulty
/// curve walks them down by the `*_decrement_ms` steps, never below the
/// `min_*` floors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTuning {
    /// Lives at session start
    pub initial_lives: u8,
    /// How long a freshly spawned block stays clickable (ms)
    pub initial_block_lifetime_ms: u32,
    /// Delay between consecutive spawns at session start (ms)
    pub initial_spawn_interval_ms: u32,
    /// Block lifetime floor (ms)
    pub min_block_lifetime_ms: u32,
    /// Spawn interval floor (ms)
    pub min_spawn_interval_ms: u32,
    /// Lifetime reduction per correctly answered block (ms)
    pub lifetime_decrement_ms: u32,
    /// Spawn interval reduction per correctly answered block (ms)
    pub spawn_decrement_ms: u32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            initial_lives: 3,
            initial_block_lifetime_ms: 20_000,
            initial_spawn_interval_ms: 1_500,
            min_block_lifetime_ms: 1_000,
            min_spawn_interval_ms: 400,
            lifetime_decrement_ms: 500,
            spawn_decrement_ms: 25,
        }
    }
}

/// Why a tuning set was rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("initial_lives must be at least 1")]
    ZeroLives,
    #[error("{name} floor ({min_ms} ms) exceeds its initial value ({initial_ms} ms)")]
    FloorAboveInitial {
        name: &'static str,
        min_ms: u32,
        initial_ms: u32,
    },
    #[error("invalid tuning json: {0}")]
    Json(#[from] serde_json::Error),
}

impl GameTuning {
    /// Check the cross-field invariants (floors must sit at or below their
    /// initial values, at least one life).
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.initial_lives == 0 {
            return Err(TuningError::ZeroLives);
        }
        if self.min_block_lifetime_ms > self.initial_block_lifetime_ms {
            return Err(TuningError::FloorAboveInitial {
                name: "block lifetime",
                min_ms: self.min_block_lifetime_ms,
                initial_ms: self.initial_block_lifetime_ms,
            });
        }
        if self.min_spawn_interval_ms > self.initial_spawn_interval_ms {
            return Err(TuningError::FloorAboveInitial {
                name: "spawn interval",
                min_ms: self.min_spawn_interval_ms,
                initial_ms: self.initial_spawn_interval_ms,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON tuning document.
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }
}
