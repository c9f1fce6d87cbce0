//! Block Rush - a pointer-reflex arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (clock, spawning, game state)
//! - `tuning`: Data-driven game balance
//!
//! The terminal front-end lives in the `block-rush` binary and talks to the
//! simulation exclusively through [`sim::GameState`] inbound calls and the
//! drained [`sim::GameEvent`] stream.

pub mod sim;
pub mod tuning;

pub use sim::{GameEvent, GameState, Outcome, PointerButton, StartError};
pub use tuning::GameTuning;

/// Game configuration constants
pub mod consts {
    /// Block footprint in playfield units (blocks never spawn closer than
    /// this to the right/bottom edge)
    pub const BLOCK_WIDTH: f32 = 110.0;
    pub const BLOCK_HEIGHT: f32 = 90.0;

    /// Playfield bounds before the presentation reports a real size
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Frame cadence of the terminal front-end (ms per poll)
    pub const FRAME_MS: u64 = 16;
}
