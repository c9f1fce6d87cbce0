//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Relative millisecond clock only, advanced by the caller
//! - Seeded RNG only
//! - Deferred work (next spawn, block expiries) as cancellable timer entries,
//!   fired in stable deadline order
//! - No rendering or platform dependencies

pub mod clock;
pub mod difficulty;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::{TimerHandle, TimerQueue, TimerTask};
pub use difficulty::Pacing;
pub use state::{
    Block, BlockId, GameEvent, GamePhase, GameState, Outcome, PointerButton, StartError,
};
pub use tick::tick;
