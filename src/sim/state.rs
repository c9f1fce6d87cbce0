//! Game state and core simulation types
//!
//! One [`GameState`] value is one session; there is no global state anywhere.
//! The front-end drives it through the inbound calls ([`GameState::start`],
//! [`GameState::pointer_input`], [`GameState::reset`]) plus [`tick`](super::tick::tick),
//! and observes it through the buffered [`GameEvent`] stream.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::clock::{TimerHandle, TimerQueue};
use super::difficulty::Pacing;
use super::spawn;
use crate::consts::*;
use crate::tuning::GameTuning;

/// Entity id of a spawned block, unique within a session.
pub type BlockId = u32;

/// The two pointer actions a block can demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Left,
    Right,
}

/// How a block's life ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Clicked with the matching button before the deadline
    Matched,
    /// Clicked with the wrong button
    Mismatched,
    /// Deadline ran out
    Expired,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No active session (before the first start, after game-over)
    Idle,
    /// Session active, spawner running
    Playing,
}

/// A live block: one timed challenge awaiting one pointer action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    /// Button this block demands
    pub required: PointerButton,
    /// Top-left corner in playfield units
    pub pos: Vec2,
    /// Lifetime fixed at spawn time; later difficulty steps never touch it
    pub lifetime_ms: u32,
    /// This block's own expiry timer, cancelled if input resolves it first
    pub expiry: TimerHandle,
    /// Set by the first resolution; guards against a second one
    pub resolved: bool,
}

/// Outbound notifications for the presentation layer, drained each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BlockSpawned {
        id: BlockId,
        required: PointerButton,
        pos: Vec2,
        lifetime_ms: u32,
    },
    BlockRemoved {
        id: BlockId,
    },
    ScoreChanged(u64),
    LivesChanged(u8),
    GameOver {
        player: String,
        final_score: u64,
    },
    ReadyForInput(bool),
}

/// Why a session failed to start
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartError {
    #[error("player name must not be empty")]
    EmptyName,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Session RNG (block sides and positions)
    pub(crate) rng: Pcg32,
    /// Balance constants, fixed for the whole session
    pub tuning: GameTuning,
    /// Current phase
    pub phase: GamePhase,
    /// Trimmed player name; empty while no session has started
    pub player: String,
    /// Correctly answered blocks this session
    pub score: u64,
    /// Remaining lives
    pub lives: u8,
    /// Current pacing; walks down the difficulty curve on each Matched
    pub pacing: Pacing,
    /// Playfield size in units, updated by the presentation on resize
    pub bounds: Vec2,
    /// Relative clock plus every pending deferred callback
    pub(crate) timers: TimerQueue,
    /// The spawner loop's pending iteration, cancelled on game-over
    pub(crate) spawn_timer: Option<TimerHandle>,
    /// Live blocks (unresolved only; resolution removes immediately)
    pub blocks: Vec<Block>,
    /// Outbound event buffer
    #[serde(skip)]
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: BlockId,
}

impl GameState {
    /// Create an idle session with the given tuning and seed. `tuning` is
    /// expected to be validated (see [`GameTuning::validate`]).
    pub fn new(tuning: GameTuning, seed: u64) -> Self {
        let pacing = Pacing::initial(&tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            lives: tuning.initial_lives,
            tuning,
            phase: GamePhase::Idle,
            player: String::new(),
            score: 0,
            pacing,
            bounds: Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT),
            timers: TimerQueue::new(),
            spawn_timer: None,
            blocks: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Begin a session. Resets score, lives and pacing to their configured
    /// initial values, spawns the first block immediately and arms the
    /// spawner. Rejects a blank player name; ignored while a session is
    /// already active.
    pub fn start(&mut self, player_name: &str) -> Result<(), StartError> {
        let name = player_name.trim();
        if name.is_empty() {
            return Err(StartError::EmptyName);
        }
        if self.is_playing() {
            log::warn!("start requested while a session is active; ignored");
            return Ok(());
        }

        // Fresh session: a new relative clock, no leftovers from the last run
        self.player = name.to_string();
        self.score = 0;
        self.lives = self.tuning.initial_lives;
        self.pacing = Pacing::initial(&self.tuning);
        self.timers = TimerQueue::new();
        self.spawn_timer = None;
        self.blocks.clear();
        self.phase = GamePhase::Playing;

        log::info!("session started: player={} seed={}", self.player, self.seed);
        self.push_event(GameEvent::ScoreChanged(0));
        self.push_event(GameEvent::LivesChanged(self.lives));
        self.push_event(GameEvent::ReadyForInput(true));

        // First block appears right away; the spawner re-arms itself from here
        super::tick::run_spawner(self);
        Ok(())
    }

    /// A pointer action routed to one block by the presentation. Stale ids
    /// (already resolved, or from a finished session) are silently dropped.
    pub fn pointer_input(&mut self, id: BlockId, button: PointerButton) {
        if !self.is_playing() {
            return;
        }
        let Some(block) = self.blocks.iter().find(|b| b.id == id && !b.resolved) else {
            return;
        };
        let outcome = if block.required == button {
            Outcome::Matched
        } else {
            Outcome::Mismatched
        };
        spawn::resolve_block(self, id, outcome);
    }

    /// Return an idle session to its pristine state so a new `start` begins
    /// from scratch. No-op while playing.
    pub fn reset(&mut self) {
        if self.is_playing() {
            log::warn!("reset requested mid-session; ignored");
            return;
        }
        self.player.clear();
        self.score = 0;
        self.lives = self.tuning.initial_lives;
        self.pacing = Pacing::initial(&self.tuning);
        self.timers = TimerQueue::new();
        self.spawn_timer = None;
        self.blocks.clear();
        self.events.clear();
    }

    /// Presentation-reported playfield size. Clamped so the spawn area never
    /// collapses below one block footprint.
    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.bounds = bounds.max(Vec2::new(BLOCK_WIDTH, BLOCK_HEIGHT));
    }

    /// Hand the buffered outbound events to the presentation.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Allocate a new entity ID
    pub(crate) fn next_entity_id(&mut self) -> BlockId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
