//! Tick driver and state-machine transitions
//!
//! The front-end advances the session clock here; everything else follows
//! from timers coming due. One tick call runs on one logical timeline: due
//! callbacks execute sequentially, so no two of them ever observe the state
//! mid-mutation.

use super::clock::TimerTask;
use super::difficulty;
use super::spawn::{resolve_block, spawn_block};
use super::state::{GameEvent, GamePhase, GameState, Outcome};

/// Advance the clock by `dt_ms` and run every deferred callback that came
/// due, in deadline order. No-op while idle.
pub fn tick(state: &mut GameState, dt_ms: u64) {
    if !state.is_playing() {
        return;
    }
    for (_handle, task) in state.timers.advance(dt_ms) {
        // A game-over inside this batch makes the remaining callbacks stale
        if !state.is_playing() {
            break;
        }
        match task {
            TimerTask::Spawn => {
                state.spawn_timer = None;
                run_spawner(state);
            }
            TimerTask::ExpireBlock(id) => resolve_block(state, id, Outcome::Expired),
        }
    }
}

/// One spawner-loop iteration: spawn a block now, then re-arm with the
/// interval the difficulty curve says right now. The loop has no termination
/// condition of its own; game-over cancels the pending handle.
pub(crate) fn run_spawner(state: &mut GameState) {
    if !state.is_playing() {
        return;
    }
    spawn_block(state);
    let interval_ms = state.pacing.spawn_interval_ms as u64;
    state.spawn_timer = Some(state.timers.schedule(interval_ms, TimerTask::Spawn));
}

/// State-machine reaction to a finished block. Outcomes arriving outside an
/// active session are dropped.
pub(crate) fn apply_outcome(state: &mut GameState, outcome: Outcome) {
    if !state.is_playing() {
        return;
    }
    match outcome {
        Outcome::Matched => {
            state.score += 1;
            state.pacing = difficulty::advance(state.pacing, &state.tuning);
            state.push_event(GameEvent::ScoreChanged(state.score));
        }
        Outcome::Mismatched | Outcome::Expired => {
            state.lives = state.lives.saturating_sub(1);
            state.push_event(GameEvent::LivesChanged(state.lives));
            if state.lives == 0 {
                game_over(state);
            }
        }
    }
}

/// Lives ran out: halt the spawner, void every outstanding deadline, clear
/// the field and report the final score.
fn game_over(state: &mut GameState) {
    state.phase = GamePhase::Idle;
    if let Some(handle) = state.spawn_timer.take() {
        state.timers.cancel(handle);
    }
    for block in std::mem::take(&mut state.blocks) {
        state.timers.cancel(block.expiry);
        state.push_event(GameEvent::BlockRemoved { id: block.id });
    }
    log::info!("game over: player={} score={}", state.player, state.score);
    state.push_event(GameEvent::ReadyForInput(false));
    state.push_event(GameEvent::GameOver {
        player: state.player.clone(),
        final_score: state.score,
    });
}
