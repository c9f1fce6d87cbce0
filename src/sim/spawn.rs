//! Block entity manager
//!
//! Creates timed challenge blocks and retires them exactly once. A block's
//! side and position come from the session RNG; its lifetime is whatever the
//! pacing says at spawn time and stays fixed for the whole flight, even if
//! difficulty tightens while it is up.

use glam::Vec2;
use rand::Rng;

use super::clock::TimerTask;
use super::state::{Block, BlockId, GameEvent, GameState, Outcome, PointerButton};
use crate::consts::*;

/// Spawn one block at a random position, schedule its expiry and announce it.
pub(crate) fn spawn_block(state: &mut GameState) {
    let id = state.next_entity_id();
    let required = if state.rng.random_bool(0.5) {
        PointerButton::Left
    } else {
        PointerButton::Right
    };

    // Keep the whole footprint inside the playfield
    let max = (state.bounds - Vec2::new(BLOCK_WIDTH, BLOCK_HEIGHT)).max(Vec2::ZERO);
    let pos = Vec2::new(
        state.rng.random_range(0.0..=max.x),
        state.rng.random_range(0.0..=max.y),
    );

    let lifetime_ms = state.pacing.block_lifetime_ms;
    let expiry = state
        .timers
        .schedule(lifetime_ms as u64, TimerTask::ExpireBlock(id));

    state.blocks.push(Block {
        id,
        required,
        pos,
        lifetime_ms,
        expiry,
        resolved: false,
    });
    log::debug!(
        "block {id} spawned: {required:?} at ({:.0},{:.0}), {lifetime_ms} ms",
        pos.x,
        pos.y
    );
    state.push_event(GameEvent::BlockSpawned {
        id,
        required,
        pos,
        lifetime_ms,
    });
}

/// Retire a block. The first call wins: the block is marked resolved and
/// removed, its expiry timer is cancelled unless it just fired, and the
/// outcome is forwarded to the state machine. Any later call for the same id
/// is a no-op, so a click and a timeout can never both count.
pub(crate) fn resolve_block(state: &mut GameState, id: BlockId, outcome: Outcome) {
    let Some(idx) = state.blocks.iter().position(|b| b.id == id) else {
        return;
    };
    if state.blocks[idx].resolved {
        return;
    }
    state.blocks[idx].resolved = true;
    let block = state.blocks.remove(idx);

    if outcome != Outcome::Expired {
        state.timers.cancel(block.expiry);
    }

    log::debug!("block {id} resolved: {outcome:?}");
    state.push_event(GameEvent::BlockRemoved { id });
    super::tick::apply_outcome(state, outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty;
    use crate::sim::tick::tick;
    use crate::tuning::GameTuning;

    /// One spawn per 100 s so tests control exactly which blocks exist.
    fn slow_spawn_tuning() -> GameTuning {
        GameTuning {
            initial_lives: 3,
            initial_block_lifetime_ms: 1_000,
            initial_spawn_interval_ms: 100_000,
            min_block_lifetime_ms: 100,
            min_spawn_interval_ms: 100_000,
            lifetime_decrement_ms: 500,
            spawn_decrement_ms: 0,
        }
    }

    #[test]
    fn test_spawn_stays_inside_bounds() {
        let mut state = GameState::new(GameTuning::default(), 42);
        state.set_bounds(Vec2::new(500.0, 300.0));

        let mut saw_left = false;
        let mut saw_right = false;
        for _ in 0..100 {
            spawn_block(&mut state);
            let block = state.blocks.last().unwrap();
            assert!(block.pos.x >= 0.0 && block.pos.x <= 500.0 - BLOCK_WIDTH);
            assert!(block.pos.y >= 0.0 && block.pos.y <= 300.0 - BLOCK_HEIGHT);
            match block.required {
                PointerButton::Left => saw_left = true,
                PointerButton::Right => saw_right = true,
            }
        }
        assert!(saw_left && saw_right);
    }

    #[test]
    fn test_lifetime_fixed_at_spawn() {
        let mut state = GameState::new(slow_spawn_tuning(), 1);
        state.start("ada").unwrap();
        let id = state.blocks[0].id;
        assert_eq!(state.blocks[0].lifetime_ms, 1_000);

        // Tighten mid-flight; the block spawned at 1000 ms keeps its deadline
        state.pacing = difficulty::advance(state.pacing, &state.tuning);
        assert_eq!(state.pacing.block_lifetime_ms, 500);

        tick(&mut state, 999);
        assert!(state.blocks.iter().any(|b| b.id == id));
        assert_eq!(state.lives, 3);

        tick(&mut state, 1);
        assert!(!state.blocks.iter().any(|b| b.id == id));
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_new_block_reads_current_lifetime() {
        let mut state = GameState::new(slow_spawn_tuning(), 1);
        state.start("ada").unwrap();
        state.pacing = difficulty::advance(state.pacing, &state.tuning);

        spawn_block(&mut state);
        assert_eq!(state.blocks.last().unwrap().lifetime_ms, 500);
    }

    #[test]
    fn test_matched_resolution_cancels_expiry() {
        let mut state = GameState::new(slow_spawn_tuning(), 5);
        state.start("ada").unwrap();
        let block = state.blocks[0].clone();

        state.pointer_input(block.id, block.required);
        assert_eq!(state.score, 1);

        // Well past the old deadline: the cancelled expiry must not fire
        tick(&mut state, 5_000);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_resolve_is_effective_at_most_once() {
        let mut state = GameState::new(slow_spawn_tuning(), 5);
        state.start("ada").unwrap();
        state.drain_events();
        let id = state.blocks[0].id;

        resolve_block(&mut state, id, Outcome::Mismatched);
        assert_eq!(state.lives, 2);

        // Second resolution with any outcome: no double counting
        resolve_block(&mut state, id, Outcome::Mismatched);
        resolve_block(&mut state, id, Outcome::Matched);
        assert_eq!(state.lives, 2);
        assert_eq!(state.score, 0);

        let removed = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::BlockRemoved { .. }))
            .count();
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_timeout_then_stale_click_does_not_score() {
        let mut state = GameState::new(slow_spawn_tuning(), 5);
        state.start("ada").unwrap();
        let block = state.blocks[0].clone();

        tick(&mut state, 1_000);
        assert_eq!(state.lives, 2);

        // The click raced the timeout and lost
        state.pointer_input(block.id, block.required);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 2);
    }
}
