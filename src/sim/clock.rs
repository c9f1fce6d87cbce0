//! Session clock and cancellable timer queue
//!
//! Every piece of deferred work in the simulation - the spawner's next
//! iteration and each block's expiry - is one entry here. The queue has no
//! thread or OS timer behind it: the front-end advances the clock and the
//! entries that came due fire in deadline order. Cancelled entries never fire.

use serde::{Deserialize, Serialize};

/// Opaque token for a scheduled timer, held by whoever scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerTask {
    /// Spawner loop iteration: create a block, re-arm at the current interval.
    Spawn,
    /// A block's deadline ran out.
    ExpireBlock(u32),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct TimerEntry {
    handle: TimerHandle,
    due_ms: u64,
    task: TimerTask,
}

/// Millisecond-resolution relative clock with pending timers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    now_ms: u64,
    next_handle: u64,
    entries: Vec<TimerEntry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the queue was created.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of timers still pending.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Schedule `task` to fire `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, task: TimerTask) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(TimerEntry {
            handle,
            due_ms: self.now_ms + delay_ms,
            task,
        });
        handle
    }

    /// Cancel a pending timer. Unknown or already-fired handles are a no-op.
    pub fn cancel(&mut self, handle: TimerHandle) {
        self.entries.retain(|e| e.handle != handle);
    }

    /// Drop every pending timer.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Advance the clock by `dt_ms` and pop everything that came due, ordered
    /// by deadline (creation order breaks ties).
    pub fn advance(&mut self, dt_ms: u64) -> Vec<(TimerHandle, TimerTask)> {
        self.now_ms += dt_ms;
        let now = self.now_ms;

        let mut due: Vec<TimerEntry> = Vec::new();
        self.entries.retain(|e| {
            if e.due_ms <= now {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|e| (e.due_ms, e.handle.0));
        due.into_iter().map(|e| (e.handle, e.task)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(300, TimerTask::ExpireBlock(3));
        queue.schedule(100, TimerTask::ExpireBlock(1));
        queue.schedule(200, TimerTask::Spawn);

        let fired = queue.advance(300);
        let tasks: Vec<_> = fired.iter().map(|(_, t)| *t).collect();
        assert_eq!(
            tasks,
            vec![
                TimerTask::ExpireBlock(1),
                TimerTask::Spawn,
                TimerTask::ExpireBlock(3),
            ]
        );
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_not_due_yet_stays_pending() {
        let mut queue = TimerQueue::new();
        queue.schedule(500, TimerTask::Spawn);

        assert!(queue.advance(499).is_empty());
        assert_eq!(queue.pending(), 1);

        let fired = queue.advance(1);
        assert_eq!(fired.len(), 1);
        assert_eq!(queue.now_ms(), 500);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut queue = TimerQueue::new();
        let keep = queue.schedule(100, TimerTask::ExpireBlock(1));
        let cancelled = queue.schedule(100, TimerTask::ExpireBlock(2));
        queue.cancel(cancelled);
        // Cancelling twice (or after firing) is harmless
        queue.cancel(cancelled);

        let fired = queue.advance(100);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, keep);
    }

    #[test]
    fn test_same_deadline_fires_in_creation_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(100, TimerTask::Spawn);
        queue.schedule(100, TimerTask::ExpireBlock(7));

        let tasks: Vec<_> = queue.advance(100).iter().map(|(_, t)| *t).collect();
        assert_eq!(tasks, vec![TimerTask::Spawn, TimerTask::ExpireBlock(7)]);
    }

    #[test]
    fn test_cancel_all() {
        let mut queue = TimerQueue::new();
        queue.schedule(10, TimerTask::Spawn);
        queue.schedule(20, TimerTask::ExpireBlock(1));
        queue.cancel_all();
        assert_eq!(queue.pending(), 0);
        assert!(queue.advance(100).is_empty());
    }
}
