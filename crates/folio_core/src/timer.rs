//! Cooperative timers and frame callbacks
//!
//! Everything runs on one thread. A host advances page time and the owner
//! drains whatever became due; nothing fires on its own. Timer handles are
//! slotmap keys, so a cancelled or fired handle never aliases a newer timer.

use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

struct TimerEntry<T> {
    deadline: Duration,
    seq: u64,
    task: T,
}

/// Deadline-ordered timer list
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, TimerEntry<T>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    /// Schedule `task` to become due at `now + delay`
    pub fn schedule(&mut self, now: Duration, delay: Duration, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(TimerEntry {
            deadline: now + delay,
            seq,
            task,
        })
    }

    /// Cancel a pending timer, returning its task if it had not fired yet
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(id).map(|entry| entry.task)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Earliest deadline among pending timers
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().map(|entry| entry.deadline).min()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Remove and return every task due at `now`
    ///
    /// Tasks come back in deadline order; timers sharing a deadline keep
    /// the order they were scheduled in.
    pub fn drain_due(&mut self, now: Duration) -> Vec<(TimerId, T)> {
        let mut due: Vec<(TimerId, Duration, u64)> = self
            .timers
            .iter()
            .filter(|(_, entry)| entry.deadline <= now)
            .map(|(id, entry)| (id, entry.deadline, entry.seq))
            .collect();
        due.sort_by_key(|&(_, deadline, seq)| (deadline, seq));

        due.into_iter()
            .filter_map(|(id, _, _)| self.timers.remove(id).map(|entry| (id, entry.task)))
            .collect()
    }

    /// Drop every pending timer
    pub fn clear(&mut self) -> Vec<T> {
        let ids: Vec<TimerId> = self.timers.keys().collect();
        ids.into_iter()
            .filter_map(|id| self.timers.remove(id).map(|entry| entry.task))
            .collect()
    }
}

/// Callbacks waiting for the next display refresh
pub struct FrameQueue<T> {
    pending: Vec<T>,
}

impl<T> Default for FrameQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn request(&mut self, task: T) {
        self.pending.push(task);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take everything requested before this refresh
    ///
    /// Requests made while running the returned callbacks wait for the
    /// following refresh.
    pub fn take(&mut self) -> Vec<T> {
        std::mem::take(&mut self.pending)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
