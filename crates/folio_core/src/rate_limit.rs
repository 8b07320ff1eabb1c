//! Rate limiting for high-frequency event sources
//!
//! Scroll and resize fire far more often than the page can usefully
//! recompute. Three policies bound the work:
//!
//! - [`Throttle`]: fire on the leading call, then drop calls until the
//!   interval has elapsed. Dropped calls are not queued.
//! - [`Debounce`]: fire once after a quiet period. Each trigger replaces
//!   the pending timer, restarting the wait.
//! - [`FrameThrottle`]: coalesce any number of calls into one recomputation
//!   at the next display refresh, guarded by an in-flight flag.
//!
//! None of them has an error path; they only decide *when* to run.

use std::time::Duration;

use crate::timer::{TimerId, TimerQueue};

// ============================================================================
// Throttle
// ============================================================================

/// Leading-edge throttle: at most one fire per interval
#[derive(Clone, Copy, Debug)]
pub struct Throttle {
    interval: Duration,
    last_fire: Option<Duration>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true if the call at `now` should run
    pub fn try_fire(&mut self, now: Duration) -> bool {
        match self.last_fire {
            Some(last) if now.saturating_sub(last) < self.interval => false,
            _ => {
                self.last_fire = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_fire = None;
    }
}

/// A callback wrapped in a [`Throttle`]
pub struct Throttled<F> {
    throttle: Throttle,
    callback: F,
}

impl<F: FnMut()> Throttled<F> {
    pub fn new(callback: F, interval: Duration) -> Self {
        Self {
            throttle: Throttle::new(interval),
            callback,
        }
    }

    /// Invoke the callback unless throttled; returns whether it ran
    pub fn call(&mut self, now: Duration) -> bool {
        if self.throttle.try_fire(now) {
            (self.callback)();
            true
        } else {
            false
        }
    }
}

/// Wrap `callback` so it runs at most once per `interval`
pub fn throttle<F: FnMut()>(callback: F, interval: Duration) -> Throttled<F> {
    Throttled::new(callback, interval)
}

// ============================================================================
// Debounce
// ============================================================================

/// Trailing-edge debounce backed by a [`TimerQueue`]
#[derive(Clone, Copy, Debug)]
pub struct Debounce {
    wait: Duration,
    pending: Option<TimerId>,
}

impl Debounce {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Restart the quiet period, replacing any pending timer
    pub fn trigger<T>(&mut self, now: Duration, timers: &mut TimerQueue<T>, task: T) -> TimerId {
        if let Some(previous) = self.pending.take() {
            timers.cancel(previous);
        }
        let id = timers.schedule(now, self.wait, task);
        self.pending = Some(id);
        id
    }

    /// Acknowledge a fired timer
    ///
    /// Returns false for a timer that is no longer the current one.
    pub fn acknowledge(&mut self, id: TimerId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel<T>(&mut self, timers: &mut TimerQueue<T>) {
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
    }
}

// ============================================================================
// Frame-aligned throttle
// ============================================================================

/// One recomputation per display refresh, no matter how many requests
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameThrottle {
    in_flight: bool,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the caller must schedule a frame callback
    pub fn request(&mut self) -> bool {
        if self.in_flight {
            false
        } else {
            self.in_flight = true;
            true
        }
    }

    /// Called from the frame callback; returns whether work was requested
    pub fn begin_frame(&mut self) -> bool {
        std::mem::replace(&mut self.in_flight, false)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}

/// A callback coalesced to at most one run per refresh
pub struct FrameCoalesced<F> {
    guard: FrameThrottle,
    callback: F,
}

impl<F: FnMut()> FrameCoalesced<F> {
    pub fn new(callback: F) -> Self {
        Self {
            guard: FrameThrottle::new(),
            callback,
        }
    }

    /// Record a raw event; returns true if a frame must be requested
    pub fn schedule(&mut self) -> bool {
        self.guard.request()
    }

    /// Run the callback if anything was scheduled since the last frame
    pub fn on_frame(&mut self) -> bool {
        if self.guard.begin_frame() {
            (self.callback)();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_throttle_fires_once_per_window() {
        let runs = Rc::new(Cell::new(0));
        let runs_clone = Rc::clone(&runs);
        let mut throttled = throttle(move || runs_clone.set(runs_clone.get() + 1), ms(100));

        for t in 0..100 {
            throttled.call(ms(t));
        }
        assert_eq!(runs.get(), 1);

        // Window elapsed: next call fires, trailing calls were dropped
        assert!(throttled.call(ms(100)));
        assert_eq!(runs.get(), 2);
        assert!(!throttled.call(ms(150)));
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_throttle_reset() {
        let mut t = Throttle::new(ms(100));
        assert!(t.try_fire(ms(10)));
        assert!(!t.try_fire(ms(20)));
        t.reset();
        assert!(t.try_fire(ms(20)));
    }

    #[test]
    fn test_debounce_restarts_wait() {
        let mut timers = TimerQueue::new();
        let mut debounce = Debounce::new(ms(150));

        debounce.trigger(ms(0), &mut timers, "resize");
        debounce.trigger(ms(100), &mut timers, "resize");
        let last = debounce.trigger(ms(200), &mut timers, "resize");
        assert_eq!(timers.len(), 1);

        // Quiet period measured from the last trigger
        assert!(timers.drain_due(ms(300)).is_empty());
        let fired = timers.drain_due(ms(350));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, last);
        assert!(debounce.acknowledge(last));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn test_debounce_rejects_stale_timer() {
        let mut timers = TimerQueue::new();
        let mut debounce = Debounce::new(ms(50));
        let first = debounce.trigger(ms(0), &mut timers, ());
        let _second = debounce.trigger(ms(10), &mut timers, ());
        assert!(!debounce.acknowledge(first));
        assert!(debounce.is_pending());

        debounce.cancel(&mut timers);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_frame_throttle_coalesces_bursts() {
        let runs = Rc::new(Cell::new(0));
        let runs_clone = Rc::clone(&runs);
        let mut coalesced = FrameCoalesced::new(move || runs_clone.set(runs_clone.get() + 1));

        let frame_requests = (0..50).filter(|_| coalesced.schedule()).count();
        assert_eq!(frame_requests, 1);

        assert!(coalesced.on_frame());
        assert_eq!(runs.get(), 1);

        // Nothing new since the last refresh
        assert!(!coalesced.on_frame());
        assert_eq!(runs.get(), 1);

        // Next burst schedules again
        assert!(coalesced.schedule());
    }
}
