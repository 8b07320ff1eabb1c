//! Finite state machines for widget interaction states
//!
//! Widgets describe their states as a `Copy` enum and implement
//! [`StateTransitions`] as a `match (state, event)` table. Events are plain
//! `u32` ids so widget-specific events can live next to the widget.
//!
//! ```rust
//! use folio_core::fsm::{StateMachine, StateTransitions};
//!
//! const FLIP: u32 = 1;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
//! enum Lamp {
//!     #[default]
//!     Off,
//!     On,
//! }
//!
//! impl StateTransitions for Lamp {
//!     fn on_event(&self, event: u32) -> Option<Self> {
//!         match (self, event) {
//!             (Lamp::Off, FLIP) => Some(Lamp::On),
//!             (Lamp::On, FLIP) => Some(Lamp::Off),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut lamp = StateMachine::new(Lamp::Off);
//! assert_eq!(lamp.send(FLIP), Some(Lamp::On));
//! assert_eq!(lamp.current(), Lamp::On);
//! ```

use std::hash::Hash;

/// Transition table for a state enum
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + Hash + std::fmt::Debug + 'static {
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;
}

/// Holds the current state of a [`StateTransitions`] enum
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateMachine<S: StateTransitions> {
    current: S,
}

impl<S: StateTransitions> StateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> S {
        self.current
    }

    /// Feed an event; returns the new state if a transition happened
    ///
    /// Self-transitions (a table entry mapping a state to itself) are
    /// reported as no transition.
    pub fn send(&mut self, event: u32) -> Option<S> {
        let next = self.current.on_event(event)?;
        if next == self.current {
            return None;
        }
        tracing::trace!(from = ?self.current, to = ?next, event, "fsm transition");
        self.current = next;
        Some(next)
    }
}

impl<S: StateTransitions + Default> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
