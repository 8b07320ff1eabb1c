//! Folio Core Runtime
//!
//! Host-independent primitives for the Folio page runtime:
//!
//! - **Page Events**: the event vocabulary hosts feed into the controller
//! - **State Machines**: transition tables for widget states
//! - **Timers**: cooperative, single-threaded timer and frame queues
//! - **Rate Limiting**: throttle, debounce and frame-aligned coalescing
//!
//! # Example
//!
//! ```rust
//! use folio_core::rate_limit::FrameThrottle;
//!
//! let mut guard = FrameThrottle::new();
//!
//! // A burst of scroll events asks for exactly one frame
//! assert!(guard.request());
//! assert!(!guard.request());
//! assert!(guard.begin_frame());
//! ```

pub mod events;
pub mod fsm;
pub mod rate_limit;
pub mod timer;

pub use events::{
    event_types, ElementId, EventPath, EventSource, IntersectionEntry, KeyCode, PageEvent,
};
pub use fsm::{StateMachine, StateTransitions};
pub use rate_limit::{
    throttle, Debounce, FrameCoalesced, FrameThrottle, Throttle, Throttled,
};
pub use timer::{FrameQueue, TimerId, TimerQueue};
