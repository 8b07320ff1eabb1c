//! Folio Page Controller
//!
//! Interactivity for a single-page portfolio site: sticky navbar, active
//! section highlighting, mobile menu, scroll-to-top button, reveal-on-scroll,
//! parallax hero, contact form validation and submission, notifications.
//!
//! A host owns the document and the clock. It implements
//! [`Page`](folio_layout::Page) for its document, feeds events into a
//! [`PageController`] and calls it back for timers and display refreshes.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use folio_app::prelude::*;
//!
//! let mut page = HeadlessPage::new()
//!     .with_element("navbar", HeadlessElement::new("nav"))
//!     .with_section("home", 0.0, 900.0);
//!
//! let mut controller = PageController::new(SiteConfig::default());
//! controller.dispatch(&mut page, Duration::ZERO, &PageEvent::DomContentLoaded);
//!
//! page.set_scroll_offset(120.0);
//! controller.dispatch(&mut page, Duration::from_millis(5), &PageEvent::Scroll);
//! controller.run_frame(&mut page, Duration::from_millis(16));
//!
//! assert!(page.has_class(&"navbar".into(), "scrolled"));
//! ```

pub mod bindings;
pub mod config;
pub mod controller;
pub mod effects;
mod error;
pub mod form;
pub mod notify;
pub mod submit;

#[cfg(test)]
mod tests;

pub use bindings::{Binding, BindingTable, BindingTarget, HandlerKind};
pub use config::{ScrollPolicy, SiteConfig};
pub use controller::PageController;
pub use error::{FolioError, Result};
pub use form::{FieldError, FieldKind, FieldSpec, FieldValidation, FormValidator, LengthPolicy};
pub use notify::{NotificationKind, Notifier};
pub use submit::{SimulatedTransport, Submission, SubmissionTransport, SubmitGate, SubmitLock};

/// Prelude module - import everything a host commonly needs
pub mod prelude {
    pub use crate::bindings::HandlerKind;
    pub use crate::config::{ScrollPolicy, SiteConfig};
    pub use crate::controller::PageController;
    pub use crate::error::{FolioError, Result};
    pub use crate::notify::NotificationKind;

    pub use folio_core::{ElementId, KeyCode, PageEvent};
    pub use folio_layout::headless::{HeadlessElement, HeadlessPage};
    pub use folio_layout::page::{LayoutSource, Page, Presentation, ScrollBehavior};
}
