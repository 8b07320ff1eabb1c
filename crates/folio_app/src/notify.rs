//! Transient notifications
//!
//! At most one notification is on screen. Showing a new one removes the
//! current one immediately. Each notification walks a short lifecycle:
//!
//! ```text
//! Entering ──(enter delay)──► Shown ──(display time | click)──► Leaving ──(exit)──► removed
//! ```
//!
//! The notifier never owns a clock. It hands back [`NotificationTimer`]s
//! for the owner to schedule and is told when they fire. Every timer
//! carries the generation of the notification that created it, so a timer
//! outliving its notification is ignored.

use std::time::Duration;

use folio_core::{PageEvent, StateMachine, StateTransitions};
use folio_layout::page::{ElementId, Page};

use crate::config::NotificationConfig;

/// Notification lifecycle events
pub mod notification_events {
    pub const ENTERED: u32 = 50_000;
    pub const DISMISS: u32 = 50_001;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    /// Class name carried next to `notification`
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        }
    }

    fn background(&self) -> &'static str {
        match self {
            NotificationKind::Success => "linear-gradient(135deg, #6b8e4e, #8b5a3c)",
            NotificationKind::Error => "linear-gradient(135deg, #e74c3c, #c0392b)",
            NotificationKind::Info => "linear-gradient(135deg, #4a6fa5, #2c4a75)",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum NotificationPhase {
    #[default]
    Entering,
    Shown,
    Leaving,
}

impl StateTransitions for NotificationPhase {
    fn on_event(&self, event: u32) -> Option<Self> {
        use notification_events::*;
        match (self, event) {
            (NotificationPhase::Entering, ENTERED) => Some(NotificationPhase::Shown),
            (NotificationPhase::Entering, DISMISS) => Some(NotificationPhase::Leaving),
            (NotificationPhase::Shown, DISMISS) => Some(NotificationPhase::Leaving),
            _ => None,
        }
    }
}

/// What a notification timer does when it fires
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationStep {
    Enter,
    Dismiss,
    Remove,
}

/// A delayed step the owner must schedule
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotificationTimer {
    pub generation: u64,
    pub step: NotificationStep,
    pub delay: Duration,
}

#[derive(Debug)]
struct ActiveNotification {
    element: ElementId,
    generation: u64,
    kind: NotificationKind,
    phase: StateMachine<NotificationPhase>,
}

/// Shows one notification at a time
#[derive(Debug)]
pub struct Notifier {
    enter_delay: Duration,
    display: Duration,
    exit: Duration,
    generation: u64,
    current: Option<ActiveNotification>,
}

impl Notifier {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            enter_delay: Duration::from_millis(config.enter_delay_ms),
            display: Duration::from_millis(config.display_ms),
            exit: Duration::from_millis(config.exit_ms),
            generation: 0,
            current: None,
        }
    }

    /// Element of the notification on screen, if any
    pub fn current(&self) -> Option<&ElementId> {
        self.current.as_ref().map(|n| &n.element)
    }

    pub fn current_kind(&self) -> Option<NotificationKind> {
        self.current.as_ref().map(|n| n.kind)
    }

    pub fn phase(&self) -> Option<NotificationPhase> {
        self.current.as_ref().map(|n| n.phase.current())
    }

    /// Show `message`, replacing whatever is on screen
    ///
    /// Returns the enter and auto-dismiss timers.
    pub fn notify<P: Page + ?Sized>(
        &mut self,
        message: &str,
        kind: NotificationKind,
        page: &mut P,
    ) -> [NotificationTimer; 2] {
        self.remove_current(page);

        self.generation += 1;
        let generation = self.generation;
        let element = ElementId::new(format!("notification-{generation}"));

        page.create_element(&element, "div", None, None);
        page.add_class(&element, "notification");
        page.add_class(&element, kind.as_str());
        page.set_attribute(&element, "role", "status");
        page.set_text(&element, message);
        page.set_style(&element, "position", "fixed");
        page.set_style(&element, "top", "20px");
        page.set_style(&element, "right", "20px");
        page.set_style(&element, "z-index", "10000");
        page.set_style(&element, "opacity", "0");
        page.set_style(&element, "transform", "translateX(100%)");
        page.set_style(&element, "transition", "all 0.3s ease");
        page.set_style(&element, "background", kind.background());

        tracing::debug!(generation, kind = kind.as_str(), "notification shown");
        self.current = Some(ActiveNotification {
            element,
            generation,
            kind,
            phase: StateMachine::new(NotificationPhase::Entering),
        });

        [
            NotificationTimer {
                generation,
                step: NotificationStep::Enter,
                delay: self.enter_delay,
            },
            NotificationTimer {
                generation,
                step: NotificationStep::Dismiss,
                delay: self.display,
            },
        ]
    }

    /// A previously returned timer fired
    ///
    /// Returns a follow-up timer when the step starts another phase.
    pub fn on_timer<P: Page + ?Sized>(
        &mut self,
        timer: NotificationTimer,
        page: &mut P,
    ) -> Option<NotificationTimer> {
        let current = self.current.as_mut()?;
        if current.generation != timer.generation {
            tracing::trace!(
                stale = timer.generation,
                current = current.generation,
                "ignoring stale notification timer"
            );
            return None;
        }

        match timer.step {
            NotificationStep::Enter => {
                if current.phase.send(notification_events::ENTERED).is_some() {
                    page.set_style(&current.element, "opacity", "1");
                    page.set_style(&current.element, "transform", "translateX(0)");
                }
                None
            }
            NotificationStep::Dismiss => self.begin_leaving(page),
            NotificationStep::Remove => {
                self.remove_current(page);
                None
            }
        }
    }

    /// Dismiss early when the click landed on the notification
    pub fn handle_click<P: Page + ?Sized>(
        &mut self,
        event: &PageEvent,
        page: &mut P,
    ) -> Option<NotificationTimer> {
        let element = self.current.as_ref()?.element.clone();
        if !event.path_contains(&element) {
            return None;
        }
        self.begin_leaving(page)
    }

    /// Remove whatever is on screen without animation
    pub fn clear<P: Page + ?Sized>(&mut self, page: &mut P) {
        self.remove_current(page);
    }

    fn begin_leaving<P: Page + ?Sized>(&mut self, page: &mut P) -> Option<NotificationTimer> {
        let current = self.current.as_mut()?;
        current.phase.send(notification_events::DISMISS)?;
        page.set_style(&current.element, "opacity", "0");
        page.set_style(&current.element, "transform", "translateX(100%)");
        Some(NotificationTimer {
            generation: current.generation,
            step: NotificationStep::Remove,
            delay: self.exit,
        })
    }

    fn remove_current<P: Page + ?Sized>(&mut self, page: &mut P) {
        if let Some(previous) = self.current.take() {
            page.remove_element(&previous.element);
            tracing::trace!(generation = previous.generation, "notification removed");
        }
    }
}
