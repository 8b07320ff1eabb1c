//! Scroll-to-top control
//!
//! A floating button that appears once the page is scrolled past a
//! threshold. Showing is immediate. Hiding fades the button out first and
//! only drops `visibility` after the fade finishes, so the transition never
//! jumps. The owner schedules the end of the fade and reports back with the
//! ticket it was given; a ticket from an earlier fade is ignored.

use folio_core::{StateMachine, StateTransitions};

use crate::page::{ElementId, Page, ScrollBehavior, ScrollRequest};

/// Scroll-to-top control events
pub mod scroll_top_events {
    pub const SHOW: u32 = 20_000;
    pub const HIDE: u32 = 20_001;
    pub const FADE_DONE: u32 = 20_002;
}

/// Visibility state of the control
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ScrollTopState {
    #[default]
    Hidden,
    Visible,
    /// Transparent but still laid out until the fade ends
    FadingOut,
}

impl StateTransitions for ScrollTopState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use scroll_top_events::*;
        match (self, event) {
            (ScrollTopState::Hidden, SHOW) => Some(ScrollTopState::Visible),
            (ScrollTopState::FadingOut, SHOW) => Some(ScrollTopState::Visible),
            (ScrollTopState::Visible, HIDE) => Some(ScrollTopState::FadingOut),
            (ScrollTopState::FadingOut, FADE_DONE) => Some(ScrollTopState::Hidden),
            _ => None,
        }
    }
}

impl ScrollTopState {
    /// Whether the control reacts to clicks
    pub fn is_interactive(&self) -> bool {
        matches!(self, ScrollTopState::Visible)
    }
}

/// Ticket identifying one fade-out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FadeTicket(u64);

/// The scroll-to-top button and its visibility state
#[derive(Debug)]
pub struct ScrollTopControl {
    element: ElementId,
    threshold: f32,
    state: StateMachine<ScrollTopState>,
    generation: u64,
}

impl ScrollTopControl {
    pub fn new(element: impl Into<ElementId>, threshold: f32) -> Self {
        Self {
            element: element.into(),
            threshold,
            state: StateMachine::new(ScrollTopState::Hidden),
            generation: 0,
        }
    }

    pub fn element(&self) -> &ElementId {
        &self.element
    }

    pub fn state(&self) -> ScrollTopState {
        self.state.current()
    }

    /// Visible strictly past the threshold
    pub fn should_show(&self, scroll_offset: f32) -> bool {
        scroll_offset > self.threshold
    }

    /// Create the button if the page does not already carry one
    pub fn mount<P: Page + ?Sized>(&mut self, page: &mut P) {
        if !page.exists(&self.element) {
            page.create_element(&self.element, "button", None, None);
            page.add_class(&self.element, "scroll-to-top");
            page.set_attribute(&self.element, "aria-label", "Scroll to top");
        }
        page.set_style(&self.element, "opacity", "0");
        page.set_style(&self.element, "visibility", "hidden");
        page.set_style(&self.element, "transform", "scale(0.8)");
        page.set_style(&self.element, "transition", "all 0.3s ease");
    }

    pub fn unmount<P: Page + ?Sized>(&mut self, page: &mut P) {
        page.remove_element(&self.element);
        self.state = StateMachine::new(ScrollTopState::Hidden);
        self.generation += 1;
    }

    /// Drive visibility; returns a ticket when a fade-out has started
    pub fn update<P: Page + ?Sized>(&mut self, visible: bool, page: &mut P) -> Option<FadeTicket> {
        use scroll_top_events::*;

        let event = if visible { SHOW } else { HIDE };
        match self.state.send(event)? {
            ScrollTopState::Visible => {
                // Invalidate any fade still in progress
                self.generation += 1;
                page.set_style(&self.element, "opacity", "1");
                page.set_style(&self.element, "visibility", "visible");
                page.set_style(&self.element, "transform", "scale(1)");
                None
            }
            ScrollTopState::FadingOut => {
                self.generation += 1;
                page.set_style(&self.element, "opacity", "0");
                page.set_style(&self.element, "transform", "scale(0.8)");
                Some(FadeTicket(self.generation))
            }
            ScrollTopState::Hidden => None,
        }
    }

    /// End of a fade-out; stale tickets are ignored
    pub fn finish_fade<P: Page + ?Sized>(&mut self, ticket: FadeTicket, page: &mut P) -> bool {
        if ticket != FadeTicket(self.generation) {
            return false;
        }
        if self.state.send(scroll_top_events::FADE_DONE).is_some() {
            page.set_style(&self.element, "visibility", "hidden");
            true
        } else {
            false
        }
    }

    pub fn on_pointer_enter<P: Page + ?Sized>(&self, page: &mut P) {
        if self.state().is_interactive() {
            page.set_style(&self.element, "transform", "scale(1.1)");
            page.set_style(&self.element, "box-shadow", "0 8px 25px rgba(0, 0, 0, 0.3)");
        }
    }

    pub fn on_pointer_leave<P: Page + ?Sized>(&self, page: &mut P) {
        if self.state().is_interactive() {
            page.set_style(&self.element, "transform", "scale(1)");
            page.set_style(&self.element, "box-shadow", "none");
        }
    }

    /// Smoothly return to the top; returns false if the control is hidden
    pub fn on_click<P: Page + ?Sized>(&self, page: &mut P) -> bool {
        if !self.state().is_interactive() {
            return false;
        }
        page.scroll_to(ScrollRequest {
            top: 0.0,
            behavior: ScrollBehavior::Smooth,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessPage;

    fn mounted() -> (ScrollTopControl, HeadlessPage) {
        let mut page = HeadlessPage::new();
        let mut control = ScrollTopControl::new("scroll-to-top", 300.0);
        control.mount(&mut page);
        (control, page)
    }

    #[test]
    fn test_threshold_is_strict() {
        let control = ScrollTopControl::new("top", 300.0);
        assert!(!control.should_show(0.0));
        assert!(!control.should_show(300.0));
        assert!(control.should_show(301.0));
        assert!(control.should_show(600.0));
    }

    #[test]
    fn test_hide_waits_for_fade() {
        let (mut control, mut page) = mounted();
        let id = control.element().clone();

        assert_eq!(control.update(true, &mut page), None);
        assert_eq!(page.style(&id, "visibility"), Some("visible"));

        let ticket = control.update(false, &mut page).expect("fade starts");
        assert_eq!(control.state(), ScrollTopState::FadingOut);
        assert_eq!(page.style(&id, "opacity"), Some("0"));
        // Still laid out during the fade
        assert_eq!(page.style(&id, "visibility"), Some("visible"));

        assert!(control.finish_fade(ticket, &mut page));
        assert_eq!(control.state(), ScrollTopState::Hidden);
        assert_eq!(page.style(&id, "visibility"), Some("hidden"));
    }

    #[test]
    fn test_reshow_invalidates_fade() {
        let (mut control, mut page) = mounted();
        control.update(true, &mut page);
        let stale = control.update(false, &mut page).unwrap();
        control.update(true, &mut page);

        assert!(!control.finish_fade(stale, &mut page));
        assert_eq!(control.state(), ScrollTopState::Visible);
        assert_eq!(page.style(control.element(), "visibility"), Some("visible"));
    }

    #[test]
    fn test_click_only_when_visible() {
        let (mut control, mut page) = mounted();
        assert!(!control.on_click(&mut page));
        assert!(page.scroll_requests().is_empty());

        control.update(true, &mut page);
        assert!(control.on_click(&mut page));
        assert_eq!(
            page.last_scroll_request(),
            Some(ScrollRequest {
                top: 0.0,
                behavior: ScrollBehavior::Smooth
            })
        );
    }

    #[test]
    fn test_repeated_show_is_noop() {
        let (mut control, mut page) = mounted();
        control.update(true, &mut page);
        assert_eq!(control.update(true, &mut page), None);
        assert_eq!(control.state(), ScrollTopState::Visible);
    }
}
