//! One-shot page effects: hero typing, preloader fade-out and in-page
//! anchor scrolling.
//!
//! Effects that play over time hand the owner the delay until their next
//! step and are called back through `tick`/`finish`.

use std::time::Duration;

use folio_layout::page::{ElementId, Page};

// =============================================================================
// Typewriter
// =============================================================================

/// Retypes an element's text one character at a time
#[derive(Debug)]
pub struct Typewriter {
    element: ElementId,
    start_delay: Duration,
    char_delay: Duration,
    text: Vec<char>,
    typed: usize,
}

impl Typewriter {
    pub fn new(element: impl Into<ElementId>, start_delay: Duration, char_delay: Duration) -> Self {
        Self {
            element: element.into(),
            start_delay,
            char_delay,
            text: Vec::new(),
            typed: 0,
        }
    }

    pub fn element(&self) -> &ElementId {
        &self.element
    }

    /// Capture and clear the text; returns the delay before the first
    /// character, or None when there is nothing to type
    pub fn start<P: Page + ?Sized>(&mut self, page: &mut P) -> Option<Duration> {
        let text = page.text(&self.element)?;
        if text.is_empty() {
            return None;
        }
        self.text = text.chars().collect();
        self.typed = 0;
        page.set_text(&self.element, "");
        tracing::trace!(chars = self.text.len(), "typewriter started");
        Some(self.start_delay)
    }

    /// Type the next character; returns the delay before the one after it
    pub fn tick<P: Page + ?Sized>(&mut self, page: &mut P) -> Option<Duration> {
        if self.is_done() {
            return None;
        }
        self.typed += 1;
        let shown: String = self.text[..self.typed].iter().collect();
        page.set_text(&self.element, &shown);
        (!self.is_done()).then_some(self.char_delay)
    }

    /// Write out whatever is left at once
    pub fn finish<P: Page + ?Sized>(&mut self, page: &mut P) {
        if self.is_done() {
            return;
        }
        self.typed = self.text.len();
        let full: String = self.text.iter().collect();
        page.set_text(&self.element, &full);
    }

    pub fn is_done(&self) -> bool {
        self.typed >= self.text.len()
    }
}

// =============================================================================
// Preloader
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PreloaderState {
    #[default]
    Visible,
    Fading,
    Hidden,
}

/// Loading overlay removed once the page has loaded
#[derive(Debug)]
pub struct Preloader {
    element: ElementId,
    fade: Duration,
    state: PreloaderState,
}

impl Preloader {
    pub fn new(element: impl Into<ElementId>, fade: Duration) -> Self {
        Self {
            element: element.into(),
            fade,
            state: PreloaderState::Visible,
        }
    }

    pub fn state(&self) -> PreloaderState {
        self.state
    }

    /// Start fading; returns the delay before it leaves layout
    pub fn on_load<P: Page + ?Sized>(&mut self, page: &mut P) -> Option<Duration> {
        if self.state != PreloaderState::Visible || !page.exists(&self.element) {
            return None;
        }
        page.set_style(&self.element, "opacity", "0");
        self.state = PreloaderState::Fading;
        Some(self.fade)
    }

    pub fn finish<P: Page + ?Sized>(&mut self, page: &mut P) {
        if self.state == PreloaderState::Fading {
            page.set_style(&self.element, "display", "none");
            self.state = PreloaderState::Hidden;
        }
    }
}

// =============================================================================
// Anchor scrolling
// =============================================================================

pub mod anchor {
    use folio_layout::page::{ElementId, LayoutSource, Page, ScrollBehavior, ScrollRequest};

    /// Element named by an in-page `#fragment` link
    pub fn fragment_target(href: &str) -> Option<ElementId> {
        let id = href.strip_prefix('#')?;
        (!id.is_empty()).then(|| ElementId::from(id))
    }

    /// Scroll position that puts the target just below the navbar
    pub fn scroll_target<L: LayoutSource + ?Sized>(
        layout: &L,
        href: &str,
        navbar: &ElementId,
    ) -> Option<f32> {
        let target = fragment_target(href)?;
        let bounds = layout.element_bounds(&target)?;
        let nav_height = layout
            .element_bounds(navbar)
            .map(|b| b.height)
            .unwrap_or(0.0);
        Some(bounds.y - nav_height)
    }

    /// Smooth-scroll to the link's target; false when there is none
    pub fn scroll_to_anchor<P: Page + ?Sized>(page: &mut P, href: &str, navbar: &ElementId) -> bool {
        let Some(top) = scroll_target(&*page, href, navbar) else {
            tracing::trace!(href, "anchor target missing");
            return false;
        };
        page.scroll_to(ScrollRequest {
            top,
            behavior: ScrollBehavior::Smooth,
        });
        true
    }
}
