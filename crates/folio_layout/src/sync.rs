//! Scroll-reactive state synchronizer
//!
//! Maps the continuous scroll offset onto discrete presentation state:
//!
//! ```text
//! scroll offset ──► compute() ──► ScrollSnapshot ──► apply() ──► page writes
//!   (read once)      all reads      (pure data)      all writes
//! ```
//!
//! `compute` only reads the layout and `apply` only writes presentation, so
//! a tick never interleaves reads with writes (no layout thrashing). Both
//! are cheap enough to run once per display refresh; the owner decides how
//! often through a rate limiter.

use folio_core::IntersectionEntry;
use rustc_hash::FxHashMap;

use crate::page::{set_class, ElementId, LayoutSource, Page};
use crate::parallax::{self, ParallaxLayer};
use crate::reveal::RevealObserver;
use crate::scroll_top::{FadeTicket, ScrollTopControl};
use crate::sections::SectionRegistry;

/// Synchronizer configuration
#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub navbar: ElementId,
    /// Navbar gets the scrolled style at or past this offset
    pub navbar_threshold: f32,
    /// Probe distance below the scroll offset for active-section detection
    pub look_ahead: f32,
    pub nav_link_class: String,
    pub scrolled_class: String,
    pub active_class: String,
    pub parallax: Vec<ParallaxLayer>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            navbar: ElementId::from("navbar"),
            navbar_threshold: 50.0,
            look_ahead: 100.0,
            nav_link_class: "nav-link".to_string(),
            scrolled_class: "scrolled".to_string(),
            active_class: "active".to_string(),
            parallax: Vec::new(),
        }
    }
}

/// Everything one tick derives from the scroll offset
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollSnapshot {
    pub scroll_offset: f32,
    pub past_threshold: bool,
    pub active_section: Option<ElementId>,
    /// Every nav link on the page, in document order
    pub nav_links: Vec<ElementId>,
    /// The nav link pointing at the active section
    pub active_link: Option<ElementId>,
    pub show_scroll_top: bool,
    pub parallax_offsets: FxHashMap<ElementId, f32>,
    pub intersections: Vec<IntersectionEntry>,
}

/// Side effects of applying a snapshot that the owner must schedule
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SyncOutcome {
    /// A scroll-to-top fade-out started; finish it after the fade duration
    pub fade: Option<FadeTicket>,
    pub revealed: Vec<ElementId>,
}

/// Keeps scroll-derived presentation in step with the scroll offset
#[derive(Debug)]
pub struct ScrollSynchronizer {
    config: SyncConfig,
    scroll_top: Option<ScrollTopControl>,
    reveal: Option<RevealObserver>,
    last: Option<ScrollSnapshot>,
}

impl ScrollSynchronizer {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            scroll_top: None,
            reveal: None,
            last: None,
        }
    }

    pub fn with_scroll_top(mut self, control: ScrollTopControl) -> Self {
        self.scroll_top = Some(control);
        self
    }

    pub fn with_reveal(mut self, observer: RevealObserver) -> Self {
        self.reveal = Some(observer);
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn scroll_top(&self) -> Option<&ScrollTopControl> {
        self.scroll_top.as_ref()
    }

    pub fn scroll_top_mut(&mut self) -> Option<&mut ScrollTopControl> {
        self.scroll_top.as_mut()
    }

    pub fn reveal(&self) -> Option<&RevealObserver> {
        self.reveal.as_ref()
    }

    pub fn reveal_mut(&mut self) -> Option<&mut RevealObserver> {
        self.reveal.as_mut()
    }

    /// The snapshot applied by the most recent tick
    pub fn last_snapshot(&self) -> Option<&ScrollSnapshot> {
        self.last.as_ref()
    }

    /// Read phase: sample scroll offset and layout once
    pub fn compute<L: LayoutSource + ?Sized>(&self, layout: &L) -> ScrollSnapshot {
        let scroll_offset = layout.scroll_offset();
        let sections = SectionRegistry::sample(layout);
        let active_section = sections
            .active_at(scroll_offset, self.config.look_ahead)
            .cloned();

        let nav_links = layout.elements_with_class(&self.config.nav_link_class);
        let active_link = active_section.as_ref().and_then(|section| {
            let href = format!("#{}", section);
            nav_links
                .iter()
                .find(|link| layout.attribute(link, "href").as_deref() == Some(href.as_str()))
                .cloned()
        });

        let show_scroll_top = self
            .scroll_top
            .as_ref()
            .is_some_and(|control| control.should_show(scroll_offset));

        let intersections = self
            .reveal
            .as_ref()
            .map(|observer| observer.entries_from_layout(layout))
            .unwrap_or_default();

        ScrollSnapshot {
            scroll_offset,
            past_threshold: scroll_offset >= self.config.navbar_threshold,
            active_section,
            nav_links,
            active_link,
            show_scroll_top,
            parallax_offsets: parallax::offsets(&self.config.parallax, scroll_offset),
            intersections,
        }
    }

    /// Write phase: push a snapshot to the page
    pub fn apply<P: Page + ?Sized>(&mut self, snapshot: ScrollSnapshot, page: &mut P) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();

        set_class(
            page,
            &self.config.navbar,
            &self.config.scrolled_class,
            snapshot.past_threshold,
        );

        // Clear-then-mark in one pass: only the active link keeps the class
        for link in &snapshot.nav_links {
            let is_active = snapshot.active_link.as_ref() == Some(link);
            set_class(page, link, &self.config.active_class, is_active);
        }

        if let Some(control) = self.scroll_top.as_mut() {
            outcome.fade = control.update(snapshot.show_scroll_top, page);
        }

        for layer in &self.config.parallax {
            if let Some(offset) = snapshot.parallax_offsets.get(&layer.element) {
                page.set_style(&layer.element, "transform", &parallax::transform_for(*offset));
            }
        }

        if let Some(observer) = self.reveal.as_mut() {
            outcome.revealed = observer.process(&snapshot.intersections, page);
        }

        if self.last.as_ref().map(|s| &s.active_section) != Some(&snapshot.active_section) {
            tracing::debug!(
                section = ?snapshot.active_section,
                offset = snapshot.scroll_offset,
                "active section changed"
            );
        }
        self.last = Some(snapshot);
        outcome
    }

    /// One full tick: compute then apply
    pub fn sync<P: Page + ?Sized>(&mut self, page: &mut P) -> SyncOutcome {
        let snapshot = self.compute(&*page);
        self.apply(snapshot, page)
    }
}
