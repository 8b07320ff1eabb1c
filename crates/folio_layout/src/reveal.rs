//! Reveal-on-scroll
//!
//! Observed elements start hidden and shifted down. The first time an
//! element intersects the (margin-adjusted) viewport by at least the
//! threshold it is revealed and dropped from observation. Revealing is
//! one-shot: nothing ever moves an element back to pending.

use folio_core::{IntersectionEntry, StateTransitions};
use indexmap::IndexMap;

use crate::geometry::{intersection_ratio, RootMargin};
use crate::page::{ElementId, LayoutSource, Page};

/// Reveal events
pub mod reveal_events {
    pub const INTERSECTED: u32 = 40_000;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RevealState {
    #[default]
    Pending,
    /// Terminal
    Revealed,
}

impl StateTransitions for RevealState {
    fn on_event(&self, event: u32) -> Option<Self> {
        match (self, event) {
            (RevealState::Pending, reveal_events::INTERSECTED) => Some(RevealState::Revealed),
            _ => None,
        }
    }
}

/// Observer options
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealConfig {
    /// Minimum visible fraction that counts as "in view"
    pub threshold: f32,
    pub root_margin: RootMargin,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: RootMargin::new(0.0, 0.0, -50.0, 0.0),
        }
    }
}

/// Tracks which elements are still waiting to be revealed
#[derive(Debug, Default)]
pub struct RevealObserver {
    config: RevealConfig,
    states: IndexMap<ElementId, RevealState>,
}

impl RevealObserver {
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            states: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Start observing an element and apply its hidden starting style
    ///
    /// Already-known elements (pending or revealed) are left alone.
    pub fn observe<P: Page + ?Sized>(&mut self, id: ElementId, page: &mut P) {
        if self.states.contains_key(&id) || !page.exists(&id) {
            return;
        }
        page.set_style(&id, "opacity", "0");
        page.set_style(&id, "transform", "translateY(30px)");
        page.set_style(&id, "transition", "opacity 0.8s ease, transform 0.8s ease");
        self.states.insert(id, RevealState::Pending);
    }

    pub fn state(&self, id: &ElementId) -> Option<RevealState> {
        self.states.get(id).copied()
    }

    /// Elements still being observed
    pub fn pending(&self) -> impl Iterator<Item = &ElementId> {
        self.states
            .iter()
            .filter(|(_, state)| **state == RevealState::Pending)
            .map(|(id, _)| id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending().count()
    }

    /// Compute intersection entries for pending elements from live layout
    ///
    /// Stands in for a host-side intersection observer when the host only
    /// reports geometry.
    pub fn entries_from_layout<L: LayoutSource + ?Sized>(&self, layout: &L) -> Vec<IntersectionEntry> {
        let root = self
            .config
            .root_margin
            .expand(layout.viewport().rect_at(layout.scroll_offset()));

        self.pending()
            .filter_map(|id| {
                let bounds = layout.element_bounds(id)?;
                let ratio = intersection_ratio(&bounds, &root);
                Some(IntersectionEntry {
                    target: id.clone(),
                    is_intersecting: ratio.is_some(),
                    ratio: ratio.unwrap_or(0.0),
                })
            })
            .collect()
    }

    /// Reveal every pending element that came into view
    ///
    /// Returns the newly revealed elements. Entries for unknown or already
    /// revealed elements are ignored.
    pub fn process<P: Page + ?Sized>(
        &mut self,
        entries: &[IntersectionEntry],
        page: &mut P,
    ) -> Vec<ElementId> {
        let mut revealed = Vec::new();
        for entry in entries {
            if !entry.is_intersecting || entry.ratio < self.config.threshold {
                continue;
            }
            let Some(state) = self.states.get_mut(&entry.target) else {
                continue;
            };
            let Some(next) = state.on_event(reveal_events::INTERSECTED) else {
                continue;
            };
            *state = next;
            page.set_style(&entry.target, "opacity", "1");
            page.set_style(&entry.target, "transform", "translateY(0)");
            page.add_class(&entry.target, "revealed");
            revealed.push(entry.target.clone());
        }
        if !revealed.is_empty() {
            tracing::trace!(count = revealed.len(), "revealed elements");
        }
        revealed
    }

    /// Forget every element (used on teardown)
    pub fn disconnect(&mut self) {
        self.states.clear();
    }
}
