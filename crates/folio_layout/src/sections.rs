//! Section registry for active-section detection
//!
//! Layout can change at any time (images loading, fonts swapping, resize),
//! so the registry is sampled fresh from the [`LayoutSource`] on every
//! synchronizer tick and never kept between ticks.

use crate::page::{ElementId, LayoutSource, SectionGeometry};

/// Sections of the page in document order
#[derive(Clone, Debug, Default)]
pub struct SectionRegistry {
    sections: Vec<SectionGeometry>,
}

impl SectionRegistry {
    /// Sample the current section geometry
    pub fn sample<L: LayoutSource + ?Sized>(layout: &L) -> Self {
        Self {
            sections: layout.sections(),
        }
    }

    pub fn from_sections(sections: Vec<SectionGeometry>) -> Self {
        Self { sections }
    }

    /// The section under the probe line at `scroll_offset + look_ahead`
    ///
    /// The look-ahead accounts for the fixed header covering the top of
    /// the viewport. Overlapping sections resolve to the earliest in
    /// document order.
    pub fn active_at(&self, scroll_offset: f32, look_ahead: f32) -> Option<&ElementId> {
        let probe = scroll_offset + look_ahead;
        self.sections
            .iter()
            .find(|section| section.contains(probe))
            .map(|section| &section.id)
    }

    pub fn get(&self, id: &ElementId) -> Option<&SectionGeometry> {
        self.sections.iter().find(|section| &section.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SectionGeometry> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
