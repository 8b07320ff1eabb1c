//! Parallax layers
//!
//! A layer moves against the scroll direction by `scroll * speed`, which
//! makes it lag behind the content and read as further away.

use rustc_hash::FxHashMap;

use crate::page::ElementId;

/// Default speed factor when none is configured
pub const DEFAULT_PARALLAX_SPEED: f32 = 0.5;

/// One element with a parallax speed
#[derive(Clone, Debug, PartialEq)]
pub struct ParallaxLayer {
    pub element: ElementId,
    pub speed: f32,
}

impl ParallaxLayer {
    pub fn new(element: impl Into<ElementId>, speed: f32) -> Self {
        Self {
            element: element.into(),
            speed,
        }
    }

    pub fn with_default_speed(element: impl Into<ElementId>) -> Self {
        Self::new(element, DEFAULT_PARALLAX_SPEED)
    }

    /// Vertical translation for a scroll offset
    pub fn offset_at(&self, scroll_offset: f32) -> f32 {
        -scroll_offset * self.speed
    }
}

/// Offsets for every layer, keyed by element
pub fn offsets(layers: &[ParallaxLayer], scroll_offset: f32) -> FxHashMap<ElementId, f32> {
    layers
        .iter()
        .map(|layer| (layer.element.clone(), layer.offset_at(scroll_offset)))
        .collect()
}

/// CSS transform value for a one-dimensional offset
pub fn transform_for(offset: f32) -> String {
    // -0.0 prints as "-0"
    let offset = if offset == 0.0 { 0.0 } else { offset };
    format!("translateY({}px)", offset)
}
