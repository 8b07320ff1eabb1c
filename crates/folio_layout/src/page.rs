//! The page seen by the runtime
//!
//! A host exposes its document through two traits. [`LayoutSource`] is the
//! read side: live geometry and element attributes, never cached by the
//! runtime. [`Presentation`] is the write side: classes, inline styles,
//! text and scroll requests. The runtime never mutates layout directly.
//!
//! Pages may carry only a subset of the widgets the runtime knows about.
//! Reads of an absent element return `None` or an empty list, and writes
//! to an absent element are silent no-ops.

use crate::geometry::{ElementBounds, Viewport};

pub use folio_core::ElementId;

/// Geometry of one content section in document order
#[derive(Clone, Debug, PartialEq)]
pub struct SectionGeometry {
    pub id: ElementId,
    pub top: f32,
    pub height: f32,
}

impl SectionGeometry {
    pub fn new(id: impl Into<ElementId>, top: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    /// Half-open containment: `top <= pos < top + height`
    pub fn contains(&self, pos: f32) -> bool {
        pos >= self.top && pos < self.top + self.height
    }
}

/// How a programmatic scroll should move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// A programmatic scroll request
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRequest {
    pub top: f32,
    pub behavior: ScrollBehavior,
}

/// Read-only view of the live document
pub trait LayoutSource {
    /// Current vertical scroll offset of the window
    fn scroll_offset(&self) -> f32;

    fn viewport(&self) -> Viewport;

    /// Content sections, sampled in document order
    fn sections(&self) -> Vec<SectionGeometry>;

    fn element_bounds(&self, id: &ElementId) -> Option<ElementBounds>;

    fn exists(&self, id: &ElementId) -> bool;

    /// Elements carrying `class`, in document order
    fn elements_with_class(&self, class: &str) -> Vec<ElementId>;

    fn has_class(&self, id: &ElementId, class: &str) -> bool;

    fn attribute(&self, id: &ElementId, name: &str) -> Option<String>;

    fn text(&self, id: &ElementId) -> Option<String>;

    /// Current value of a form control
    fn value(&self, id: &ElementId) -> Option<String>;

    /// Form controls inside `form`, in document order
    fn form_fields(&self, form: &ElementId) -> Vec<ElementId>;
}

/// Style and visibility mutations
pub trait Presentation {
    fn add_class(&mut self, id: &ElementId, class: &str);

    fn remove_class(&mut self, id: &ElementId, class: &str);

    fn set_style(&mut self, id: &ElementId, property: &str, value: &str);

    fn set_text(&mut self, id: &ElementId, text: &str);

    fn set_value(&mut self, id: &ElementId, value: &str);

    fn set_attribute(&mut self, id: &ElementId, name: &str, value: &str);

    fn remove_attribute(&mut self, id: &ElementId, name: &str);

    /// Create an element under `parent` (the body when None), placed
    /// after `after` when given. No-op if `id` already exists.
    fn create_element(
        &mut self,
        id: &ElementId,
        tag: &str,
        parent: Option<&ElementId>,
        after: Option<&ElementId>,
    );

    fn remove_element(&mut self, id: &ElementId);

    /// Disable (true) or restore (false) scrolling of the page body
    fn set_body_scroll_locked(&mut self, locked: bool);

    fn scroll_to(&mut self, request: ScrollRequest);
}

/// A full page: readable layout plus writable presentation
pub trait Page: LayoutSource + Presentation {}

impl<T: LayoutSource + Presentation> Page for T {}

/// Toggle a class on or off
pub fn set_class<P: Presentation + ?Sized>(page: &mut P, id: &ElementId, class: &str, on: bool) {
    if on {
        page.add_class(id, class);
    } else {
        page.remove_class(id, class);
    }
}
