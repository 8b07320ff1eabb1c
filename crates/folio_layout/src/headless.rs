//! In-memory page for tests and headless hosts
//!
//! `HeadlessPage` keeps elements in document order with fixed bounds, so
//! the runtime can be driven by synthetic events and its presentation
//! writes inspected afterwards.
//!
//! ```rust
//! use folio_layout::headless::{HeadlessElement, HeadlessPage};
//! use folio_layout::page::{LayoutSource, Presentation};
//!
//! let mut page = HeadlessPage::new()
//!     .with_section("home", 0.0, 800.0)
//!     .with_element("navbar", HeadlessElement::new("nav").bounds(0.0, 0.0, 1280.0, 70.0));
//!
//! page.add_class(&"navbar".into(), "scrolled");
//! assert!(page.has_class(&"navbar".into(), "scrolled"));
//! ```

use indexmap::{IndexMap, IndexSet};

use crate::geometry::{ElementBounds, Viewport};
use crate::page::{ElementId, LayoutSource, Presentation, ScrollRequest, SectionGeometry};

const FORM_CONTROL_TAGS: [&str; 3] = ["input", "textarea", "select"];

/// One element of a [`HeadlessPage`]
#[derive(Clone, Debug, Default)]
pub struct HeadlessElement {
    pub tag: String,
    pub parent: Option<ElementId>,
    pub bounds: Option<ElementBounds>,
    pub classes: IndexSet<String>,
    pub attributes: IndexMap<String, String>,
    pub styles: IndexMap<String, String>,
    pub text: String,
    pub value: String,
}

impl HeadlessElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn parent(mut self, parent: impl Into<ElementId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn bounds(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.bounds = Some(ElementBounds::new(x, y, width, height));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// An in-memory document
#[derive(Clone, Debug, Default)]
pub struct HeadlessPage {
    elements: IndexMap<ElementId, HeadlessElement>,
    scroll_offset: f32,
    viewport: Viewport,
    body_scroll_locked: bool,
    scroll_requests: Vec<ScrollRequest>,
}

impl HeadlessPage {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Building
    // =========================================================================

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    /// Append a full-width `<section>` at `top`
    pub fn with_section(self, id: impl Into<ElementId>, top: f32, height: f32) -> Self {
        let width = self.viewport.width;
        self.with_element(id, HeadlessElement::new("section").bounds(0.0, top, width, height))
    }

    /// Append an element at the end of the document
    pub fn with_element(mut self, id: impl Into<ElementId>, element: HeadlessElement) -> Self {
        self.insert(id, element);
        self
    }

    pub fn insert(&mut self, id: impl Into<ElementId>, element: HeadlessElement) {
        self.elements.insert(id.into(), element);
    }

    // =========================================================================
    // Simulated user/host actions
    // =========================================================================

    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = offset.max(0.0);
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn set_bounds(&mut self, id: &ElementId, bounds: ElementBounds) {
        if let Some(element) = self.elements.get_mut(id) {
            element.bounds = Some(bounds);
        }
    }

    /// Finish the most recent programmatic scroll
    pub fn settle_scroll(&mut self) {
        if let Some(request) = self.scroll_requests.last() {
            self.scroll_offset = request.top.max(0.0);
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn element(&self, id: &ElementId) -> Option<&HeadlessElement> {
        self.elements.get(id)
    }

    pub fn style(&self, id: &ElementId, property: &str) -> Option<&str> {
        self.elements
            .get(id)
            .and_then(|e| e.styles.get(property))
            .map(String::as_str)
    }

    pub fn is_body_scroll_locked(&self) -> bool {
        self.body_scroll_locked
    }

    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    pub fn last_scroll_request(&self) -> Option<ScrollRequest> {
        self.scroll_requests.last().copied()
    }

    /// Ids of every element in document order
    pub fn element_ids(&self) -> impl Iterator<Item = &ElementId> {
        self.elements.keys()
    }

    fn is_descendant_of(&self, id: &ElementId, ancestor: &ElementId) -> bool {
        let mut current = self.elements.get(id).and_then(|e| e.parent.as_ref());
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.elements.get(parent).and_then(|e| e.parent.as_ref());
        }
        false
    }
}

impl LayoutSource for HeadlessPage {
    fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn sections(&self) -> Vec<SectionGeometry> {
        self.elements
            .iter()
            .filter(|(_, e)| e.tag == "section")
            .filter_map(|(id, e)| {
                e.bounds
                    .map(|b| SectionGeometry::new(id.clone(), b.y, b.height))
            })
            .collect()
    }

    fn element_bounds(&self, id: &ElementId) -> Option<ElementBounds> {
        self.elements.get(id).and_then(|e| e.bounds)
    }

    fn exists(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    fn elements_with_class(&self, class: &str) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|(_, e)| e.classes.contains(class))
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn has_class(&self, id: &ElementId, class: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|e| e.classes.contains(class))
    }

    fn attribute(&self, id: &ElementId, name: &str) -> Option<String> {
        self.elements
            .get(id)
            .and_then(|e| e.attributes.get(name).cloned())
    }

    fn text(&self, id: &ElementId) -> Option<String> {
        self.elements.get(id).map(|e| e.text.clone())
    }

    fn value(&self, id: &ElementId) -> Option<String> {
        self.elements.get(id).map(|e| e.value.clone())
    }

    fn form_fields(&self, form: &ElementId) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|(_, e)| FORM_CONTROL_TAGS.contains(&e.tag.as_str()))
            .filter(|(id, _)| self.is_descendant_of(id, form))
            .map(|(id, _)| id.clone())
            .collect()
    }
}

impl Presentation for HeadlessPage {
    fn add_class(&mut self, id: &ElementId, class: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, id: &ElementId, class: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.classes.shift_remove(class);
        }
    }

    fn set_style(&mut self, id: &ElementId, property: &str, value: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element
                .styles
                .insert(property.to_string(), value.to_string());
        }
    }

    fn set_text(&mut self, id: &ElementId, text: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.text = text.to_string();
        }
    }

    fn set_value(&mut self, id: &ElementId, value: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.value = value.to_string();
        }
    }

    fn set_attribute(&mut self, id: &ElementId, name: &str, value: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element
                .attributes
                .insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, id: &ElementId, name: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.attributes.shift_remove(name);
        }
    }

    fn create_element(
        &mut self,
        id: &ElementId,
        tag: &str,
        parent: Option<&ElementId>,
        after: Option<&ElementId>,
    ) {
        if self.elements.contains_key(id) {
            return;
        }
        let mut element = HeadlessElement::new(tag);
        element.parent = parent.cloned();

        match after.and_then(|a| self.elements.get_index_of(a)) {
            Some(index) => {
                self.elements.shift_insert(index + 1, id.clone(), element);
            }
            None => {
                self.elements.insert(id.clone(), element);
            }
        }
    }

    fn remove_element(&mut self, id: &ElementId) {
        self.elements.shift_remove(id);
    }

    fn set_body_scroll_locked(&mut self, locked: bool) {
        self.body_scroll_locked = locked;
    }

    fn scroll_to(&mut self, request: ScrollRequest) {
        self.scroll_requests.push(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::ScrollBehavior;

    fn id(s: &str) -> ElementId {
        ElementId::from(s)
    }

    #[test]
    fn test_sections_in_document_order() {
        let page = HeadlessPage::new()
            .with_section("home", 0.0, 600.0)
            .with_element("nav", HeadlessElement::new("nav"))
            .with_section("about", 600.0, 400.0);

        let sections = page.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].id, id("home"));
        assert_eq!(sections[1].top, 600.0);
    }

    #[test]
    fn test_writes_to_missing_elements_are_ignored() {
        let mut page = HeadlessPage::new();
        page.add_class(&id("ghost"), "active");
        page.set_style(&id("ghost"), "opacity", "1");
        page.remove_element(&id("ghost"));
        assert!(!page.exists(&id("ghost")));
        assert_eq!(page.style(&id("ghost"), "opacity"), None);
    }

    #[test]
    fn test_create_after_sibling() {
        let mut page = HeadlessPage::new()
            .with_element("form", HeadlessElement::new("form"))
            .with_element("email", HeadlessElement::new("input").parent("form"))
            .with_element("message", HeadlessElement::new("textarea").parent("form"));

        page.create_element(&id("email-error"), "span", Some(&id("form")), Some(&id("email")));
        let order: Vec<_> = page.element_ids().map(|e| e.as_str().to_string()).collect();
        assert_eq!(order, vec!["form", "email", "email-error", "message"]);
        assert_eq!(page.form_fields(&id("form")), vec![id("email"), id("message")]);
    }

    #[test]
    fn test_settle_scroll_applies_last_request() {
        let mut page = HeadlessPage::new();
        page.set_scroll_offset(600.0);
        page.scroll_to(ScrollRequest {
            top: 0.0,
            behavior: ScrollBehavior::Smooth,
        });
        assert_eq!(page.scroll_offset(), 600.0);
        page.settle_scroll();
        assert_eq!(page.scroll_offset(), 0.0);
    }
}
