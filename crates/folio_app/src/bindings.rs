//! Event binding table
//!
//! Every `(target, event type) -> handler` wiring the controller reacts to
//! is listed here, built in one place from the site config. The controller
//! never inspects an event itself to decide who handles it; it asks the
//! table.
//!
//! Matching follows DOM bubbling: a binding on an element also sees clicks
//! on its descendants, and a document binding sees everything that is not
//! raised on the window.

use folio_core::{event_types, EventSource, PageEvent};
use folio_layout::page::{ElementId, LayoutSource};
use smallvec::SmallVec;

use crate::config::SiteConfig;

/// Where a binding listens
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingTarget {
    Window,
    Document,
    Element(ElementId),
    /// Any element carrying this class
    Class(String),
    /// Links with an in-page `#fragment` href
    HrefFragment,
}

impl BindingTarget {
    fn matches<L: LayoutSource + ?Sized>(&self, event: &PageEvent, layout: &L) -> bool {
        let source = event.source();
        match self {
            BindingTarget::Window => source == EventSource::Window,
            BindingTarget::Document => source != EventSource::Window,
            BindingTarget::Element(id) => {
                source == EventSource::Element(id.clone()) || event.path_contains(id)
            }
            BindingTarget::Class(class) => {
                related_elements(event).any(|id| layout.has_class(id, class))
            }
            BindingTarget::HrefFragment => related_elements(event).any(|id| {
                layout
                    .attribute(id, "href")
                    .is_some_and(|href| href.starts_with('#'))
            }),
        }
    }
}

/// The target and, for clicks, its ancestors
fn related_elements(event: &PageEvent) -> Box<dyn Iterator<Item = &ElementId> + '_> {
    match event {
        PageEvent::Click { path } => Box::new(path.iter()),
        PageEvent::Submit { form: id }
        | PageEvent::Input { field: id }
        | PageEvent::PointerEnter { target: id }
        | PageEvent::PointerLeave { target: id } => Box::new(std::iter::once(id)),
        _ => Box::new(std::iter::empty()),
    }
}

/// Controller operations an event can trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Initialize,
    ScrollSync,
    ResizeDebounce,
    PreloaderLoad,
    MenuClick,
    MenuEscape,
    AnchorScroll,
    ScrollTopClick,
    ScrollTopHover,
    FormSubmit,
    FieldInput,
    NotificationDismiss,
    RevealIntersection,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub target: BindingTarget,
    pub event_type: u32,
    pub handler: HandlerKind,
}

impl Binding {
    pub fn new(target: BindingTarget, event_type: u32, handler: HandlerKind) -> Self {
        Self {
            target,
            event_type,
            handler,
        }
    }

    pub fn matches<L: LayoutSource + ?Sized>(&self, event: &PageEvent, layout: &L) -> bool {
        self.event_type == event.event_type() && self.target.matches(event, layout)
    }
}

/// Ordered set of bindings; handlers run in table order
#[derive(Clone, Debug, Default)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full wiring of a portfolio page
    pub fn for_config(config: &SiteConfig) -> Self {
        use event_types::*;
        use BindingTarget::*;
        use HandlerKind::*;

        let elements = &config.elements;
        let scroll_top = ElementId::from(elements.scroll_to_top.as_str());

        let mut table = Self::new();
        table
            .bind(Document, DOM_CONTENT_LOADED, Initialize)
            .bind(Window, SCROLL, ScrollSync)
            .bind(Window, RESIZE, ResizeDebounce)
            .bind(Window, LOAD, PreloaderLoad)
            // Menu first so a link click closes it before scrolling
            .bind(Document, CLICK, MenuClick)
            .bind(Document, KEY_DOWN, MenuEscape)
            .bind(HrefFragment, CLICK, AnchorScroll)
            .bind(Element(scroll_top.clone()), CLICK, ScrollTopClick)
            .bind(Element(scroll_top.clone()), POINTER_ENTER, ScrollTopHover)
            .bind(Element(scroll_top), POINTER_LEAVE, ScrollTopHover)
            .bind(
                Element(elements.contact_form.as_str().into()),
                SUBMIT,
                FormSubmit,
            )
            .bind(Document, INPUT, FieldInput)
            .bind(Class("notification".to_string()), CLICK, NotificationDismiss)
            .bind(Document, INTERSECTION, RevealIntersection);
        table
    }

    pub fn bind(&mut self, target: BindingTarget, event_type: u32, handler: HandlerKind) -> &mut Self {
        self.bindings.push(Binding::new(target, event_type, handler));
        self
    }

    /// Handlers for `event`, in table order
    pub fn handlers_for<L: LayoutSource + ?Sized>(
        &self,
        event: &PageEvent,
        layout: &L,
    ) -> SmallVec<[HandlerKind; 4]> {
        self.bindings
            .iter()
            .filter(|b| b.matches(event, layout))
            .map(|b| b.handler)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
