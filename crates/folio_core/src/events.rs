//! Page event vocabulary
//!
//! Hosts translate raw platform input (browser events, or synthetic events
//! in tests) into [`PageEvent`] values. The controller looks up the handlers
//! bound to `(EventSource, event type)` and runs them in order.

use std::fmt;

use smallvec::SmallVec;

/// Event type identifiers used by bindings and state machines
pub mod event_types {
    pub const SCROLL: u32 = 1;
    pub const RESIZE: u32 = 2;
    pub const CLICK: u32 = 3;
    pub const KEY_DOWN: u32 = 4;
    pub const SUBMIT: u32 = 5;
    pub const INPUT: u32 = 6;
    pub const POINTER_ENTER: u32 = 7;
    pub const POINTER_LEAVE: u32 = 8;
    pub const LOAD: u32 = 9;
    pub const DOM_CONTENT_LOADED: u32 = 10;
    pub const INTERSECTION: u32 = 11;
}

/// Identifier of a page element (the DOM `id`, or a generated one)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&String> for ElementId {
    fn from(id: &String) -> Self {
        Self(id.clone())
    }
}

/// Where an event was raised
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventSource {
    Window,
    Document,
    Element(ElementId),
}

/// Keyboard key identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Enter,
    Tab,
    Other(u32),
}

/// Target chain of a click, innermost first (target, parent, grandparent, ...)
pub type EventPath = SmallVec<[ElementId; 8]>;

/// One viewport-intersection observation for an element
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    /// Visible fraction of the element, 0.0 to 1.0
    pub ratio: f32,
}

/// An input event delivered to the page controller
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    /// Window scrolled; the controller reads the offset from layout
    Scroll,
    Resize { width: f32, height: f32 },
    Click { path: EventPath },
    KeyDown { key: KeyCode },
    Submit { form: ElementId },
    Input { field: ElementId },
    PointerEnter { target: ElementId },
    PointerLeave { target: ElementId },
    /// All page resources finished loading
    Load,
    DomContentLoaded,
    /// Host-side intersection observer delivered a batch of entries
    Intersection(Vec<IntersectionEntry>),
}

impl PageEvent {
    /// Build a click event from the innermost target outwards
    pub fn click<I, E>(path: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ElementId>,
    {
        PageEvent::Click {
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    pub fn event_type(&self) -> u32 {
        use event_types::*;
        match self {
            PageEvent::Scroll => SCROLL,
            PageEvent::Resize { .. } => RESIZE,
            PageEvent::Click { .. } => CLICK,
            PageEvent::KeyDown { .. } => KEY_DOWN,
            PageEvent::Submit { .. } => SUBMIT,
            PageEvent::Input { .. } => INPUT,
            PageEvent::PointerEnter { .. } => POINTER_ENTER,
            PageEvent::PointerLeave { .. } => POINTER_LEAVE,
            PageEvent::Load => LOAD,
            PageEvent::DomContentLoaded => DOM_CONTENT_LOADED,
            PageEvent::Intersection(_) => INTERSECTION,
        }
    }

    /// The object the event was raised on
    ///
    /// Clicks are attributed to their innermost target; a click with an
    /// empty path is treated as a click on the document.
    pub fn source(&self) -> EventSource {
        match self {
            PageEvent::Scroll | PageEvent::Resize { .. } | PageEvent::Load => EventSource::Window,
            PageEvent::KeyDown { .. }
            | PageEvent::DomContentLoaded
            | PageEvent::Intersection(_) => EventSource::Document,
            PageEvent::Click { path } => match path.first() {
                Some(target) => EventSource::Element(target.clone()),
                None => EventSource::Document,
            },
            PageEvent::Submit { form } => EventSource::Element(form.clone()),
            PageEvent::Input { field } => EventSource::Element(field.clone()),
            PageEvent::PointerEnter { target } | PageEvent::PointerLeave { target } => {
                EventSource::Element(target.clone())
            }
        }
    }

    /// True if `id` is the target or one of its ancestors (clicks only)
    pub fn path_contains(&self, id: &ElementId) -> bool {
        match self {
            PageEvent::Click { path } => path.iter().any(|p| p == id),
            _ => false,
        }
    }
}
