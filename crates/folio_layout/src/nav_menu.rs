//! Mobile navigation menu
//!
//! Two states, `Closed` and `Open`, cycling freely. Besides the toggle
//! control, three things force the menu closed while it is open: choosing
//! a navigation link, clicking anywhere outside the menu, and Escape.
//!
//! Entering `Open` marks the toggle control and menu `active` and locks
//! body scrolling; entering `Closed` undoes both.

use folio_core::{KeyCode, PageEvent, StateMachine, StateTransitions};

use crate::page::{set_class, ElementId, Page};

/// Navigation menu events
pub mod menu_events {
    pub const TOGGLE: u32 = 30_000;
    pub const LINK_SELECTED: u32 = 30_001;
    pub const OUTSIDE_CLICK: u32 = 30_002;
    pub const ESCAPE: u32 = 30_003;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl StateTransitions for MenuState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use menu_events::*;
        match (self, event) {
            (MenuState::Closed, TOGGLE) => Some(MenuState::Open),
            (MenuState::Open, TOGGLE) => Some(MenuState::Closed),
            (MenuState::Open, LINK_SELECTED) => Some(MenuState::Closed),
            (MenuState::Open, OUTSIDE_CLICK) => Some(MenuState::Closed),
            (MenuState::Open, ESCAPE) => Some(MenuState::Closed),
            _ => None,
        }
    }
}

/// What a click meant to the menu
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuClick {
    /// The toggle control (or something inside it)
    Toggle,
    /// A navigation link inside or outside the menu
    Link(ElementId),
    /// Inside the menu but not on a link
    Inside,
    Outside,
}

/// The menu widget
#[derive(Debug)]
pub struct NavigationMenu {
    menu: ElementId,
    toggle_control: ElementId,
    link_class: String,
    state: StateMachine<MenuState>,
}

impl NavigationMenu {
    pub fn new(
        menu: impl Into<ElementId>,
        toggle_control: impl Into<ElementId>,
        link_class: impl Into<String>,
    ) -> Self {
        Self {
            menu: menu.into(),
            toggle_control: toggle_control.into(),
            link_class: link_class.into(),
            state: StateMachine::new(MenuState::Closed),
        }
    }

    pub fn menu(&self) -> &ElementId {
        &self.menu
    }

    pub fn toggle_control(&self) -> &ElementId {
        &self.toggle_control
    }

    pub fn link_class(&self) -> &str {
        &self.link_class
    }

    pub fn state(&self) -> MenuState {
        self.state.current()
    }

    pub fn is_open(&self) -> bool {
        self.state() == MenuState::Open
    }

    pub fn toggle<P: Page + ?Sized>(&mut self, page: &mut P) -> MenuState {
        self.send(menu_events::TOGGLE, page);
        self.state()
    }

    /// Force the menu closed; returns true if it was open
    pub fn close<P: Page + ?Sized>(&mut self, page: &mut P) -> bool {
        self.send(menu_events::OUTSIDE_CLICK, page)
    }

    /// Classify a click by walking its target path outwards
    pub fn classify_click<P: Page + ?Sized>(&self, path: &[ElementId], page: &P) -> MenuClick {
        for id in path {
            if id == &self.toggle_control {
                return MenuClick::Toggle;
            }
            if page.has_class(id, &self.link_class) {
                return MenuClick::Link(id.clone());
            }
            if id == &self.menu {
                return MenuClick::Inside;
            }
        }
        MenuClick::Outside
    }

    /// React to a click; returns the new state if it changed
    pub fn handle_click<P: Page + ?Sized>(
        &mut self,
        event: &PageEvent,
        page: &mut P,
    ) -> Option<MenuState> {
        let PageEvent::Click { path } = event else {
            return None;
        };
        let event = match self.classify_click(path, page) {
            MenuClick::Toggle => menu_events::TOGGLE,
            MenuClick::Link(_) => menu_events::LINK_SELECTED,
            MenuClick::Outside => menu_events::OUTSIDE_CLICK,
            MenuClick::Inside => return None,
        };
        self.send(event, page).then(|| self.state())
    }

    pub fn handle_key<P: Page + ?Sized>(&mut self, key: KeyCode, page: &mut P) -> Option<MenuState> {
        if key != KeyCode::Escape {
            return None;
        }
        self.send(menu_events::ESCAPE, page).then(|| self.state())
    }

    fn send<P: Page + ?Sized>(&mut self, event: u32, page: &mut P) -> bool {
        let Some(state) = self.state.send(event) else {
            return false;
        };
        let open = state == MenuState::Open;
        tracing::debug!(?state, "navigation menu");
        set_class(page, &self.toggle_control, "active", open);
        set_class(page, &self.menu, "active", open);
        page.set_attribute(
            &self.toggle_control,
            "aria-expanded",
            if open { "true" } else { "false" },
        );
        page.set_body_scroll_locked(open);
        true
    }
}
