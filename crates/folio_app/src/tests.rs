//! End-to-end tests for the page controller
//!
//! Each test builds a headless portfolio page, drives the controller with
//! synthetic events on a virtual clock and inspects the resulting page.

use std::time::Duration;

use folio_core::IntersectionEntry;

use crate::notify::NotificationPhase;
use crate::prelude::*;
use crate::submit::{FAILURE_MESSAGE, INVALID_MESSAGE, SENDING_LABEL, SUCCESS_MESSAGE};

const FRAME: Duration = Duration::from_millis(16);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn id(s: &str) -> ElementId {
    ElementId::from(s)
}

/// The stock portfolio page
fn portfolio_page() -> HeadlessPage {
    let mut page = HeadlessPage::new()
        .with_viewport(1280.0, 800.0)
        .with_element("preloader", HeadlessElement::new("div"))
        .with_element(
            "navbar",
            HeadlessElement::new("nav").bounds(0.0, 0.0, 1280.0, 70.0),
        )
        .with_element("hamburger", HeadlessElement::new("div").parent("navbar"))
        .with_element("nav-menu", HeadlessElement::new("ul").parent("navbar"));

    for section in ["home", "about", "contact"] {
        page.insert(
            format!("link-{section}"),
            HeadlessElement::new("a")
                .class("nav-link")
                .attr("href", format!("#{section}"))
                .parent("nav-menu"),
        );
    }

    page.with_section("home", 0.0, 800.0)
        .with_element(
            "hero",
            HeadlessElement::new("div")
                .parent("home")
                .bounds(0.0, 0.0, 1280.0, 800.0),
        )
        .with_element(
            "hero-name",
            HeadlessElement::new("h1").parent("hero").text("Jane Doe"),
        )
        .with_section("about", 800.0, 800.0)
        .with_element(
            "item-1",
            HeadlessElement::new("div")
                .class("portfolio-item")
                .parent("about")
                .bounds(0.0, 900.0, 400.0, 300.0),
        )
        .with_element(
            "item-2",
            HeadlessElement::new("div")
                .class("skill-item")
                .parent("about")
                .bounds(0.0, 5000.0, 400.0, 200.0),
        )
        .with_section("contact", 1600.0, 800.0)
        .with_element("contactForm", HeadlessElement::new("form").parent("contact"))
        .with_element(
            "name",
            HeadlessElement::new("input")
                .attr("name", "name")
                .parent("contactForm"),
        )
        .with_element(
            "email",
            HeadlessElement::new("input")
                .attr("name", "email")
                .attr("type", "email")
                .parent("contactForm"),
        )
        .with_element(
            "subject",
            HeadlessElement::new("input")
                .attr("name", "subject")
                .parent("contactForm"),
        )
        .with_element(
            "message",
            HeadlessElement::new("textarea")
                .attr("name", "message")
                .parent("contactForm"),
        )
        .with_element(
            "contact-submit",
            HeadlessElement::new("button")
                .text("Send Message")
                .parent("contactForm"),
        )
}

/// Controller, page and clock
struct Harness {
    page: HeadlessPage,
    controller: PageController,
    now: Duration,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(SiteConfig::default())
    }

    fn with_config(config: SiteConfig) -> Self {
        Self::with_page(portfolio_page(), config)
    }

    fn with_page(page: HeadlessPage, config: SiteConfig) -> Self {
        init_tracing();
        let mut harness = Self {
            page,
            controller: PageController::new(config),
            now: Duration::ZERO,
        };
        harness.dispatch(PageEvent::DomContentLoaded);
        harness
    }

    fn dispatch(&mut self, event: PageEvent) {
        self.controller.dispatch(&mut self.page, self.now, &event);
    }

    fn click(&mut self, path: &[&str]) {
        self.dispatch(PageEvent::click(path.iter().copied()));
    }

    fn frame(&mut self) {
        self.now += FRAME;
        self.controller.run_frame(&mut self.page, self.now);
    }

    fn wait(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
        self.controller.advance(&mut self.page, self.now);
    }

    /// User scroll followed by the next refresh
    fn scroll_to(&mut self, offset: f32) {
        self.page.set_scroll_offset(offset);
        self.dispatch(PageEvent::Scroll);
        self.frame();
    }

    fn active_links(&self) -> Vec<ElementId> {
        self.page
            .elements_with_class("nav-link")
            .into_iter()
            .filter(|link| self.page.has_class(link, "active"))
            .collect()
    }

    fn notification_text(&self) -> Option<String> {
        let current = self.controller.notifier().current()?;
        self.page.text(current)
    }

    fn fill_form(&mut self, message: &str) {
        self.page.set_value(&id("name"), "Ada");
        self.page.set_value(&id("email"), "ada@example.com");
        self.page.set_value(&id("subject"), "Hello");
        self.page.set_value(&id("message"), message);
    }

    fn submit(&mut self) {
        self.dispatch(PageEvent::Submit {
            form: id("contactForm"),
        });
    }
}

// =============================================================================
// Navigation menu
// =============================================================================

#[test]
fn test_menu_locks_body_and_link_closes_it() {
    let mut h = Harness::new();

    h.click(&["hamburger", "navbar"]);
    assert!(h.controller.menu().is_open());
    assert!(h.page.is_body_scroll_locked());
    assert!(h.page.has_class(&id("hamburger"), "active"));
    assert!(h.page.has_class(&id("nav-menu"), "active"));

    h.click(&["link-about", "nav-menu", "navbar"]);
    assert!(!h.controller.menu().is_open());
    assert!(!h.page.is_body_scroll_locked());
    assert!(!h.page.has_class(&id("nav-menu"), "active"));

    let request = h.page.last_scroll_request().unwrap();
    assert_eq!(request.top, 730.0);
    assert_eq!(request.behavior, ScrollBehavior::Smooth);
}

#[test]
fn test_escape_and_outside_click_close_menu() {
    let mut h = Harness::new();

    h.click(&["hamburger"]);
    h.dispatch(PageEvent::KeyDown {
        key: KeyCode::Escape,
    });
    assert!(!h.controller.menu().is_open());
    assert!(!h.page.is_body_scroll_locked());

    h.click(&["hamburger"]);
    h.dispatch(PageEvent::KeyDown { key: KeyCode::Enter });
    assert!(h.controller.menu().is_open());

    h.click(&["item-1", "about"]);
    assert!(!h.controller.menu().is_open());
    assert!(!h.page.is_body_scroll_locked());
}

#[test]
fn test_hamburger_toggles() {
    let mut h = Harness::new();
    h.click(&["hamburger"]);
    h.click(&["hamburger"]);
    assert!(!h.controller.menu().is_open());
    assert_eq!(
        h.page.attribute(&id("hamburger"), "aria-expanded").as_deref(),
        Some("false")
    );
}

// =============================================================================
// Scroll-reactive state
// =============================================================================

#[test]
fn test_navbar_and_active_link_follow_scroll() {
    let mut h = Harness::new();
    assert!(!h.page.has_class(&id("navbar"), "scrolled"));
    assert_eq!(h.active_links(), vec![id("link-home")]);

    for (offset, link) in [
        (50.0, "link-home"),
        (750.0, "link-about"),
        (1550.0, "link-contact"),
        (1500.0, "link-contact"),
        (120.0, "link-home"),
    ] {
        h.scroll_to(offset);
        assert!(h.page.has_class(&id("navbar"), "scrolled"), "offset {offset}");
        assert_eq!(h.active_links(), vec![id(link)], "offset {offset}");
    }

    h.scroll_to(2350.0);
    assert!(h.active_links().is_empty());

    h.scroll_to(49.0);
    assert!(!h.page.has_class(&id("navbar"), "scrolled"));
}

#[test]
fn test_scroll_bursts_coalesce_into_one_frame() {
    let mut h = Harness::new();

    for offset in (1..=10).map(|i| i as f32 * 100.0) {
        h.page.set_scroll_offset(offset);
        h.dispatch(PageEvent::Scroll);
    }
    assert!(h.controller.wants_frame());
    // Nothing is written before the refresh
    assert!(!h.page.has_class(&id("navbar"), "scrolled"));

    h.frame();
    assert!(!h.controller.wants_frame());
    let snapshot = h.controller.synchronizer().last_snapshot().unwrap();
    assert_eq!(snapshot.scroll_offset, 1000.0);
    assert_eq!(h.active_links(), vec![id("link-about")]);

    // A refresh without new scroll events does no work
    h.page.set_scroll_offset(0.0);
    h.frame();
    assert!(h.page.has_class(&id("navbar"), "scrolled"));
}

#[test]
fn test_parallax_moves_hero() {
    let mut h = Harness::new();
    assert_eq!(h.page.style(&id("hero"), "transform"), Some("translateY(0px)"));
    h.scroll_to(600.0);
    assert_eq!(
        h.page.style(&id("hero"), "transform"),
        Some("translateY(-300px)")
    );
}

#[test]
fn test_resize_burst_resyncs_once_after_quiet_period() {
    let mut h = Harness::new();
    assert_eq!(h.active_links(), vec![id("link-home")]);

    // Layout moved without a scroll event
    h.page.set_scroll_offset(900.0);
    for _ in 0..5 {
        h.dispatch(PageEvent::Resize {
            width: 700.0,
            height: 800.0,
        });
        h.wait(50);
    }
    assert_eq!(h.active_links(), vec![id("link-home")]);

    h.wait(99);
    assert_eq!(h.active_links(), vec![id("link-home")]);
    h.wait(1);
    assert_eq!(h.active_links(), vec![id("link-about")]);
    assert_eq!(h.controller.pending_timers(), 1, "only the typewriter remains");
}

// =============================================================================
// Scroll-to-top
// =============================================================================

#[test]
fn test_scroll_to_top_visibility_and_click() {
    let mut h = Harness::new();
    let button = id("scroll-to-top");
    assert!(h.page.has_class(&button, "scroll-to-top"));
    assert_eq!(h.page.style(&button, "visibility"), Some("hidden"));

    // Hidden: clicks do nothing
    h.click(&["scroll-to-top"]);
    assert!(h.page.scroll_requests().is_empty());

    h.scroll_to(600.0);
    assert_eq!(h.page.style(&button, "visibility"), Some("visible"));
    assert_eq!(h.page.style(&button, "opacity"), Some("1"));

    h.dispatch(PageEvent::PointerEnter {
        target: button.clone(),
    });
    assert_eq!(h.page.style(&button, "transform"), Some("scale(1.1)"));
    h.dispatch(PageEvent::PointerLeave {
        target: button.clone(),
    });
    assert_eq!(h.page.style(&button, "transform"), Some("scale(1)"));

    h.click(&["scroll-to-top"]);
    let request = h.page.last_scroll_request().unwrap();
    assert_eq!(request.top, 0.0);
    assert_eq!(request.behavior, ScrollBehavior::Smooth);

    // Smooth scroll lands; the button fades before leaving layout
    h.page.settle_scroll();
    h.dispatch(PageEvent::Scroll);
    h.frame();
    assert_eq!(h.page.style(&button, "opacity"), Some("0"));
    assert_eq!(h.page.style(&button, "visibility"), Some("visible"));

    h.wait(300);
    assert_eq!(h.page.style(&button, "visibility"), Some("hidden"));
}

#[test]
fn test_scroll_back_during_fade_keeps_button() {
    let mut h = Harness::new();
    let button = id("scroll-to-top");

    h.scroll_to(600.0);
    h.scroll_to(100.0);
    h.wait(100);
    h.scroll_to(700.0);
    h.wait(500);

    assert_eq!(h.page.style(&button, "visibility"), Some("visible"));
    assert_eq!(h.page.style(&button, "opacity"), Some("1"));
}

#[test]
fn test_threshold_is_strict() {
    let mut h = Harness::new();
    h.scroll_to(300.0);
    assert_eq!(
        h.page.style(&id("scroll-to-top"), "visibility"),
        Some("hidden")
    );
    h.scroll_to(301.0);
    assert_eq!(
        h.page.style(&id("scroll-to-top"), "visibility"),
        Some("visible")
    );
}

// =============================================================================
// Reveal on scroll
// =============================================================================

#[test]
fn test_reveal_is_monotonic() {
    let mut h = Harness::new();
    let item = id("item-1");
    assert_eq!(h.page.style(&item, "opacity"), Some("0"));
    assert_eq!(h.page.style(&item, "transform"), Some("translateY(30px)"));

    h.scroll_to(400.0);
    assert!(h.page.has_class(&item, "revealed"));
    assert_eq!(h.page.style(&item, "opacity"), Some("1"));

    h.scroll_to(0.0);
    assert!(h.page.has_class(&item, "revealed"));
    assert_eq!(h.page.style(&item, "opacity"), Some("1"));
    assert_eq!(h.page.style(&id("item-2"), "opacity"), Some("0"));
}

#[test]
fn test_host_intersection_entries_reveal() {
    let mut h = Harness::new();

    h.dispatch(PageEvent::Intersection(vec![IntersectionEntry {
        target: id("item-2"),
        is_intersecting: true,
        ratio: 0.05,
    }]));
    assert!(!h.page.has_class(&id("item-2"), "revealed"));

    h.dispatch(PageEvent::Intersection(vec![IntersectionEntry {
        target: id("item-2"),
        is_intersecting: true,
        ratio: 0.5,
    }]));
    assert!(h.page.has_class(&id("item-2"), "revealed"));
}

// =============================================================================
// Contact form
// =============================================================================

#[test]
fn test_invalid_form_is_not_submitted() {
    let mut h = Harness::new();
    h.page.set_value(&id("email"), "not-an-email");
    h.submit();

    assert!(!h.controller.submit_gate().is_locked());
    assert_eq!(h.notification_text().as_deref(), Some(INVALID_MESSAGE));
    assert_eq!(
        h.controller.notifier().current_kind(),
        Some(NotificationKind::Error)
    );
    assert_eq!(
        h.page.text(&id("name-error")).as_deref(),
        Some("This field is required.")
    );
    assert_eq!(
        h.page.text(&id("email-error")).as_deref(),
        Some("Please enter a valid email address.")
    );

    // Typing into a field clears its inline error only
    h.dispatch(PageEvent::Input { field: id("name") });
    assert!(!h.page.exists(&id("name-error")));
    assert!(!h.page.has_class(&id("name"), "error"));
    assert!(h.page.exists(&id("email-error")));
}

#[test]
fn test_message_length_bounds_block_submission() {
    let mut h = Harness::new();
    h.fill_form(&"x".repeat(9));
    h.submit();
    assert_eq!(
        h.page.text(&id("message-error")).as_deref(),
        Some("Message must be at least 10 characters.")
    );

    h.fill_form(&"x".repeat(501));
    h.submit();
    assert_eq!(
        h.page.text(&id("message-error")).as_deref(),
        Some("Message must be at most 500 characters.")
    );
    assert!(!h.controller.submit_gate().is_locked());
}

#[test]
fn test_successful_submission_releases_lock() {
    let mut h = Harness::new();
    let button = id("contact-submit");
    h.fill_form("I would like to talk about a project.");

    h.submit();
    assert!(h.controller.submit_gate().is_locked());
    assert_eq!(h.page.attribute(&button, "disabled").as_deref(), Some(""));
    assert_eq!(h.page.text(&button).as_deref(), Some(SENDING_LABEL));

    // A second submit while in flight is ignored
    h.wait(10);
    h.submit();
    h.wait(1489);
    assert!(h.controller.submit_gate().is_locked());

    h.wait(1);
    assert!(!h.controller.submit_gate().is_locked());
    assert_eq!(h.page.attribute(&button, "disabled"), None);
    assert_eq!(h.page.text(&button).as_deref(), Some("Send Message"));
    assert_eq!(h.notification_text().as_deref(), Some(SUCCESS_MESSAGE));
    assert_eq!(h.page.value(&id("name")).as_deref(), Some(""));
}

#[test]
fn test_failed_submission_releases_lock() {
    let mut config = SiteConfig::default();
    config.form.simulate_failure = true;
    let mut h = Harness::with_config(config);
    h.fill_form("I would like to talk about a project.");

    h.submit();
    h.wait(1500);

    assert!(!h.controller.submit_gate().is_locked());
    assert_eq!(h.page.attribute(&id("contact-submit"), "disabled"), None);
    assert_eq!(h.notification_text().as_deref(), Some(FAILURE_MESSAGE));
    assert_eq!(
        h.controller.notifier().current_kind(),
        Some(NotificationKind::Error)
    );
    // Input survives a failed send
    assert_eq!(h.page.value(&id("name")).as_deref(), Some("Ada"));
}

#[test]
fn test_teardown_releases_submit_lock() {
    let mut h = Harness::new();
    h.fill_form("I would like to talk about a project.");
    h.submit();
    h.click(&["hamburger"]);
    assert!(h.page.is_body_scroll_locked());

    h.controller.teardown(&mut h.page);

    assert!(!h.controller.submit_gate().is_locked());
    assert_eq!(h.page.attribute(&id("contact-submit"), "disabled"), None);
    assert_eq!(
        h.page.text(&id("contact-submit")).as_deref(),
        Some("Send Message")
    );
    assert!(!h.page.is_body_scroll_locked());
    assert_eq!(h.controller.pending_timers(), 0);
    assert!(!h.controller.is_initialized());

    // Detached: events are ignored
    h.wait(5000);
    h.click(&["hamburger"]);
    assert!(!h.controller.menu().is_open());
}

// =============================================================================
// Notifications
// =============================================================================

#[test]
fn test_stale_dismiss_never_hides_newer_notification() {
    let mut h = Harness::new();
    h.controller
        .notify(&mut h.page, h.now, "first", NotificationKind::Info);

    h.wait(4000);
    h.controller
        .notify(&mut h.page, h.now, "second", NotificationKind::Success);
    let second = h.controller.notifier().current().unwrap().clone();

    // First notification's dismiss time passes
    h.wait(1000);
    assert_eq!(
        h.controller.notifier().phase(),
        Some(NotificationPhase::Shown)
    );
    assert_eq!(h.page.style(&second, "opacity"), Some("1"));
    assert_eq!(h.page.elements_with_class("notification"), vec![second.clone()]);

    h.wait(4000);
    assert_eq!(
        h.controller.notifier().phase(),
        Some(NotificationPhase::Leaving)
    );
    h.wait(300);
    assert!(!h.page.exists(&second));
}

#[test]
fn test_click_dismisses_notification() {
    let mut h = Harness::new();
    h.controller
        .notify(&mut h.page, h.now, "hello", NotificationKind::Info);
    let element = h.controller.notifier().current().unwrap().clone();

    h.wait(200);
    h.dispatch(PageEvent::click([element.clone()]));
    assert_eq!(h.page.style(&element, "opacity"), Some("0"));
    h.wait(300);
    assert!(!h.page.exists(&element));
}

// =============================================================================
// Effects
// =============================================================================

#[test]
fn test_typewriter_retypes_hero_name() {
    let mut h = Harness::new();
    let name = id("hero-name");
    assert_eq!(h.page.text(&name).as_deref(), Some(""));

    h.wait(1500);
    assert_eq!(h.page.text(&name).as_deref(), Some("J"));
    h.wait(600);
    assert_eq!(h.page.text(&name).as_deref(), Some("Jane Do"));
    h.wait(100);
    assert_eq!(h.page.text(&name).as_deref(), Some("Jane Doe"));
    assert_eq!(h.controller.pending_timers(), 0);
}

#[test]
fn test_typing_disabled_leaves_text() {
    let mut config = SiteConfig::default();
    config.effects.typing = false;
    let h = Harness::with_config(config);
    assert_eq!(h.page.text(&id("hero-name")).as_deref(), Some("Jane Doe"));
}

#[test]
fn test_preloader_hidden_after_load() {
    let mut h = Harness::new();
    let preloader = id("preloader");
    h.dispatch(PageEvent::Load);
    assert_eq!(h.page.style(&preloader, "opacity"), Some("0"));
    h.wait(499);
    assert_eq!(h.page.style(&preloader, "display"), None);
    h.wait(1);
    assert_eq!(h.page.style(&preloader, "display"), Some("none"));
}

// =============================================================================
// Partial pages
// =============================================================================

#[test]
fn test_missing_widgets_are_silent_noops() {
    let page = HeadlessPage::new().with_section("solo", 0.0, 3000.0);
    let mut h = Harness::with_page(page, SiteConfig::default());

    h.scroll_to(900.0);
    h.click(&["solo"]);
    h.dispatch(PageEvent::KeyDown {
        key: KeyCode::Escape,
    });
    h.submit();
    h.dispatch(PageEvent::Load);
    h.dispatch(PageEvent::Resize {
        width: 400.0,
        height: 700.0,
    });
    h.wait(10_000);

    assert!(!h.page.is_body_scroll_locked());
    assert_eq!(h.controller.notifier().current(), None);
    assert!(h.page.elements_with_class("notification").is_empty());
    assert!(!h.controller.submit_gate().is_locked());
}

#[test]
fn test_initialize_runs_once() {
    let mut h = Harness::new();
    let handlers = h
        .controller
        .dispatch(&mut h.page, h.now, &PageEvent::DomContentLoaded);
    assert_eq!(handlers.as_slice(), &[HandlerKind::Initialize]);
    // The typewriter kept its original text rather than capturing ""
    h.wait(3000);
    assert_eq!(h.page.text(&id("hero-name")).as_deref(), Some("Jane Doe"));
}
