//! Folio Layout
//!
//! The page-facing half of the Folio runtime: the traits a host implements
//! to expose its document, and the scroll-reactive widgets driven from it.
//!
//! - [`page`]: `LayoutSource` (reads) and `Presentation` (writes)
//! - [`sync`]: the scroll-reactive state synchronizer
//! - [`nav_menu`], [`scroll_top`], [`reveal`], [`parallax`]: widgets it drives
//! - [`headless`]: an in-memory page for tests and headless hosts
//!
//! # Example
//!
//! ```rust
//! use folio_layout::headless::{HeadlessElement, HeadlessPage};
//! use folio_layout::page::LayoutSource;
//! use folio_layout::sync::{ScrollSynchronizer, SyncConfig};
//!
//! let mut page = HeadlessPage::new()
//!     .with_element("navbar", HeadlessElement::new("nav"))
//!     .with_section("home", 0.0, 800.0);
//!
//! let mut sync = ScrollSynchronizer::new(SyncConfig::default());
//! page.set_scroll_offset(120.0);
//! sync.sync(&mut page);
//!
//! assert!(page.has_class(&"navbar".into(), "scrolled"));
//! ```

pub mod geometry;
pub mod headless;
pub mod nav_menu;
pub mod page;
pub mod parallax;
pub mod reveal;
pub mod scroll_top;
pub mod sections;
pub mod sync;

pub use geometry::{ElementBounds, MarginParseError, RootMargin, Viewport};
pub use headless::{HeadlessElement, HeadlessPage};
pub use nav_menu::{MenuClick, MenuState, NavigationMenu};
pub use page::{
    ElementId, LayoutSource, Page, Presentation, ScrollBehavior, ScrollRequest, SectionGeometry,
};
pub use parallax::ParallaxLayer;
pub use reveal::{RevealConfig, RevealObserver, RevealState};
pub use scroll_top::{FadeTicket, ScrollTopControl, ScrollTopState};
pub use sections::SectionRegistry;
pub use sync::{ScrollSnapshot, ScrollSynchronizer, SyncConfig, SyncOutcome};
