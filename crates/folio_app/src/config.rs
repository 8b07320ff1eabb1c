//! Site configuration
//!
//! Pages describe which element ids and classes carry which widget, plus
//! the thresholds and durations of each effect, in a `folio.toml`:
//!
//! ```toml
//! [elements]
//! navbar = "navbar"
//! reveal_classes = ["portfolio-item", "skill-item"]
//!
//! [[elements.parallax]]
//! element = "hero"
//! speed = 0.5
//!
//! [scroll]
//! policy = "frame"
//! navbar_threshold = 50.0
//! ```
//!
//! Every field has a default matching the stock portfolio page, so an
//! empty file is a valid configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use folio_layout::geometry::RootMargin;
use folio_layout::parallax::{ParallaxLayer, DEFAULT_PARALLAX_SPEED};
use folio_layout::reveal::RevealConfig;
use folio_layout::sync::SyncConfig;
use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

// =============================================================================
// Top level
// =============================================================================

/// Complete controller configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub elements: ElementsConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub reveal: RevealSection,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
}

impl SiteConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FolioError::Other(e.to_string()))
    }

    /// Reject values the controller cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.scroll.policy == ScrollPolicy::Throttle && self.scroll.throttle_ms == 0 {
            return Err(invalid("scroll.throttle_ms must be positive"));
        }
        if self.scroll.fade_ms == 0 {
            return Err(invalid("scroll.fade_ms must be positive"));
        }
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(invalid("reveal.threshold must be between 0 and 1"));
        }
        RootMargin::parse(&self.reveal.root_margin)
            .map_err(|e| invalid(format!("reveal.root_margin: {e}")))?;
        if self.form.message_min > self.form.message_max {
            return Err(invalid(format!(
                "form.message_min ({}) exceeds form.message_max ({})",
                self.form.message_min, self.form.message_max
            )));
        }
        if self.effects.typing_char_ms == 0 {
            return Err(invalid("effects.typing_char_ms must be positive"));
        }
        for layer in &self.elements.parallax {
            if !layer.speed.is_finite() {
                return Err(invalid(format!(
                    "parallax speed for `{}` is not a finite number",
                    layer.element
                )));
            }
        }
        Ok(())
    }

    /// Synchronizer settings derived from this config
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            navbar: self.elements.navbar.as_str().into(),
            navbar_threshold: self.scroll.navbar_threshold,
            look_ahead: self.scroll.look_ahead,
            nav_link_class: self.elements.nav_link_class.clone(),
            parallax: self
                .elements
                .parallax
                .iter()
                .map(|p| ParallaxLayer::new(p.element.as_str(), p.speed))
                .collect(),
            ..SyncConfig::default()
        }
    }

    /// Reveal observer settings; an unparsable margin falls back to none
    pub fn reveal_config(&self) -> RevealConfig {
        RevealConfig {
            threshold: self.reveal.threshold,
            root_margin: RootMargin::parse(&self.reveal.root_margin).unwrap_or_default(),
        }
    }
}

fn invalid(message: impl Into<String>) -> FolioError {
    FolioError::InvalidConfig(message.into())
}

// =============================================================================
// [elements]
// =============================================================================

/// Ids and classes of the page's widgets
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ElementsConfig {
    #[serde(default = "default_navbar")]
    pub navbar: String,
    #[serde(default = "default_hamburger")]
    pub hamburger: String,
    #[serde(default = "default_nav_menu")]
    pub nav_menu: String,
    #[serde(default = "default_nav_link_class")]
    pub nav_link_class: String,
    #[serde(default = "default_contact_form")]
    pub contact_form: String,
    #[serde(default = "default_submit_button")]
    pub submit_button: String,
    #[serde(default = "default_hero_name")]
    pub hero_name: String,
    #[serde(default = "default_preloader")]
    pub preloader: String,
    #[serde(default = "default_scroll_to_top")]
    pub scroll_to_top: String,
    #[serde(default = "default_reveal_classes")]
    pub reveal_classes: Vec<String>,
    #[serde(default = "default_parallax")]
    pub parallax: Vec<ParallaxEntry>,
}

impl Default for ElementsConfig {
    fn default() -> Self {
        Self {
            navbar: default_navbar(),
            hamburger: default_hamburger(),
            nav_menu: default_nav_menu(),
            nav_link_class: default_nav_link_class(),
            contact_form: default_contact_form(),
            submit_button: default_submit_button(),
            hero_name: default_hero_name(),
            preloader: default_preloader(),
            scroll_to_top: default_scroll_to_top(),
            reveal_classes: default_reveal_classes(),
            parallax: default_parallax(),
        }
    }
}

/// One parallax element
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParallaxEntry {
    pub element: String,
    #[serde(default = "default_parallax_speed")]
    pub speed: f32,
}

fn default_navbar() -> String {
    "navbar".to_string()
}

fn default_hamburger() -> String {
    "hamburger".to_string()
}

fn default_nav_menu() -> String {
    "nav-menu".to_string()
}

fn default_nav_link_class() -> String {
    "nav-link".to_string()
}

fn default_contact_form() -> String {
    "contactForm".to_string()
}

fn default_submit_button() -> String {
    "contact-submit".to_string()
}

fn default_hero_name() -> String {
    "hero-name".to_string()
}

fn default_preloader() -> String {
    "preloader".to_string()
}

fn default_scroll_to_top() -> String {
    "scroll-to-top".to_string()
}

fn default_reveal_classes() -> Vec<String> {
    ["portfolio-item", "achievement-item", "timeline-item", "skill-item"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_parallax() -> Vec<ParallaxEntry> {
    vec![ParallaxEntry {
        element: "hero".to_string(),
        speed: DEFAULT_PARALLAX_SPEED,
    }]
}

fn default_parallax_speed() -> f32 {
    DEFAULT_PARALLAX_SPEED
}

// =============================================================================
// [scroll]
// =============================================================================

/// How raw scroll events are rate limited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollPolicy {
    /// One recomputation per display refresh
    Frame,
    /// Leading-edge throttle with `throttle_ms` interval
    Throttle,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrollConfig {
    #[serde(default = "default_navbar_threshold")]
    pub navbar_threshold: f32,
    #[serde(default = "default_look_ahead")]
    pub look_ahead: f32,
    #[serde(default = "default_scroll_top_threshold")]
    pub scroll_top_threshold: f32,
    /// Scroll-to-top fade-out before it leaves layout
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,
    #[serde(default = "default_policy")]
    pub policy: ScrollPolicy,
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            navbar_threshold: default_navbar_threshold(),
            look_ahead: default_look_ahead(),
            scroll_top_threshold: default_scroll_top_threshold(),
            fade_ms: default_fade_ms(),
            policy: default_policy(),
            throttle_ms: default_throttle_ms(),
            resize_debounce_ms: default_resize_debounce_ms(),
        }
    }
}

impl ScrollConfig {
    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

fn default_navbar_threshold() -> f32 {
    50.0
}

fn default_look_ahead() -> f32 {
    100.0
}

fn default_scroll_top_threshold() -> f32 {
    300.0
}

fn default_fade_ms() -> u64 {
    300
}

fn default_policy() -> ScrollPolicy {
    ScrollPolicy::Frame
}

fn default_throttle_ms() -> u64 {
    16
}

fn default_resize_debounce_ms() -> u64 {
    150
}

// =============================================================================
// [reveal]
// =============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RevealSection {
    #[serde(default = "default_reveal_threshold")]
    pub threshold: f32,
    /// CSS margin shorthand in pixels
    #[serde(default = "default_root_margin")]
    pub root_margin: String,
}

impl Default for RevealSection {
    fn default() -> Self {
        Self {
            threshold: default_reveal_threshold(),
            root_margin: default_root_margin(),
        }
    }
}

fn default_reveal_threshold() -> f32 {
    0.1
}

fn default_root_margin() -> String {
    "0px 0px -50px 0px".to_string()
}

// =============================================================================
// [form]
// =============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormConfig {
    /// Fields required even without a `required` attribute
    #[serde(default = "default_required_fields")]
    pub required_fields: Vec<String>,
    #[serde(default = "default_message_min")]
    pub message_min: usize,
    #[serde(default = "default_message_max")]
    pub message_max: usize,
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,
    /// Make the simulated transport fail every submission
    #[serde(default)]
    pub simulate_failure: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            required_fields: default_required_fields(),
            message_min: default_message_min(),
            message_max: default_message_max(),
            submit_delay_ms: default_submit_delay_ms(),
            simulate_failure: false,
        }
    }
}

impl FormConfig {
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

fn default_required_fields() -> Vec<String> {
    ["name", "email", "subject", "message"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_message_min() -> usize {
    10
}

fn default_message_max() -> usize {
    500
}

fn default_submit_delay_ms() -> u64 {
    1500
}

// =============================================================================
// [notifications]
// =============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
    #[serde(default = "default_enter_delay_ms")]
    pub enter_delay_ms: u64,
    #[serde(default = "default_exit_ms")]
    pub exit_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            display_ms: default_display_ms(),
            enter_delay_ms: default_enter_delay_ms(),
            exit_ms: default_exit_ms(),
        }
    }
}

fn default_display_ms() -> u64 {
    5000
}

fn default_enter_delay_ms() -> u64 {
    100
}

fn default_exit_ms() -> u64 {
    300
}

// =============================================================================
// [effects]
// =============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EffectsConfig {
    #[serde(default = "default_true")]
    pub typing: bool,
    #[serde(default = "default_typing_start_ms")]
    pub typing_start_ms: u64,
    #[serde(default = "default_typing_char_ms")]
    pub typing_char_ms: u64,
    #[serde(default = "default_preloader_fade_ms")]
    pub preloader_fade_ms: u64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            typing: true,
            typing_start_ms: default_typing_start_ms(),
            typing_char_ms: default_typing_char_ms(),
            preloader_fade_ms: default_preloader_fade_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_typing_start_ms() -> u64 {
    1500
}

fn default_typing_char_ms() -> u64 {
    100
}

fn default_preloader_fade_ms() -> u64 {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SiteConfig::from_toml_str("").unwrap();
        assert_eq!(config.elements.navbar, "navbar");
        assert_eq!(config.scroll.policy, ScrollPolicy::Frame);
        assert_eq!(config.scroll.navbar_threshold, 50.0);
        assert_eq!(config.form.message_max, 500);
        assert_eq!(config.elements.parallax.len(), 1);
        assert_eq!(config.reveal_config().root_margin.bottom, -50.0);
    }

    #[test]
    fn test_partial_override() {
        let config = SiteConfig::from_toml_str(
            r#"
            [scroll]
            policy = "throttle"
            throttle_ms = 32

            [[elements.parallax]]
            element = "banner"

            [form]
            message_min = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.scroll.policy, ScrollPolicy::Throttle);
        assert_eq!(config.scroll.throttle_interval(), Duration::from_millis(32));
        assert_eq!(config.scroll.look_ahead, 100.0);
        assert_eq!(config.elements.parallax[0].element, "banner");
        assert_eq!(config.elements.parallax[0].speed, 0.5);
        assert_eq!(config.form.message_min, 20);

        let sync = config.sync_config();
        assert_eq!(sync.parallax[0].element.as_str(), "banner");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SiteConfig::from_toml_str("[form]\nmessage_min = 600\n").unwrap_err();
        assert!(matches!(err, FolioError::InvalidConfig(_)));

        let err = SiteConfig::from_toml_str("[reveal]\nroot_margin = \"1 2 3 4 5\"\n").unwrap_err();
        assert!(matches!(err, FolioError::InvalidConfig(_)));

        let err = SiteConfig::from_toml_str("[scroll]\npolicy = \"throttle\"\nthrottle_ms = 0\n")
            .unwrap_err();
        assert!(matches!(err, FolioError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = SiteConfig::from_toml_str("[scroll\n").unwrap_err();
        assert!(matches!(err, FolioError::Config(_)));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = SiteConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = SiteConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed.elements.reveal_classes, config.elements.reveal_classes);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            SiteConfig::load_or_default(Path::new("/nonexistent/folio.toml")).unwrap();
        assert_eq!(config.elements.contact_form, "contactForm");
    }
}
