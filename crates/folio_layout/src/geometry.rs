//! Page geometry: element bounds, viewport and intersection math

use thiserror::Error;

/// Layout bounds of an element in document coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementBounds {
    /// X position from the document's left edge
    pub x: f32,
    /// Y position from the document's top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ElementBounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Half-open vertical containment: `y <= pos < y + height`
    pub fn contains_y(&self, pos: f32) -> bool {
        pos >= self.y && pos < self.bottom()
    }

    /// Overlapping region, or None if the rectangles do not touch
    pub fn intersect(&self, other: &ElementBounds) -> Option<ElementBounds> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < x || bottom < y {
            return None;
        }
        Some(ElementBounds::new(x, y, right - x, bottom - y))
    }
}

/// Size of the visible window
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The visible rectangle in document coordinates at a scroll offset
    pub fn rect_at(&self, scroll_offset: f32) -> ElementBounds {
        ElementBounds::new(0.0, scroll_offset, self.width, self.height)
    }
}

/// Error parsing a root margin string
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarginParseError {
    #[error("root margin must have 1 to 4 values, got {0}")]
    ValueCount(usize),
    #[error("invalid root margin value `{0}` (expected pixels, e.g. `-50px` or `0`)")]
    InvalidValue(String),
}

/// Grow (positive) or shrink (negative) the viewport before intersection
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RootMargin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl RootMargin {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Parse CSS margin shorthand in pixels: `"50px"`, `"0 10px"`,
    /// `"0px 0px -50px"` or `"0px 0px -50px 0px"`
    pub fn parse(input: &str) -> Result<Self, MarginParseError> {
        let values = input
            .split_whitespace()
            .map(parse_px)
            .collect::<Result<Vec<f32>, _>>()?;

        match values.as_slice() {
            [all] => Ok(Self::new(*all, *all, *all, *all)),
            [vertical, horizontal] => Ok(Self::new(*vertical, *horizontal, *vertical, *horizontal)),
            [top, horizontal, bottom] => Ok(Self::new(*top, *horizontal, *bottom, *horizontal)),
            [top, right, bottom, left] => Ok(Self::new(*top, *right, *bottom, *left)),
            other => Err(MarginParseError::ValueCount(other.len())),
        }
    }

    /// Apply the margin to a root rectangle
    pub fn expand(&self, rect: ElementBounds) -> ElementBounds {
        ElementBounds::new(
            rect.x - self.left,
            rect.y - self.top,
            rect.width + self.left + self.right,
            rect.height + self.top + self.bottom,
        )
    }
}

fn parse_px(value: &str) -> Result<f32, MarginParseError> {
    let number = value.strip_suffix("px").unwrap_or(value);
    if number != value || number.trim_start_matches('-') == "0" {
        number
            .parse::<f32>()
            .map_err(|_| MarginParseError::InvalidValue(value.to_string()))
    } else {
        Err(MarginParseError::InvalidValue(value.to_string()))
    }
}

/// Fraction of `target` visible inside `root`
///
/// Returns None when they do not intersect at all. A zero-area target
/// that touches the root counts as fully visible.
pub fn intersection_ratio(target: &ElementBounds, root: &ElementBounds) -> Option<f32> {
    let overlap = target.intersect(root)?;
    let area = target.area();
    if area <= 0.0 {
        return Some(1.0);
    }
    Some((overlap.area() / area).clamp(0.0, 1.0))
}
