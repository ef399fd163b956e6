//! Core value types for the separated layout.

use serde::{Deserialize, Serialize};

/// Container dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Create a viewport, mapping negative or non-finite sides to zero.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: sanitize_length(width),
            height: sanitize_length(height),
        }
    }

    /// True when either side is not a positive finite length, which
    /// yields an empty plan. Also covers viewports built field by field.
    pub fn is_degenerate(&self) -> bool {
        sanitize_length(self.width) == 0.0 || sanitize_length(self.height) == 0.0
    }

    pub fn is_portrait(&self) -> bool {
        self.height >= self.width
    }
}

pub(crate) fn sanitize_length(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Split orientation of a separated layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutType {
    /// Prompts on the left, answers on the right.
    LeftRight,
    /// Prompts on top, answers below.
    TopBottom,
}

impl Default for LayoutType {
    fn default() -> Self {
        Self::LeftRight
    }
}

impl LayoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeftRight => "left-right",
            Self::TopBottom => "top-bottom",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "left-right" => Some(Self::LeftRight),
            "top-bottom" => Some(Self::TopBottom),
            _ => None,
        }
    }

    /// Parse from string, treating unknown values as the default layout.
    pub fn parse_or_default(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }
}

/// Everything the calculator needs to produce a plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub viewport: Viewport,
    pub item_count: usize,
    pub layout_type: LayoutType,
    pub has_images: bool,
}

impl LayoutRequest {
    /// Left-right request without images.
    pub fn new(width: f64, height: f64, item_count: usize) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            item_count,
            layout_type: LayoutType::default(),
            has_images: false,
        }
    }

    pub fn with_layout_type(mut self, layout_type: LayoutType) -> Self {
        self.layout_type = layout_type;
        self
    }

    pub fn with_images(mut self, has_images: bool) -> Self {
        self.has_images = has_images;
        self
    }

    /// Nothing to lay out: no items or no room.
    pub fn is_degenerate(&self) -> bool {
        self.item_count == 0 || self.viewport.is_degenerate()
    }
}

/// Coarse device bucket used as a policy lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceClass {
    MobilePortrait,
    MobileLandscape,
    TabletPortrait,
    TabletLandscape,
    Desktop,
}

impl DeviceClass {
    pub const ALL: [DeviceClass; 5] = [
        Self::MobilePortrait,
        Self::MobileLandscape,
        Self::TabletPortrait,
        Self::TabletLandscape,
        Self::Desktop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MobilePortrait => "mobile-portrait",
            Self::MobileLandscape => "mobile-landscape",
            Self::TabletPortrait => "tablet-portrait",
            Self::TabletLandscape => "tablet-landscape",
            Self::Desktop => "desktop",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|device| device.as_str() == s)
    }
}

/// How many cards must be arranged, which picks the sizing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutVariant {
    /// Up to 5 items.
    SingleColumn,
    /// 6 to 20 items.
    MultiRows,
    /// More than 20 items.
    MultiColumns,
}

impl LayoutVariant {
    pub fn for_item_count(item_count: usize) -> Self {
        match item_count {
            0..=5 => Self::SingleColumn,
            6..=20 => Self::MultiRows,
            _ => Self::MultiColumns,
        }
    }
}

/// Card aspect mode, chosen by whether any card carries an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentMode {
    Square,
    Rectangle,
}

impl ContentMode {
    pub fn from_images(has_images: bool) -> Self {
        if has_images {
            Self::Square
        } else {
            Self::Rectangle
        }
    }
}

/// Columns and rows of one side of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub columns: usize,
    pub rows: usize,
}

impl GridShape {
    pub const EMPTY: GridShape = GridShape { columns: 1, rows: 0 };

    pub fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    /// One column holding `count` rows.
    pub fn column(count: usize) -> Self {
        if count == 0 {
            Self::EMPTY
        } else {
            Self::new(1, count)
        }
    }

    /// One row holding `count` columns.
    pub fn row(count: usize) -> Self {
        if count == 0 {
            Self::EMPTY
        } else {
            Self::new(count, 1)
        }
    }

    /// Fixed column count with just enough rows for `count` items.
    pub fn with_columns(columns: usize, count: usize) -> Self {
        let columns = columns.max(1);
        Self::new(columns, count.div_ceil(columns))
    }

    pub fn capacity(&self) -> usize {
        self.columns * self.rows
    }

    /// (column, row) cell of the item at `index`, row-major.
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index % self.columns, index / self.columns)
    }
}

/// Card dimensions in whole pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CardSize {
    pub width: f64,
    pub height: f64,
}

impl CardSize {
    pub const ZERO: CardSize = CardSize {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Gap between neighbouring cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Spacing {
    pub const ZERO: Spacing = Spacing {
        horizontal: 0.0,
        vertical: 0.0,
    };

    pub fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// Space kept free around the container edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// Top-left corner of a card in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn at(position: Position, size: CardSize) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Interiors overlap. Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// `other` lies fully inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}
