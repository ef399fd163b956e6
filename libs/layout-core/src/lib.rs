//! Separated-layout calculator for the card-matching game.
//!
//! Provides:
//! - Grid-shape selection for left-right and top-bottom splits
//! - Card size and spacing solving within device policy bounds
//! - Card positions for both sides of the split
//! - Content sizes (font, audio button, image box, padding) per card
//! - Device classification and sizing policies with built-in fallbacks

pub mod calculator;
pub mod content;
pub mod device;
pub mod error;
pub mod grid;
pub mod legacy;
pub mod plan;
pub mod policy;
pub mod types;

pub use calculator::{DebugInfo, LayoutCalculator};
pub use content::ContentSizes;
pub use device::{DeviceClassifier, FallbackClassifier, ScreenSize};
pub use error::{PolicyError, Result};
pub use plan::{LayoutPlan, Side, SidePlan, SizedLayout};
pub use policy::{
    Bounds, FallbackPolicy, PolicyBounds, PolicyOverrides, PolicyTable, PositionRatios,
    SizingPolicy, SpacingBounds, FALLBACK_BOUNDS,
};
pub use types::{
    CardSize, ContentMode, DeviceClass, GridShape, LayoutRequest, LayoutType, LayoutVariant,
    Margins, Position, Rect, Spacing, Viewport,
};
