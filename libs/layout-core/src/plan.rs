//! Layout plan handed to the renderer.

use crate::content::ContentSizes;
use crate::types::{
    CardSize, ContentMode, DeviceClass, GridShape, LayoutType, LayoutVariant, Margins, Position,
    Rect, Spacing,
};
use serde::{Deserialize, Serialize};

/// One half of the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Prompts: left in left-right, top in top-bottom.
    Primary,
    /// Answers: right in left-right, bottom in top-bottom.
    Secondary,
}

/// Card size and spacing solved for one layout pass.
///
/// Produced by the sizing step and consumed by the position step, so both
/// steps agree on the dynamically solved gaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizedLayout {
    pub card_size: CardSize,
    pub spacing: Spacing,
    pub secondary_spacing: Spacing,
}

impl SizedLayout {
    pub const EMPTY: SizedLayout = SizedLayout {
        card_size: CardSize::ZERO,
        spacing: Spacing::ZERO,
        secondary_spacing: Spacing::ZERO,
    };
}

/// Grid, gaps and card positions for one side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidePlan {
    pub grid: GridShape,
    pub spacing: Spacing,
    pub positions: Vec<Position>,
}

impl SidePlan {
    /// Rectangles covered by this side's cards.
    pub fn card_rects(&self, card_size: CardSize) -> impl Iterator<Item = Rect> + '_ {
        self.positions
            .iter()
            .map(move |position| Rect::at(*position, card_size))
    }

    /// Smallest rectangle holding every card, if there are any.
    pub fn bounding_box(&self, card_size: CardSize) -> Option<Rect> {
        let mut rects = self.card_rects(card_size);
        let first = rects.next()?;
        let (mut left, mut top, mut right, mut bottom) =
            (first.x, first.y, first.right(), first.bottom());
        for rect in rects {
            left = left.min(rect.x);
            top = top.min(rect.y);
            right = right.max(rect.right());
            bottom = bottom.max(rect.bottom());
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Whether any two cards on this side overlap.
    pub fn has_overlap(&self, card_size: CardSize) -> bool {
        let rects: Vec<Rect> = self.card_rects(card_size).collect();
        rects
            .iter()
            .enumerate()
            .any(|(i, a)| rects[i + 1..].iter().any(|b| a.intersects(b)))
    }
}

/// Fully resolved layout. All lengths are pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub device_class: DeviceClass,
    pub layout_type: LayoutType,
    pub variant: LayoutVariant,
    pub content_mode: ContentMode,
    pub item_count: usize,
    pub card_size: CardSize,
    pub margins: Margins,
    pub available_width: f64,
    pub available_height: f64,
    pub content_sizes: ContentSizes,
    pub primary: SidePlan,
    pub secondary: SidePlan,
}

impl LayoutPlan {
    /// Grid of the prompt side.
    pub fn grid_shape(&self) -> GridShape {
        self.primary.grid
    }

    /// Gaps on the prompt side.
    pub fn spacing(&self) -> Spacing {
        self.primary.spacing
    }

    pub fn side(&self, side: Side) -> &SidePlan {
        match side {
            Side::Primary => &self.primary,
            Side::Secondary => &self.secondary,
        }
    }

    pub fn card_rects(&self, side: Side) -> Vec<Rect> {
        self.side(side).card_rects(self.card_size).collect()
    }

    /// No cards to draw.
    pub fn is_empty(&self) -> bool {
        self.primary.positions.is_empty() && self.secondary.positions.is_empty()
    }
}
