//! Grid-shape selection for both sides of a separated layout.

use crate::types::{ContentMode, GridShape, LayoutType};

/// Columns per row for left-right grids with image cards.
pub const SQUARE_MODE_COLUMNS: usize = 5;
/// Columns per row for left-right grids with text-only cards.
pub const RECTANGLE_MODE_COLUMNS: usize = 2;
/// Widest row a top-bottom grid may use.
pub const TOP_BOTTOM_MAX_COLUMNS: usize = 10;

/// Largest count laid out as a single stack.
const MAX_STACKED_ITEMS: usize = 5;

/// Shape of the prompt side (left or top).
pub fn primary_shape(
    item_count: usize,
    layout_type: LayoutType,
    content_mode: ContentMode,
) -> GridShape {
    if item_count == 0 {
        return GridShape::EMPTY;
    }

    if let Some(shape) = tuned_shape(item_count, layout_type) {
        return shape;
    }

    match layout_type {
        LayoutType::LeftRight => GridShape::with_columns(columns_for(content_mode), item_count),
        LayoutType::TopBottom => top_bottom_shape(item_count, content_mode),
    }
}

/// Shape of the answer side (right or bottom). Always a single stack.
pub fn secondary_shape(item_count: usize, layout_type: LayoutType) -> GridShape {
    match layout_type {
        LayoutType::LeftRight => GridShape::column(item_count),
        LayoutType::TopBottom => GridShape::row(item_count),
    }
}

/// Whether the primary side is a single column (left-right) or a single
/// row (top-bottom).
pub fn is_stacked(shape: GridShape, layout_type: LayoutType) -> bool {
    shape.rows > 0
        && match layout_type {
            LayoutType::LeftRight => shape.columns == 1,
            LayoutType::TopBottom => shape.rows == 1,
        }
}

pub fn columns_for(content_mode: ContentMode) -> usize {
    match content_mode {
        ContentMode::Square => SQUARE_MODE_COLUMNS,
        ContentMode::Rectangle => RECTANGLE_MODE_COLUMNS,
    }
}

/// Empirically tuned exceptions for the roster sizes decks are usually
/// built with. They are not derivable from the general rule below; keep
/// them even when the formula would give something close.
fn tuned_shape(item_count: usize, layout_type: LayoutType) -> Option<GridShape> {
    match (item_count, layout_type) {
        (1..=MAX_STACKED_ITEMS, LayoutType::LeftRight) => Some(GridShape::column(item_count)),
        (1..=MAX_STACKED_ITEMS, LayoutType::TopBottom) => Some(GridShape::row(item_count)),
        // Seven prompts still read best as one list.
        (7, LayoutType::LeftRight) => Some(GridShape::column(7)),
        (10, _) => Some(GridShape::new(10, 1)),
        (20, _) => Some(GridShape::new(10, 2)),
        _ => None,
    }
}

fn top_bottom_shape(item_count: usize, content_mode: ContentMode) -> GridShape {
    let mut target_rows = if item_count <= 20 { 2 } else { 3 };
    if content_mode == ContentMode::Square {
        target_rows += 1;
    }
    let columns = item_count
        .div_ceil(target_rows)
        .clamp(1, TOP_BOTTOM_MAX_COLUMNS);
    GridShape::with_columns(columns, item_count)
}
