//! Fixed card sizes by item count.
//!
//! This is the older solving path, superseded by the dynamic solver in
//! [`crate::calculator`]. It ignores the container entirely, so it is only
//! reported next to the dynamic result in
//! [`DebugInfo`](crate::calculator::DebugInfo) and never used for layout.

use crate::types::CardSize;

/// Card size the fixed table assigns to `item_count` cards.
pub fn card_size_by_item_count(item_count: usize) -> CardSize {
    match item_count {
        0 => CardSize::ZERO,
        1..=5 => CardSize::new(250.0, 80.0),
        6..=7 => CardSize::new(220.0, 70.0),
        8..=10 => CardSize::new(180.0, 60.0),
        11..=15 => CardSize::new(150.0, 50.0),
        16..=20 => CardSize::new(130.0, 45.0),
        _ => CardSize::new(120.0, 40.0),
    }
}
