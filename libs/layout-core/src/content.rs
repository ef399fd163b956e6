//! Visual sizes derived from a solved card size.

use crate::policy::Bounds;
use crate::types::CardSize;
use serde::{Deserialize, Serialize};

const AUDIO_BUTTON_RATIO: f64 = 0.18;
const AUDIO_BUTTON: Bounds = Bounds::new(14.0, 32.0);

const IMAGE_WIDTH_RATIO: f64 = 0.35;
const IMAGE_WIDTH: Bounds = Bounds::new(30.0, 100.0);
const IMAGE_HEIGHT_RATIO: f64 = 0.5;
const IMAGE_HEIGHT: Bounds = Bounds::new(25.0, 80.0);

const FONT_SIZE_RATIO: f64 = 0.22;
const FONT_SIZE: Bounds = Bounds::new(12.0, 28.0);
const LINE_HEIGHT_RATIO: f64 = 0.28;
const LINE_HEIGHT: Bounds = Bounds::new(14.0, 36.0);

const PADDING_RATIO: f64 = 0.05;
const PADDING: Bounds = Bounds::new(4.0, 16.0);

/// Captions longer than this many characters shrink the most.
pub const LONG_TEXT_LENGTH: usize = 20;
pub const LONG_TEXT_RATIO: f64 = 0.7;
/// Captions longer than this many characters shrink a little.
pub const MEDIUM_TEXT_LENGTH: usize = 10;
pub const MEDIUM_TEXT_RATIO: f64 = 0.85;

/// Pixel sizes of the elements drawn inside a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSizes {
    pub audio_button: f64,
    pub image_width: f64,
    pub image_height: f64,
    pub font_size: f64,
    pub line_height: f64,
    pub padding: f64,
}

impl ContentSizes {
    /// Sizes for a card showing a short caption.
    pub fn for_card(card: CardSize) -> Self {
        if card.is_empty() {
            return Self::default();
        }

        Self {
            audio_button: scaled(AUDIO_BUTTON, card.height * AUDIO_BUTTON_RATIO),
            image_width: scaled(IMAGE_WIDTH, card.width * IMAGE_WIDTH_RATIO),
            image_height: scaled(IMAGE_HEIGHT, card.height * IMAGE_HEIGHT_RATIO),
            font_size: font_size(card.height, ""),
            line_height: scaled(LINE_HEIGHT, card.height * LINE_HEIGHT_RATIO),
            padding: scaled(PADDING, card.width * PADDING_RATIO),
        }
    }
}

/// Font size for a caption on a card `card_height` pixels tall.
///
/// Long captions are shrunk before clamping so they stay inside the card.
pub fn font_size(card_height: f64, text: &str) -> f64 {
    let length = text.chars().count();
    let ratio = if length > LONG_TEXT_LENGTH {
        LONG_TEXT_RATIO
    } else if length > MEDIUM_TEXT_LENGTH {
        MEDIUM_TEXT_RATIO
    } else {
        1.0
    };
    scaled(FONT_SIZE, card_height * FONT_SIZE_RATIO * ratio)
}

/// Clamp, then snap to whole pixels.
fn scaled(bounds: Bounds, value: f64) -> f64 {
    bounds.apply(value).floor()
}
