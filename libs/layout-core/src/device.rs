//! Device classification and container breakpoints.

use crate::types::DeviceClass;
use serde::{Deserialize, Serialize};

/// Widest container still treated as a phone.
pub const MOBILE_MAX_WIDTH: f64 = 600.0;
/// Widest container still treated as a tablet.
pub const TABLET_MAX_WIDTH: f64 = 1024.0;

/// Maps container dimensions to a device class.
pub trait DeviceClassifier: Send + Sync {
    fn classify(&self, width: f64, height: f64) -> DeviceClass;
}

/// Width breakpoints combined with orientation.
///
/// Used whenever the host does not supply its own classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackClassifier;

impl DeviceClassifier for FallbackClassifier {
    fn classify(&self, width: f64, height: f64) -> DeviceClass {
        let is_portrait = height >= width;
        if width <= MOBILE_MAX_WIDTH {
            if is_portrait {
                DeviceClass::MobilePortrait
            } else {
                DeviceClass::MobileLandscape
            }
        } else if width <= TABLET_MAX_WIDTH {
            if is_portrait {
                DeviceClass::TabletPortrait
            } else {
                DeviceClass::TabletLandscape
            }
        } else {
            DeviceClass::Desktop
        }
    }
}

/// Container size bucket by height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenSize {
    Small,
    Medium,
    Large,
}

pub fn screen_size(height: f64) -> ScreenSize {
    if height < 600.0 {
        ScreenSize::Small
    } else if height < 800.0 {
        ScreenSize::Medium
    } else {
        ScreenSize::Large
    }
}

/// iPad-class widths, portrait or landscape.
pub fn is_ipad(width: f64, _height: f64) -> bool {
    (768.0..=1280.0).contains(&width)
}

/// Phone turned sideways: wide and very short.
pub fn is_landscape_mobile(width: f64, height: f64) -> bool {
    width > height && height < 450.0
}
