//! Device-keyed sizing policy.
//!
//! A policy bounds card size, spacing and margins for one device class and
//! says where each side of the split should sit. The calculator works
//! against the [`SizingPolicy`] trait; when no policy is supplied, or the
//! policy has nothing for a device, [`FALLBACK_BOUNDS`] is used whole.

pub mod table;

use crate::error::{PolicyError, Result};
use crate::types::{DeviceClass, Margins};
use serde::{Deserialize, Serialize};

pub use table::{PolicyOverrides, PolicyTable};

/// Hard limits every resolved card dimension must respect.
pub const CARD_SIZE_LIMITS: Bounds = Bounds::new(40.0, 300.0);
/// Hard limits for gaps between cards.
pub const SPACING_LIMITS: Bounds = Bounds::new(5.0, 30.0);
/// Hard limits for container margins.
pub const MARGIN_LIMITS: Bounds = Bounds::new(10.0, 50.0);

/// Conservative defaults used when no policy is available.
pub const FALLBACK_BOUNDS: PolicyBounds = PolicyBounds {
    card_width: Bounds::new(120.0, 250.0),
    card_height: Bounds::new(40.0, 80.0),
    positions: PositionRatios {
        primary_anchor: 0.3,
        secondary_anchor: 0.7,
        primary_start: 0.2,
        secondary_start: 0.2,
    },
    spacing: SpacingBounds {
        horizontal: 15.0,
        vertical: 10.0,
        min: 5.0,
        max: 30.0,
    },
    margins: Margins {
        top: 30.0,
        bottom: 30.0,
        left: 15.0,
        right: 15.0,
    },
};

/// Closed interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `value` into the interval. `max` wins if the interval is inverted.
    pub fn apply(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Both ends moved inside `limits` and onto whole pixels, with
    /// `min <= max` restored. `limits` must have integral ends.
    fn sanitized_within(&self, limits: Bounds) -> Self {
        let min = finite_or(self.min, limits.min);
        let max = finite_or(self.max, limits.max);
        let min = limits.apply(min).ceil();
        let max = limits.apply(max).floor().max(min);
        Self { min, max }
    }
}

/// Where each side's card block sits, as fractions of the container.
///
/// Anchors are measured along the split axis (x for left-right, y for
/// top-bottom) and mark the block center. Starts are measured along the
/// stacking axis and mark the preferred block start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRatios {
    pub primary_anchor: f64,
    pub secondary_anchor: f64,
    pub primary_start: f64,
    pub secondary_start: f64,
}

impl PositionRatios {
    /// Point between the two sides, as a fraction of the split axis.
    pub fn divider(&self) -> f64 {
        (self.primary_anchor + self.secondary_anchor) / 2.0
    }
}

/// Preferred gaps and the interval they are clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingBounds {
    pub horizontal: f64,
    pub vertical: f64,
    pub min: f64,
    pub max: f64,
}

impl SpacingBounds {
    pub fn range(&self) -> Bounds {
        Bounds::new(self.min, self.max)
    }
}

/// Everything a policy says about one device class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyBounds {
    pub card_width: Bounds,
    pub card_height: Bounds,
    pub positions: PositionRatios,
    pub spacing: SpacingBounds,
    pub margins: Margins,
}

impl Default for PolicyBounds {
    fn default() -> Self {
        FALLBACK_BOUNDS
    }
}

impl PolicyBounds {
    /// Repair any value the calculator could not work with.
    ///
    /// Non-finite values fall back to the defaults, every range is pulled
    /// inside the hard limits and snapped inward to whole pixels, and ratios
    /// land in `[0, 1]`.
    pub fn sanitized(&self) -> Self {
        let ratios = &self.positions;
        let fallback = &FALLBACK_BOUNDS.positions;
        let spacing_range =
            Bounds::new(self.spacing.min, self.spacing.max).sanitized_within(SPACING_LIMITS);

        Self {
            card_width: self.card_width.sanitized_within(CARD_SIZE_LIMITS),
            card_height: self.card_height.sanitized_within(CARD_SIZE_LIMITS),
            positions: PositionRatios {
                primary_anchor: ratio_or(ratios.primary_anchor, fallback.primary_anchor),
                secondary_anchor: ratio_or(ratios.secondary_anchor, fallback.secondary_anchor),
                primary_start: ratio_or(ratios.primary_start, fallback.primary_start),
                secondary_start: ratio_or(ratios.secondary_start, fallback.secondary_start),
            },
            spacing: SpacingBounds {
                horizontal: spacing_range.apply(finite_or(self.spacing.horizontal, spacing_range.min)),
                vertical: spacing_range.apply(finite_or(self.spacing.vertical, spacing_range.min)),
                min: spacing_range.min,
                max: spacing_range.max,
            },
            margins: Margins {
                top: MARGIN_LIMITS.apply(finite_or(self.margins.top, MARGIN_LIMITS.min)),
                bottom: MARGIN_LIMITS.apply(finite_or(self.margins.bottom, MARGIN_LIMITS.min)),
                left: MARGIN_LIMITS.apply(finite_or(self.margins.left, MARGIN_LIMITS.min)),
                right: MARGIN_LIMITS.apply(finite_or(self.margins.right, MARGIN_LIMITS.min)),
            },
        }
    }

    /// Strict check used when loading configuration.
    pub fn validate(&self, device: &str) -> Result<()> {
        check_range(device, "card_width", self.card_width)?;
        check_range(device, "card_height", self.card_height)?;
        check_range(device, "spacing", self.spacing.range())?;

        let ratios = [
            ("positions.primary_anchor", self.positions.primary_anchor),
            ("positions.secondary_anchor", self.positions.secondary_anchor),
            ("positions.primary_start", self.positions.primary_start),
            ("positions.secondary_start", self.positions.secondary_start),
        ];
        for (field, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid_value(device, field, value));
            }
        }

        let lengths = [
            ("spacing.horizontal", self.spacing.horizontal),
            ("spacing.vertical", self.spacing.vertical),
            ("margins.top", self.margins.top),
            ("margins.bottom", self.margins.bottom),
            ("margins.left", self.margins.left),
            ("margins.right", self.margins.right),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid_value(device, field, value));
            }
        }

        Ok(())
    }
}

fn check_range(device: &str, field: &'static str, bounds: Bounds) -> Result<()> {
    for value in [bounds.min, bounds.max] {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid_value(device, field, value));
        }
    }
    if bounds.min > bounds.max {
        return Err(PolicyError::InvalidRange {
            device: device.to_string(),
            field,
            min: bounds.min,
            max: bounds.max,
        });
    }
    Ok(())
}

fn invalid_value(device: &str, field: &'static str, value: f64) -> PolicyError {
    PolicyError::InvalidValue {
        device: device.to_string(),
        field,
        value,
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn ratio_or(value: f64, fallback: f64) -> f64 {
    finite_or(value, fallback).max(0.0).min(1.0)
}

/// Source of per-device sizing bounds.
pub trait SizingPolicy: Send + Sync {
    /// Bounds for `device`, or `None` to use the fallback defaults.
    fn get(&self, device: DeviceClass) -> Option<PolicyBounds>;
}

/// Policy that always answers with [`FALLBACK_BOUNDS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackPolicy;

impl SizingPolicy for FallbackPolicy {
    fn get(&self, _device: DeviceClass) -> Option<PolicyBounds> {
        Some(FALLBACK_BOUNDS)
    }
}

/// Bounds the calculator will actually use for `device`.
pub fn resolve(policy: &dyn SizingPolicy, device: DeviceClass) -> PolicyBounds {
    policy.get(device).unwrap_or(FALLBACK_BOUNDS).sanitized()
}
