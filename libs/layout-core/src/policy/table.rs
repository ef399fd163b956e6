//! Device-keyed policy table and per-device overrides.
//!
//! # Format
//! ```json
//! {
//!   "desktop": {
//!     "card_width": { "min": 150, "max": 250 },
//!     "card_height": { "min": 50, "max": 80 },
//!     "positions": {
//!       "primary_anchor": 0.3, "secondary_anchor": 0.7,
//!       "primary_start": 0.35, "secondary_start": 0.32
//!     },
//!     "spacing": { "horizontal": 15, "vertical": 10, "min": 5, "max": 30 },
//!     "margins": { "top": 30, "bottom": 30, "left": 15, "right": 15 }
//!   }
//! }
//! ```

use super::{Bounds, PolicyBounds, PositionRatios, SizingPolicy, SpacingBounds, FALLBACK_BOUNDS};
use crate::error::{PolicyError, Result};
use crate::types::{DeviceClass, Margins};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Sizing policy backed by an in-memory table.
///
/// Devices without an entry resolve to the fallback defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyTable {
    devices: HashMap<DeviceClass, PolicyBounds>,
}

impl PolicyTable {
    /// Empty table; every device resolves to the fallback defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tuned values for each device class.
    ///
    /// Phones get compact cards and tight margins, landscape phones the
    /// most compact of all, tablets and desktops progressively roomier.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.insert(
            DeviceClass::MobilePortrait,
            PolicyBounds {
                card_width: Bounds::new(100.0, 200.0),
                card_height: Bounds::new(40.0, 65.0),
                positions: PositionRatios {
                    primary_anchor: 0.27,
                    secondary_anchor: 0.73,
                    primary_start: 0.15,
                    secondary_start: 0.15,
                },
                spacing: SpacingBounds {
                    horizontal: 8.0,
                    vertical: 6.0,
                    min: 5.0,
                    max: 20.0,
                },
                margins: Margins {
                    top: 20.0,
                    bottom: 20.0,
                    left: 10.0,
                    right: 10.0,
                },
            },
        );
        table.insert(
            DeviceClass::MobileLandscape,
            PolicyBounds {
                card_width: Bounds::new(100.0, 150.0),
                card_height: Bounds::new(40.0, 56.0),
                positions: PositionRatios {
                    primary_anchor: 0.38,
                    secondary_anchor: 0.70,
                    primary_start: 0.15,
                    secondary_start: 0.12,
                },
                spacing: SpacingBounds {
                    horizontal: 10.0,
                    vertical: 5.0,
                    min: 5.0,
                    max: 18.0,
                },
                margins: Margins {
                    top: 12.0,
                    bottom: 12.0,
                    left: 12.0,
                    right: 12.0,
                },
            },
        );
        table.insert(
            DeviceClass::TabletPortrait,
            PolicyBounds {
                card_width: Bounds::new(140.0, 220.0),
                card_height: Bounds::new(45.0, 72.0),
                positions: PositionRatios {
                    primary_anchor: 0.3,
                    secondary_anchor: 0.7,
                    primary_start: 0.3,
                    secondary_start: 0.27,
                },
                spacing: SpacingBounds {
                    horizontal: 12.0,
                    vertical: 8.0,
                    min: 5.0,
                    max: 25.0,
                },
                margins: Margins {
                    top: 30.0,
                    bottom: 30.0,
                    left: 20.0,
                    right: 20.0,
                },
            },
        );
        table.insert(
            DeviceClass::TabletLandscape,
            PolicyBounds {
                card_width: Bounds::new(140.0, 240.0),
                card_height: Bounds::new(45.0, 76.0),
                positions: PositionRatios {
                    primary_anchor: 0.3,
                    secondary_anchor: 0.7,
                    primary_start: 0.3,
                    secondary_start: 0.27,
                },
                spacing: SpacingBounds {
                    horizontal: 14.0,
                    vertical: 9.0,
                    min: 5.0,
                    max: 28.0,
                },
                margins: Margins {
                    top: 30.0,
                    bottom: 30.0,
                    left: 24.0,
                    right: 24.0,
                },
            },
        );
        table.insert(
            DeviceClass::Desktop,
            PolicyBounds {
                card_width: Bounds::new(150.0, 250.0),
                card_height: Bounds::new(50.0, 80.0),
                positions: PositionRatios {
                    primary_anchor: 0.3,
                    secondary_anchor: 0.7,
                    primary_start: 0.35,
                    secondary_start: 0.32,
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
            },
        );
        table
    }

    /// Load a table from JSON keyed by device class name.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, PolicyBounds> = serde_json::from_str(json)?;
        let mut table = Self::new();

        for (name, bounds) in raw {
            let device = DeviceClass::from_str(&name)
                .ok_or_else(|| PolicyError::UnknownDevice { name: name.clone() })?;
            bounds.validate(&name)?;
            table.insert(device, bounds);
        }

        tracing::debug!(devices = table.len(), "loaded sizing policy table");
        Ok(table)
    }

    /// Serialize the table with device names as keys, in a stable order.
    pub fn to_json(&self) -> Result<String> {
        let ordered: BTreeMap<&'static str, &PolicyBounds> = self
            .devices
            .iter()
            .map(|(device, bounds)| (device.as_str(), bounds))
            .collect();
        Ok(serde_json::to_string_pretty(&ordered)?)
    }

    pub fn insert(&mut self, device: DeviceClass, bounds: PolicyBounds) {
        self.devices.insert(device, bounds);
    }

    /// Apply overrides on top of the device's current bounds.
    pub fn with_overrides(mut self, device: DeviceClass, overrides: &PolicyOverrides) -> Self {
        let base = self.devices.get(&device).copied().unwrap_or(FALLBACK_BOUNDS);
        self.devices.insert(device, overrides.merge(&base));
        self
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl SizingPolicy for PolicyTable {
    fn get(&self, device: DeviceClass) -> Option<PolicyBounds> {
        self.devices.get(&device).copied()
    }
}

/// Per-device overrides (all fields optional).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_width: Option<Bounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_height: Option<Bounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions: Option<PositionRatios>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<SpacingBounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margins: Option<Margins>,
}

impl PolicyOverrides {
    /// Merge onto `base`; unset fields keep the base value.
    pub fn merge(&self, base: &PolicyBounds) -> PolicyBounds {
        PolicyBounds {
            card_width: self.card_width.unwrap_or(base.card_width),
            card_height: self.card_height.unwrap_or(base.card_height),
            positions: self.positions.unwrap_or(base.positions),
            spacing: self.spacing.unwrap_or(base.spacing),
            margins: self.margins.unwrap_or(base.margins),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_covers_every_device() {
        let table = PolicyTable::builtin();
        for device in DeviceClass::ALL {
            let bounds = table.get(device).unwrap();
            assert!(bounds.validate(device.as_str()).is_ok());
            assert_eq!(bounds.sanitized(), bounds);
        }
    }

    #[test]
    fn empty_table_defers_to_fallback() {
        assert_eq!(PolicyTable::new().get(DeviceClass::Desktop), None);
    }

    #[test]
    fn json_round_trip() {
        let table = PolicyTable::builtin();
        let json = table.to_json().unwrap();
        let loaded = PolicyTable::from_json(&json).unwrap();
        assert_eq!(loaded.len(), DeviceClass::ALL.len());

        for device in DeviceClass::ALL {
            let original = table.get(device).unwrap();
            let reloaded = loaded.get(device).unwrap();
            assert_eq!(reloaded.card_width, original.card_width);
            assert_eq!(reloaded.margins, original.margins);
            let drift = (reloaded.positions.primary_anchor - original.positions.primary_anchor).abs();
            assert!(drift < 1e-9);
        }
    }

    #[test]
    fn rejects_unknown_device() {
        let json = format!(
            "{{\"smartwatch\": {}}}",
            serde_json::to_string(&FALLBACK_BOUNDS).unwrap()
        );
        let result = PolicyTable::from_json(&json);
        assert!(matches!(result, Err(PolicyError::UnknownDevice { name }) if name == "smartwatch"));
    }

    #[test]
    fn rejects_invalid_bounds() {
        let mut bounds = FALLBACK_BOUNDS;
        bounds.card_width = Bounds::new(300.0, 100.0);
        let json = format!("{{\"desktop\": {}}}", serde_json::to_string(&bounds).unwrap());
        assert!(matches!(
            PolicyTable::from_json(&json),
            Err(PolicyError::InvalidRange { field: "card_width", .. })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(PolicyTable::from_json("{"), Err(PolicyError::Json(_))));
    }

    #[test]
    fn overrides_only_touch_set_fields() {
        let overrides = PolicyOverrides {
            card_height: Some(Bounds::new(60.0, 90.0)),
            ..Default::default()
        };
        let table = PolicyTable::builtin().with_overrides(DeviceClass::Desktop, &overrides);
        let bounds = table.get(DeviceClass::Desktop).unwrap();
        assert_eq!(bounds.card_height, Bounds::new(60.0, 90.0));
        assert_eq!(bounds.card_width, Bounds::new(150.0, 250.0));
    }

    #[test]
    fn overrides_on_missing_device_start_from_fallback() {
        let overrides = PolicyOverrides {
            margins: Some(Margins {
                top: 12.0,
                bottom: 12.0,
                left: 12.0,
                right: 12.0,
            }),
            ..Default::default()
        };
        let table = PolicyTable::new().with_overrides(DeviceClass::MobilePortrait, &overrides);
        let bounds = table.get(DeviceClass::MobilePortrait).unwrap();
        assert_eq!(bounds.card_width, FALLBACK_BOUNDS.card_width);
        assert_eq!(bounds.margins.top, 12.0);
    }
}
