//! Error types for layout-core.
//!
//! Layout calculation itself never fails; only loading a sizing policy
//! table from configuration can.

use thiserror::Error;

/// Result type alias using PolicyError.
pub type Result<T> = std::result::Result<T, PolicyError>;

/// Errors that can occur while loading a sizing policy table.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid policy json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown device class: {name}")]
    UnknownDevice { name: String },

    #[error("invalid range for {device}.{field}: min {min} > max {max}")]
    InvalidRange {
        device: String,
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("invalid value for {device}.{field}: {value}")]
    InvalidValue {
        device: String,
        field: &'static str,
        value: f64,
    },
}
