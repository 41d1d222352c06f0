//! Error and rejection types

use thiserror_no_std::Error;

/// Invalid engine configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid thresholds: low {low} must be finite and not above high {high}")]
    InvalidThresholds { low: f32, high: f32 },
    #[error("invalid alert threshold: {0}")]
    InvalidAlertThreshold(f32),
    #[error("retention horizon must be non-zero")]
    ZeroHorizon,
    #[error("retention capacity must be non-zero")]
    ZeroCapacity,
    #[error("config encode failed: {0}")]
    Encode(postcard::Error),
    #[error("config decode failed: {0}")]
    Decode(postcard::Error),
}

/// Why a raw reading was not accepted
///
/// This is an outcome, not a fault: the reading is dropped and nothing else
/// changes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    #[error("payload is not a finite number")]
    NotANumber,
}
