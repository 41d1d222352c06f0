//! Status classification for humidity readings
//!
//! One classification feeds both the alert decision and the color coding
//! handed to the renderer, so the two can never disagree.

use embedded_graphics::pixelcolor::Rgb565;
use serde::{Deserialize, Serialize};

use crate::display::{
    COLOR_CURRENT_OPTIMAL, COLOR_CURRENT_OUT_OF_RANGE, COLOR_OPTIMAL, COLOR_OUT_OF_RANGE,
};

/// Default lower bound of the optimal band (%)
pub const DEFAULT_LOW_THRESHOLD: f32 = 20.0;

/// Default upper bound of the optimal band (%)
pub const DEFAULT_HIGH_THRESHOLD: f32 = 50.0;

/// Classified state of a humidity value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Below the low threshold
    Low,
    /// Within the band, both bounds inclusive
    Optimal,
    /// Above the high threshold; alert-worthy
    High,
}

impl Status {
    /// Get the display color for this status
    ///
    /// Low and High share the out-of-range color.
    pub const fn color(self) -> Rgb565 {
        match self {
            Self::Optimal => COLOR_OPTIMAL,
            Self::Low | Self::High => COLOR_OUT_OF_RANGE,
        }
    }

    /// Get the color of the current-value label for this status
    pub const fn value_color(self) -> Rgb565 {
        match self {
            Self::Optimal => COLOR_CURRENT_OPTIMAL,
            Self::Low | Self::High => COLOR_CURRENT_OUT_OF_RANGE,
        }
    }

    /// Get the display label for this status
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Optimal => "Optimal",
            Self::High => "High",
        }
    }
}

/// Bounds of the optimal humidity band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub low: f32,
    pub high: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_THRESHOLD,
            high: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

impl Thresholds {
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Classify a value against these bounds
    pub fn classify(&self, value: f32) -> Status {
        if value < self.low {
            Status::Low
        } else if value > self.high {
            Status::High
        } else {
            Status::Optimal
        }
    }
}

/// Classify a value against the default 20/50 thresholds
pub fn classify(value: f32) -> Status {
    Thresholds::default().classify(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(classify(19.999), Status::Low);
        assert_eq!(classify(20.0), Status::Optimal);
        assert_eq!(classify(50.0), Status::Optimal);
        assert_eq!(classify(50.001), Status::High);
    }

    #[test]
    fn test_classify_out_of_logical_range() {
        assert_eq!(classify(-5.0), Status::Low);
        assert_eq!(classify(120.0), Status::High);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = Thresholds::new(40.0, 60.0);
        assert_eq!(thresholds.classify(39.0), Status::Low);
        assert_eq!(thresholds.classify(55.0), Status::Optimal);
        assert_eq!(thresholds.classify(60.5), Status::High);
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(Status::Optimal.color(), COLOR_OPTIMAL);
        assert_eq!(Status::Low.color(), COLOR_OUT_OF_RANGE);
        assert_eq!(Status::High.color(), COLOR_OUT_OF_RANGE);
        assert_ne!(COLOR_OPTIMAL, COLOR_OUT_OF_RANGE);
    }
}
