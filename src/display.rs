//! Presentation-facing derivations
//!
//! The renderer owns all drawing. This module only derives the values it
//! consumes: per-point status and color, segment coloring, the shaded optimal
//! band, the current-value string and time-of-day axis labels.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use heapless::String;

use crate::sample::{Sample, Timestamp};
use crate::status::{Status, Thresholds};

// RGB565 format: R(5 bits), G(6 bits), B(5 bits)
// Convert from 8-bit RGB: R>>3, G>>2, B>>3

/// Points and segments inside the optimal band - green
pub const COLOR_OPTIMAL: Rgb565 = Rgb565::new(75 >> 3, 192 >> 2, 75 >> 3);

/// Points and segments outside the optimal band - soft red
pub const COLOR_OUT_OF_RANGE: Rgb565 = Rgb565::new(255 >> 3, 99 >> 2, 99 >> 3);

/// Shaded background of the optimal band
pub const COLOR_OPTIMAL_ZONE: Rgb565 = Rgb565::new(30 >> 3, 206 >> 2, 42 >> 3);

/// Current-value label inside the optimal band - bright green
pub const COLOR_CURRENT_OPTIMAL: Rgb565 = Rgb565::new(0x28 >> 3, 0xa7 >> 2, 0x45 >> 3);

/// Current-value label outside the optimal band - red
pub const COLOR_CURRENT_OUT_OF_RANGE: Rgb565 = Rgb565::new(0xdc >> 3, 0x35 >> 2, 0x45 >> 3);

/// Fixed lower bound of the value axis (%)
pub const Y_AXIS_MIN: f32 = 0.0;

/// Fixed upper bound of the value axis (%)
pub const Y_AXIS_MAX: f32 = 100.0;

const MS_PER_MINUTE: i64 = 60 * 1000;
const MINUTES_PER_DAY: i64 = 24 * 60;

/// One plotted point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub timestamp: Timestamp,
    pub value: f32,
    pub status: Status,
}

impl ChartPoint {
    pub fn from_sample(sample: &Sample, thresholds: &Thresholds) -> Self {
        Self {
            timestamp: sample.timestamp,
            value: sample.value,
            status: thresholds.classify(sample.value),
        }
    }

    pub const fn color(&self) -> Rgb565 {
        self.status.color()
    }
}

/// Line segment between two adjacent points
///
/// A segment takes the status of the point it ends at, so a line climbing
/// out of the band turns red on the first segment that leaves it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: ChartPoint,
    pub end: ChartPoint,
}

impl Segment {
    pub const fn status(&self) -> Status {
        self.end.status
    }

    pub const fn color(&self) -> Rgb565 {
        self.end.status.color()
    }
}

/// Horizontal band drawn behind the series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimalBand {
    pub low: f32,
    pub high: f32,
    pub color: Rgb565,
}

impl From<Thresholds> for OptimalBand {
    fn from(thresholds: Thresholds) -> Self {
        Self {
            low: thresholds.low,
            high: thresholds.high,
            color: COLOR_OPTIMAL_ZONE,
        }
    }
}

/// Widest current-value text: `-f32::MAX` is 40 characters, then `.0%`
pub const READING_TEXT_CAPACITY: usize = 48;

/// Format a reading for the current-value display, e.g. `"45.2%"`
///
/// Values are not clamped; every finite `f32` fits.
pub fn format_reading(value: f32) -> String<READING_TEXT_CAPACITY> {
    let mut text = String::new();
    let _ = write!(text, "{:.1}%", value);
    text
}

/// `HH:MM` label for an absolute timestamp
///
/// The axis is keyed on absolute timestamps; only the label is reduced to a
/// time of day, so a window spanning midnight stays ordered.
pub fn time_label(timestamp: Timestamp, utc_offset_minutes: i32) -> String<5> {
    let minutes = (timestamp / MS_PER_MINUTE as u64) as i64 + utc_offset_minutes as i64;
    let minute_of_day = minutes.rem_euclid(MINUTES_PER_DAY);

    let mut label = String::new();
    let _ = write!(
        label,
        "{:02}:{:02}",
        minute_of_day / 60,
        minute_of_day % 60
    );
    label
}
