//! Sample and raw reading types

use core::fmt::Display;

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch
pub type Timestamp = u64;

/// One admitted humidity observation
///
/// The value is a relative-humidity percentage. It is logically 0-100 but is
/// stored as received; nothing clamps it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    /// Relative humidity in percent
    pub value: f32,
    /// Arrival time in milliseconds since epoch
    pub timestamp: Timestamp,
}

impl Sample {
    pub const fn new(value: f32, timestamp: Timestamp) -> Self {
        Self { value, timestamp }
    }
}

impl Display for Sample {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "[Sample] timestamp: {}, humidity: {:.2}%",
            self.timestamp, self.value
        )
    }
}

/// Raw payload handed over by the transport layer
///
/// Brokers deliver text; local drivers may already hold a number. Both go
/// through the same validity check before admission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading<'a> {
    Text(&'a str),
    Number(f32),
}

impl Reading<'_> {
    /// Parse the payload into a finite value.
    ///
    /// Text is trimmed and its longest leading decimal number is used, so
    /// unit suffixes like `"45.2%"` or `"45.2 RH"` are accepted. `NaN` and
    /// infinities are rejected in both forms.
    pub fn parse(&self) -> Option<f32> {
        let value = match self {
            Self::Text(text) => numeric_prefix(text.trim()).parse::<f32>().ok()?,
            Self::Number(value) => *value,
        };

        value.is_finite().then_some(value)
    }
}

/// Longest prefix of `text` shaped like `[+-]digits[.digits][e[+-]digits]`
///
/// Returns an empty string when no digit leads the mantissa. A dangling `.`
/// or an exponent marker without digits is left out of the prefix.
fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let integer = digits_from(end);
    end += integer;

    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if fraction > 0 {
            end += 1 + fraction;
        }
    }

    if integer == 0 && fraction == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exponent = digits_from(exp_start);
        if exponent > 0 {
            end = exp_start + exponent;
        }
    }

    &text[..end]
}

impl<'a> From<&'a str> for Reading<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl From<f32> for Reading<'_> {
    fn from(value: f32) -> Self {
        Self::Number(value)
    }
}

impl From<f64> for Reading<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value as f32)
    }
}
