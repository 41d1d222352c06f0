//! Statistics over the retained window

use crate::sample::Sample;
use crate::status::{Status, Thresholds};

/// Summary of the samples currently retained
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub count: usize,
    pub min: f32,
    pub max: f32,
    pub avg: f32,
}

impl WindowStats {
    /// Compute stats over a sequence of samples; `None` when it is empty
    pub fn from_samples<'a>(samples: impl IntoIterator<Item = &'a Sample>) -> Option<Self> {
        let mut count = 0usize;
        // f64 accumulator keeps long windows from drifting
        let mut sum = 0f64;
        let mut min = f32::MAX;
        let mut max = f32::MIN;

        for sample in samples {
            count += 1;
            sum += sample.value as f64;
            min = min.min(sample.value);
            max = max.max(sample.value);
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            count,
            min,
            max,
            avg: (sum / count as f64) as f32,
        })
    }

    /// Status of the window average
    pub fn status(&self, thresholds: &Thresholds) -> Status {
        thresholds.classify(self.avg)
    }
}
