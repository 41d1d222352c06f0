//! Engine configuration
//!
//! The observed deployments differ only in how long history is kept, whether
//! admission is throttled and whether alerts are raised. All of them are
//! expressed through [`EngineConfig`]; the engine branches on it rather than
//! existing in several copies.

use alloc::vec::Vec;

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::status::{DEFAULT_HIGH_THRESHOLD, Thresholds};

/// Default retention horizon: 8 hours
pub const DEFAULT_HORIZON_MS: u64 = 8 * 60 * 60 * 1000;

/// Default capacity for the count-bounded window
pub const DEFAULT_CAPACITY: usize = 50;

/// Default minimum interval between admitted samples when throttling: 10 minutes
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 10 * 60 * 1000;

/// How the retention buffer bounds its history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetentionPolicy {
    /// Evict samples older than `now - horizon_ms`
    Duration { horizon_ms: u64 },
    /// Keep at most `max_samples`, evicting the oldest first
    Capacity { max_samples: usize },
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::Duration {
            horizon_ms: DEFAULT_HORIZON_MS,
        }
    }
}

impl RetentionPolicy {
    /// Duration-bounded policy from an embassy [`Duration`]
    pub fn duration(horizon: Duration) -> Self {
        Self::Duration {
            horizon_ms: horizon.as_millis(),
        }
    }

    /// Count-bounded policy
    pub const fn capacity(max_samples: usize) -> Self {
        Self::Capacity { max_samples }
    }
}

/// Complete configuration surface of the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Retention bound for admitted samples
    pub retention: RetentionPolicy,
    /// Minimum spacing between admitted samples; `None` admits every valid reading
    pub min_admit_interval_ms: Option<u64>,
    /// Optimal band used for classification
    pub thresholds: Thresholds,
    /// Values strictly above this raise an alert; `None` disables alerting
    pub alert_threshold: Option<f32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retention: RetentionPolicy::default(),
            min_admit_interval_ms: None,
            thresholds: Thresholds::default(),
            alert_threshold: Some(DEFAULT_HIGH_THRESHOLD),
        }
    }
}

impl EngineConfig {
    /// 8 hour rolling window, every valid reading admitted
    pub fn duration_window() -> Self {
        Self::default()
    }

    /// 50 most recent points, every valid reading admitted
    pub fn capacity_window() -> Self {
        Self::default().with_retention(RetentionPolicy::capacity(DEFAULT_CAPACITY))
    }

    /// 8 hour rolling window, at most one sample per 10 minutes
    pub fn throttled() -> Self {
        Self::default().with_min_interval(Duration::from_millis(DEFAULT_MIN_INTERVAL_MS))
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_admit_interval_ms = Some(interval.as_millis());
        self
    }

    pub fn without_throttling(mut self) -> Self {
        self.min_admit_interval_ms = None;
        self
    }

    /// Replace the optimal band. The alert threshold follows the new high bound
    /// unless alerting is disabled.
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        if self.alert_threshold.is_some() {
            self.alert_threshold = Some(thresholds.high);
        }
        self
    }

    pub fn with_alert_threshold(mut self, threshold: f32) -> Self {
        self.alert_threshold = Some(threshold);
        self
    }

    pub fn without_alerts(mut self) -> Self {
        self.alert_threshold = None;
        self
    }

    /// Check that the configuration describes a usable engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Thresholds { low, high } = self.thresholds;
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(ConfigError::InvalidThresholds { low, high });
        }

        if let Some(threshold) = self.alert_threshold
            && !threshold.is_finite()
        {
            return Err(ConfigError::InvalidAlertThreshold(threshold));
        }

        match self.retention {
            RetentionPolicy::Duration { horizon_ms: 0 } => Err(ConfigError::ZeroHorizon),
            RetentionPolicy::Capacity { max_samples: 0 } => Err(ConfigError::ZeroCapacity),
            _ => Ok(()),
        }
    }

    /// Encode into a compact postcard blob
    pub fn to_postcard(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(ConfigError::Encode)
    }

    /// Decode a postcard blob and validate the result
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }
}
