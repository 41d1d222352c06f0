//! Admission and alert decisions for raw readings

use log::{debug, info, warn};

use crate::alerts::AlertRecord;
use crate::config::EngineConfig;
use crate::error::RejectReason;
use crate::sample::{Reading, Sample, Timestamp};
use crate::status::{Status, Thresholds};

/// Outcome of evaluating one raw reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdmissionResult {
    /// The payload is not a finite number; nothing changed
    Rejected(RejectReason),
    /// Valid, but arrived inside the minimum interval. The value may still be
    /// shown as the current reading; it is not stored and raises no alert.
    Throttled { value: f32 },
    /// Valid and admitted into history
    Admitted {
        sample: Sample,
        alert: Option<AlertRecord>,
    },
}

impl AdmissionResult {
    pub const fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }

    /// The parsed value, if the payload was valid
    pub const fn value(&self) -> Option<f32> {
        match self {
            Self::Rejected(_) => None,
            Self::Throttled { value } => Some(*value),
            Self::Admitted { sample, .. } => Some(sample.value),
        }
    }

    pub const fn alert(&self) -> Option<&AlertRecord> {
        match self {
            Self::Admitted {
                alert: Some(alert), ..
            } => Some(alert),
            _ => None,
        }
    }
}

/// Rate-limited admission gate
///
/// Tracks the timestamp of the last admitted sample itself, so it does not
/// depend on the retention buffer.
#[derive(Debug, Clone)]
pub struct IngestGate {
    min_interval_ms: Option<u64>,
    thresholds: Thresholds,
    alert_threshold: Option<f32>,
    last_admitted: Option<Timestamp>,
    next_alert_id: u64,
}

impl IngestGate {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            min_interval_ms: config.min_admit_interval_ms,
            thresholds: config.thresholds,
            alert_threshold: config.alert_threshold,
            last_admitted: None,
            next_alert_id: 1,
        }
    }

    /// Decide what happens to a raw reading arriving at `now`
    ///
    /// A clock that steps backwards behind the last admission counts as
    /// zero elapsed time, so the reading is throttled.
    pub fn evaluate<'r>(&mut self, raw: impl Into<Reading<'r>>, now: Timestamp) -> AdmissionResult {
        let raw = raw.into();
        let Some(value) = raw.parse() else {
            warn!("Rejected non-numeric reading: {:?}", raw);
            return AdmissionResult::Rejected(RejectReason::NotANumber);
        };

        if let (Some(interval), Some(last)) = (self.min_interval_ms, self.last_admitted)
            && now.saturating_sub(last) < interval
        {
            debug!("Throttled reading {:.1}% at {} (last admitted {})", value, now, last);
            return AdmissionResult::Throttled { value };
        }

        self.last_admitted = Some(now);
        let sample = Sample::new(value, now);
        let alert = self.check_alert(&sample);

        AdmissionResult::Admitted { sample, alert }
    }

    fn check_alert(&mut self, sample: &Sample) -> Option<AlertRecord> {
        let threshold = self.alert_threshold?;
        if sample.value <= threshold {
            return None;
        }

        let alert = AlertRecord {
            id: self.next_alert_id,
            value: sample.value,
            timestamp: sample.timestamp,
        };
        self.next_alert_id += 1;
        info!("{}", alert);
        Some(alert)
    }

    /// Classify a value against the configured thresholds
    pub fn classify(&self, value: f32) -> Status {
        self.thresholds.classify(value)
    }

    pub fn last_admitted(&self) -> Option<Timestamp> {
        self.last_admitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_time::Duration;

    const MINUTE_MS: u64 = 60 * 1000;

    fn throttled_gate() -> IngestGate {
        IngestGate::new(&EngineConfig::default().with_min_interval(Duration::from_secs(600)))
    }

    #[test]
    fn test_throttling() {
        let mut gate = throttled_gate();

        assert!(gate.evaluate(30.0f32, 0).is_admitted());
        assert_eq!(
            gate.evaluate(30.0f32, 5 * MINUTE_MS),
            AdmissionResult::Throttled { value: 30.0 }
        );
        assert!(gate.evaluate(30.0f32, 11 * MINUTE_MS).is_admitted());
        assert_eq!(gate.last_admitted(), Some(11 * MINUTE_MS));
    }

    #[test]
    fn test_throttle_boundary_admits() {
        let mut gate = throttled_gate();
        assert!(gate.evaluate("30", 1000).is_admitted());
        assert!(!gate.evaluate("30", 1000 + 10 * MINUTE_MS - 1).is_admitted());
        assert!(gate.evaluate("30", 1000 + 10 * MINUTE_MS).is_admitted());
    }

    #[test]
    fn test_throttled_does_not_move_window() {
        let mut gate = throttled_gate();
        gate.evaluate(30.0f32, 0);
        for minute in 1..10 {
            assert!(!gate.evaluate(30.0f32, minute * MINUTE_MS).is_admitted());
        }
        assert!(gate.evaluate(30.0f32, 10 * MINUTE_MS).is_admitted());
    }

    #[test]
    fn test_clock_stepping_back_is_throttled() {
        let mut gate = throttled_gate();
        gate.evaluate(30.0f32, 60 * MINUTE_MS);
        assert!(!gate.evaluate(30.0f32, 10 * MINUTE_MS).is_admitted());
    }

    #[test]
    fn test_unthrottled_admits_everything() {
        let mut gate = IngestGate::new(&EngineConfig::default());
        for _ in 0..5 {
            assert!(gate.evaluate(30.0f32, 42).is_admitted());
        }
    }

    #[test]
    fn test_alert_generation() {
        let mut gate = IngestGate::new(&EngineConfig::default());

        let high = gate.evaluate(61.0f32, 1);
        assert_eq!(high.alert().map(|a| a.value), Some(61.0));
        assert_eq!(gate.evaluate(50.0f32, 2).alert(), None);
        assert_eq!(gate.evaluate(15.0f32, 3).alert(), None);
    }

    #[test]
    fn test_alert_ids_are_unique_within_a_millisecond() {
        let mut gate = IngestGate::new(&EngineConfig::default());
        let first = gate.evaluate(70.0f32, 5);
        let second = gate.evaluate(71.0f32, 5);

        let first_id = first.alert().map(|a| a.id);
        let second_id = second.alert().map(|a| a.id);
        assert_eq!(first_id, Some(1));
        assert_eq!(second_id, Some(2));
    }

    #[test]
    fn test_throttled_reading_raises_no_alert() {
        let mut gate = throttled_gate();
        gate.evaluate(30.0f32, 0);
        let result = gate.evaluate(90.0f32, MINUTE_MS);
        assert_eq!(result, AdmissionResult::Throttled { value: 90.0 });
        assert_eq!(result.alert(), None);
    }

    #[test]
    fn test_alerts_disabled() {
        let mut gate = IngestGate::new(&EngineConfig::default().without_alerts());
        let result = gate.evaluate(95.0f32, 0);
        assert!(result.is_admitted());
        assert_eq!(result.alert(), None);
        assert_eq!(gate.classify(95.0), Status::High);
    }

    #[test]
    fn test_rejection() {
        let mut gate = throttled_gate();
        assert_eq!(
            gate.evaluate("not-a-number", 0),
            AdmissionResult::Rejected(RejectReason::NotANumber)
        );
        assert_eq!(gate.last_admitted(), None);
        assert!(gate.evaluate("30", 0).is_admitted());
    }
}
