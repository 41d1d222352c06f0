//! The humidity monitor engine
//!
//! [`Monitor`] owns the ingest gate, the retention buffer, the alert log and
//! the latest valid reading. It is constructed once and passed by reference to
//! whatever renders it; there is no global state.
//!
//! ## Event flow
//!
//! ```text
//! raw reading ──► IngestGate::evaluate ──► Admitted ──► RetentionBuffer::append
//!                        │                    │                 │
//!                        ▼                    ▼                 ▼
//!                 latest reading          AlertLog       enforce retention
//! ```
//!
//! A periodic [`sweep`](Monitor::sweep) applies retention between readings,
//! so a stalled sensor still ages out of a duration window.

use alloc::vec::Vec;

use log::info;

use crate::alerts::{AlertLog, AlertRecord};
use crate::buffer::RetentionBuffer;
use crate::config::EngineConfig;
use crate::display::{ChartPoint, OptimalBand, Segment};
use crate::error::ConfigError;
use crate::events::{MonitorEvent, MonitorPublisher};
use crate::gate::{AdmissionResult, IngestGate};
use crate::sample::{Reading, Sample, Timestamp};
use crate::stats::WindowStats;
use crate::status::Status;

/// Last valid reading, whether or not it was admitted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatestReading {
    pub value: f32,
    pub timestamp: Timestamp,
    pub status: Status,
}

pub struct Monitor<'a> {
    config: EngineConfig,
    gate: IngestGate,
    buffer: RetentionBuffer,
    alerts: AlertLog,
    latest: Option<LatestReading>,
    publisher: Option<MonitorPublisher<'a>>,
}

impl Default for Monitor<'_> {
    fn default() -> Self {
        Self::from_valid(EngineConfig::default())
    }
}

impl<'a> Monitor<'a> {
    /// Create a monitor from a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: EngineConfig) -> Self {
        info!(
            "Monitor started: retention {:?}, min interval {:?} ms, alert threshold {:?}",
            config.retention, config.min_admit_interval_ms, config.alert_threshold
        );

        Self {
            config,
            gate: IngestGate::new(&config),
            buffer: RetentionBuffer::new(config.retention),
            alerts: AlertLog::new(),
            latest: None,
            publisher: None,
        }
    }

    /// Publish monitor events to an in-memory channel
    pub fn with_publisher(mut self, publisher: MonitorPublisher<'a>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Process one raw reading arriving at `now`
    pub fn ingest<'r>(&mut self, raw: impl Into<Reading<'r>>, now: Timestamp) -> AdmissionResult {
        let result = self.gate.evaluate(raw, now);

        if let Some(value) = result.value() {
            self.latest = Some(LatestReading {
                value,
                timestamp: now,
                status: self.gate.classify(value),
            });
        }

        if let AdmissionResult::Admitted { sample, alert } = result {
            self.admit(sample, alert, now);
        }

        result
    }

    fn admit(&mut self, sample: Sample, alert: Option<AlertRecord>, now: Timestamp) {
        let mut evicted = self.buffer.append(sample);
        evicted += self.buffer.enforce(now);
        self.publish(MonitorEvent::Admitted(sample));

        if let Some(alert) = alert {
            self.alerts.record(alert);
            self.publish(MonitorEvent::Alert(alert));
        }

        if evicted > 0 {
            self.publish(MonitorEvent::Evicted {
                count: evicted,
                at: now,
            });
        }
    }

    /// Periodic retention sweep; safe to call at any time and any rate
    pub fn sweep(&mut self, now: Timestamp) -> usize {
        let evicted = self.buffer.enforce(now);
        if evicted > 0 {
            self.publish(MonitorEvent::Evicted {
                count: evicted,
                at: now,
            });
        }
        evicted
    }

    /// Remove samples older than an explicit cutoff
    pub fn evict_older_than(&mut self, cutoff: Timestamp) -> usize {
        let evicted = self.buffer.evict_older_than(cutoff);
        if evicted > 0 {
            self.publish(MonitorEvent::Evicted {
                count: evicted,
                at: cutoff,
            });
        }
        evicted
    }

    fn publish(&self, event: MonitorEvent) {
        if let Some(publisher) = &self.publisher {
            publisher.publish_immediate(event);
        }
    }

    /// Owned copy of the retained samples, oldest first
    pub fn snapshot(&self) -> Vec<Sample> {
        self.buffer.snapshot()
    }

    /// Retained samples with their status, ready for plotting
    pub fn series(&self) -> Vec<ChartPoint> {
        self.buffer
            .iter()
            .map(|sample| ChartPoint::from_sample(sample, &self.config.thresholds))
            .collect()
    }

    /// Line segments between adjacent retained samples
    pub fn segments(&self) -> Vec<Segment> {
        let points = self.series();
        points
            .windows(2)
            .map(|pair| Segment {
                start: pair[0],
                end: pair[1],
            })
            .collect()
    }

    pub fn optimal_band(&self) -> OptimalBand {
        OptimalBand::from(self.config.thresholds)
    }

    /// Alert records, newest first
    pub fn alerts(&self) -> impl Iterator<Item = &AlertRecord> {
        self.alerts.iter()
    }

    pub fn alert_log(&self) -> &AlertLog {
        &self.alerts
    }

    pub fn stats(&self) -> Option<WindowStats> {
        WindowStats::from_samples(self.buffer.iter())
    }

    pub fn latest(&self) -> Option<&LatestReading> {
        self.latest.as_ref()
    }

    pub fn classify(&self, value: f32) -> Status {
        self.gate.classify(value)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn buffer(&self) -> &RetentionBuffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetentionPolicy;
    use crate::error::RejectReason;
    use crate::events::MonitorChannel;
    use alloc::vec;

    const MINUTE_MS: u64 = 60 * 1000;
    const HOUR_MS: u64 = 60 * MINUTE_MS;

    #[test]
    fn test_rejects_invalid_config() {
        let config = EngineConfig::default().with_retention(RetentionPolicy::capacity(0));
        assert!(matches!(
            Monitor::new(config),
            Err(ConfigError::ZeroCapacity)
        ));
    }

    #[test]
    fn test_rejection_leaves_state_unchanged() {
        let mut monitor = Monitor::default();
        monitor.ingest("61", 1000);
        let snapshot = monitor.snapshot();

        let result = monitor.ingest("not-a-number", 2000);

        assert_eq!(result, AdmissionResult::Rejected(RejectReason::NotANumber));
        assert_eq!(monitor.snapshot(), snapshot);
        assert_eq!(monitor.alert_log().len(), 1);
        assert_eq!(monitor.latest().map(|l| l.timestamp), Some(1000));
    }

    #[test]
    fn test_throttled_updates_latest_only() {
        let config = EngineConfig::throttled();
        let mut monitor = Monitor::new(config).unwrap();

        monitor.ingest(30.0f32, 0);
        let result = monitor.ingest(72.0f32, 5 * MINUTE_MS);

        assert_eq!(result, AdmissionResult::Throttled { value: 72.0 });
        assert_eq!(monitor.buffer().len(), 1);
        assert!(monitor.alert_log().is_empty());

        let latest = monitor.latest().unwrap();
        assert_eq!(latest.value, 72.0);
        assert_eq!(latest.status, Status::High);

        assert!(monitor.ingest(30.0f32, 11 * MINUTE_MS).is_admitted());
        assert_eq!(monitor.buffer().len(), 2);
    }

    #[test]
    fn test_duration_window_evicts_on_admission() {
        let mut monitor = Monitor::default();
        for hour in 0..10u64 {
            monitor.ingest(35.0f32, hour * HOUR_MS);
        }

        let now = 9 * HOUR_MS;
        let cutoff = now - 8 * HOUR_MS;
        let snapshot = monitor.snapshot();
        assert!(snapshot.iter().all(|s| s.timestamp >= cutoff));
        assert_eq!(snapshot.len(), 9);
    }

    #[test]
    fn test_sweep_without_new_readings() {
        let mut monitor = Monitor::default();
        monitor.ingest(35.0f32, 0);
        monitor.ingest(36.0f32, HOUR_MS);

        assert_eq!(monitor.sweep(8 * HOUR_MS), 0);
        assert_eq!(monitor.sweep(8 * HOUR_MS + 1), 1);
        assert_eq!(monitor.sweep(8 * HOUR_MS + 1), 0);
        assert_eq!(monitor.sweep(20 * HOUR_MS), 1);
        assert!(monitor.snapshot().is_empty());
    }

    #[test]
    fn test_unit_suffix_is_admitted() {
        let mut monitor = Monitor::default();
        let result = monitor.ingest("45.2%", 0);

        assert!(result.is_admitted());
        assert_eq!(monitor.snapshot(), [Sample::new(45.2, 0)]);
    }

    #[test]
    fn test_explicit_eviction_publishes() {
        let channel = MonitorChannel::new();
        let mut subscriber = channel.subscriber().unwrap();
        let mut monitor = Monitor::default().with_publisher(channel.immediate_publisher());

        monitor.ingest("30", 1000);
        monitor.ingest("31", 2000);
        monitor.ingest("32", 3000);
        while subscriber.try_next_message_pure().is_some() {}

        assert_eq!(monitor.evict_older_than(2500), 2);
        assert_eq!(
            subscriber.try_next_message_pure(),
            Some(MonitorEvent::Evicted {
                count: 2,
                at: 2500
            })
        );

        assert_eq!(monitor.evict_older_than(2500), 0);
        assert_eq!(subscriber.try_next_message_pure(), None);
        assert_eq!(monitor.snapshot(), [Sample::new(32.0, 3000)]);
    }

    #[test]
    fn test_capacity_window() {
        let mut monitor = Monitor::new(EngineConfig::capacity_window()).unwrap();
        for i in 0..80u64 {
            monitor.ingest(40.0f32, i);
        }

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.len(), 50);
        assert_eq!(snapshot[0].timestamp, 30);
        assert_eq!(monitor.sweep(u64::MAX), 0);
    }

    #[test]
    fn test_alert_cap() {
        let mut monitor = Monitor::default();
        for i in 0..60u64 {
            monitor.ingest(55.0 + (i % 10) as f32, i * 1000);
        }

        let alerts: Vec<&AlertRecord> = monitor.alerts().collect();
        assert_eq!(alerts.len(), 50);
        assert_eq!(alerts[0].timestamp, 59_000);
        assert_eq!(alerts[49].timestamp, 10_000);
        assert!(alerts.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[test]
    fn test_series_and_segments() {
        let mut monitor = Monitor::default();
        monitor.ingest("15", 0);
        monitor.ingest("35", 1000);
        monitor.ingest("61", 2000);

        let statuses: Vec<Status> = monitor.series().iter().map(|p| p.status).collect();
        assert_eq!(statuses, vec![Status::Low, Status::Optimal, Status::High]);

        let segments = monitor.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].status(), Status::Optimal);
        assert_eq!(segments[1].status(), Status::High);
    }

    #[test]
    fn test_stats() {
        let mut monitor = Monitor::default();
        assert_eq!(monitor.stats(), None);

        monitor.ingest(20.0f32, 0);
        monitor.ingest(40.0f32, 1);

        let stats = monitor.stats().unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.avg, 30.0);
    }

    #[test]
    fn test_publishes_events() {
        let channel = MonitorChannel::new();
        let mut subscriber = channel.subscriber().unwrap();
        let mut monitor = Monitor::new(EngineConfig::default().with_retention(
            RetentionPolicy::Duration {
                horizon_ms: HOUR_MS,
            },
        ))
        .unwrap()
        .with_publisher(channel.immediate_publisher());

        monitor.ingest("45", 0);
        monitor.ingest("75", 2 * HOUR_MS);

        let admitted = Sample::new(45.0, 0);
        assert_eq!(
            subscriber.try_next_message_pure(),
            Some(MonitorEvent::Admitted(admitted))
        );
        assert_eq!(
            subscriber.try_next_message_pure(),
            Some(MonitorEvent::Admitted(Sample::new(75.0, 2 * HOUR_MS)))
        );
        assert!(matches!(
            subscriber.try_next_message_pure(),
            Some(MonitorEvent::Alert(AlertRecord { id: 1, .. }))
        ));
        assert_eq!(
            subscriber.try_next_message_pure(),
            Some(MonitorEvent::Evicted {
                count: 1,
                at: 2 * HOUR_MS
            })
        );
        assert_eq!(subscriber.try_next_message_pure(), None);
    }
}
