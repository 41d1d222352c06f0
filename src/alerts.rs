//! Alert records and the capped alert log

use core::fmt::Display;

use heapless::Deque;
use serde::{Deserialize, Serialize};

use crate::sample::Timestamp;

/// Number of alert records retained
pub const ALERT_LOG_CAPACITY: usize = 50;

/// A reading that exceeded the alert threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Unique, monotonically increasing; independent of the timestamp so
    /// bursts within one millisecond stay distinguishable
    pub id: u64,
    pub value: f32,
    pub timestamp: Timestamp,
}

impl Display for AlertRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "[Alert #{}] timestamp: {}, humidity: {:.1}%",
            self.id, self.timestamp, self.value
        )
    }
}

/// Newest-first log of the most recent alerts
///
/// Once full, recording a new alert silently drops the oldest one.
#[derive(Debug, Default)]
pub struct AlertLog {
    records: Deque<AlertRecord, ALERT_LOG_CAPACITY>,
}

impl AlertLog {
    pub const fn new() -> Self {
        Self {
            records: Deque::new(),
        }
    }

    pub fn record(&mut self, alert: AlertRecord) {
        if self.records.is_full() {
            self.records.pop_back();
        }
        let _ = self.records.push_front(alert);
    }

    /// Iterate records, newest first
    pub fn iter(&self) -> impl Iterator<Item = &AlertRecord> {
        self.records.iter()
    }

    pub fn latest(&self) -> Option<&AlertRecord> {
        self.records.front()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn alert(id: u64) -> AlertRecord {
        AlertRecord {
            id,
            value: 60.0,
            timestamp: id * 1000,
        }
    }

    #[test]
    fn test_newest_first() {
        let mut log = AlertLog::new();
        log.record(alert(1));
        log.record(alert(2));
        log.record(alert(3));

        let ids: Vec<u64> = log.iter().map(|a| a.id).collect();
        assert_eq!(ids, [3, 2, 1]);
        assert_eq!(log.latest().map(|a| a.id), Some(3));
    }

    #[test]
    fn test_alert_cap() {
        let mut log = AlertLog::new();
        for id in 1..=60 {
            log.record(alert(id));
        }

        assert_eq!(log.len(), ALERT_LOG_CAPACITY);
        let ids: Vec<u64> = log.iter().map(|a| a.id).collect();
        let expected: Vec<u64> = (11..=60).rev().collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_clear() {
        let mut log = AlertLog::new();
        log.record(alert(1));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.latest(), None);
    }
}
