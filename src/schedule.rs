//! Periodic task timing driven by caller-supplied time
//!
//! The retention sweep and the clock refresh run on their own cadences. Each
//! gets its own [`IntervalTimer`]; they share nothing but the time source.

use embassy_time::Duration;

use crate::sample::Timestamp;

/// Period of the retention sweep
pub const SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Period of the clock / current-time display refresh
pub const CLOCK_REFRESH_PERIOD: Duration = Duration::from_secs(1);

/// Fires at most once per period
///
/// The first poll always fires. A poll that arrives late fires once and the
/// next deadline is realigned to the original cadence; missed ticks are not
/// replayed.
#[derive(Debug, Clone, Copy)]
pub struct IntervalTimer {
    period_ms: u64,
    next_due: Option<Timestamp>,
}

impl IntervalTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            // A zero period would fire on every poll without advancing
            period_ms: period.as_millis().max(1),
            next_due: None,
        }
    }

    /// Returns true when the task should run at `now`
    pub fn poll(&mut self, now: Timestamp) -> bool {
        match self.next_due {
            None => {
                self.next_due = Some(now.saturating_add(self.period_ms));
                true
            }
            Some(due) if now >= due => {
                let missed = (now - due) / self.period_ms;
                let advance = (missed + 1).saturating_mul(self.period_ms);
                self.next_due = Some(due.saturating_add(advance));
                true
            }
            Some(_) => false,
        }
    }

    pub fn next_due(&self) -> Option<Timestamp> {
        self.next_due
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}
