//! In-memory event fan-out from the monitor to its consumers
//!
//! The monitor can publish what it does to a pub-sub channel so the chart,
//! the alert list and any logger each read at their own pace. Publishing is
//! immediate: it never waits, and a lagging subscriber loses the oldest
//! messages rather than stalling ingestion.
//!
//! ```rust,ignore
//! let channel = MonitorChannel::new();
//! let mut alerts = channel.subscriber().unwrap();
//! let mut monitor = Monitor::default().with_publisher(channel.immediate_publisher());
//!
//! monitor.ingest("61.5", now);
//! while let Some(event) = alerts.try_next_message_pure() { ... }
//! ```

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::pubsub::{ImmediatePublisher, PubSubChannel, Subscriber};

use crate::alerts::AlertRecord;
use crate::sample::{Sample, Timestamp};

/// Channel capacity for pub-sub events
pub const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Number of subscribers that can listen to monitor events
/// - Subscriber 0: chart renderer
/// - Subscriber 1: alert log display
pub const EVENT_SUBSCRIBERS: usize = 2;

/// Number of counted publishers; the monitor uses an uncounted immediate one
pub const EVENT_PUBLISHERS: usize = 1;

/// Events published by the monitor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonitorEvent {
    /// A sample entered the retention buffer
    Admitted(Sample),
    /// An admitted sample crossed the alert threshold
    Alert(AlertRecord),
    /// Retention evicted samples
    Evicted { count: usize, at: Timestamp },
}

/// Event channel; single-threaded, so no locking
pub type MonitorChannel = PubSubChannel<
    NoopRawMutex,
    MonitorEvent,
    EVENT_CHANNEL_CAPACITY,
    EVENT_SUBSCRIBERS,
    EVENT_PUBLISHERS,
>;

pub type MonitorPublisher<'a> = ImmediatePublisher<
    'a,
    NoopRawMutex,
    MonitorEvent,
    EVENT_CHANNEL_CAPACITY,
    EVENT_SUBSCRIBERS,
    EVENT_PUBLISHERS,
>;

pub type MonitorSubscriber<'a> = Subscriber<
    'a,
    NoopRawMutex,
    MonitorEvent,
    EVENT_CHANNEL_CAPACITY,
    EVENT_SUBSCRIBERS,
    EVENT_PUBLISHERS,
>;
