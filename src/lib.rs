//! Retention and sampling engine for live relative-humidity streams
//!
//! This crate holds the platform-agnostic core of a humidity monitor: it
//! decides which incoming readings are admitted into history, keeps a bounded
//! time-ordered window of admitted samples, and records alerts when a reading
//! crosses the high threshold. Transport and rendering live outside; they
//! hand raw payloads in and read derived values (status, colors, labels) out.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod alerts;
pub mod buffer;
pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod gate;
pub mod monitor;
pub mod sample;
pub mod schedule;
pub mod stats;
pub mod status;

pub use alerts::{ALERT_LOG_CAPACITY, AlertLog, AlertRecord};
pub use buffer::RetentionBuffer;
pub use config::{EngineConfig, RetentionPolicy};
pub use error::{ConfigError, RejectReason};
pub use gate::{AdmissionResult, IngestGate};
pub use monitor::Monitor;
pub use sample::{Reading, Sample, Timestamp};
pub use status::{Status, Thresholds, classify};
