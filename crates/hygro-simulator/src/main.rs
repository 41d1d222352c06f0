//! Desktop simulator for the hygro-rs humidity monitor.
//!
//! Feeds a synthetic relative-humidity stream through the engine on an
//! accelerated clock and logs what the chart and the alert list would show.
//! It stands in for both the broker subscription and the renderer, neither of
//! which belongs to the engine.
//!
//! # Environment
//!
//! | Variable           | Effect                                          |
//! |--------------------|-------------------------------------------------|
//! | `HYGRO_PRESET`     | `duration` (default), `capacity` or `throttled` |
//! | `HYGRO_SIM_HOURS`  | Simulated hours to run (default 12)             |
//! | `HYGRO_UTC_OFFSET` | Minutes added to UTC for time labels            |
//! | `RUST_LOG`         | Log filter (default `info`)                     |

use std::str::FromStr;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use log::{debug, error, info, warn};

use hygro_rs::display::{format_reading, time_label};
use hygro_rs::events::{MonitorChannel, MonitorEvent};
use hygro_rs::schedule::{CLOCK_REFRESH_PERIOD, IntervalTimer, SWEEP_PERIOD};
use hygro_rs::{AdmissionResult, EngineConfig, Monitor, Status, Timestamp};

// ---------------------------------------------------------------------------
// Simulation constants
// ---------------------------------------------------------------------------

/// Real time spent per simulated step.
const FRAME_DURATION: Duration = Duration::from_millis(5);

/// Simulated time between two incoming readings.
const SIM_STEP_MS: u64 = 20 * 1000;

const HOUR_MS: u64 = 60 * 60 * 1000;

const DEFAULT_SIM_HOURS: u64 = 12;

/// Every Nth payload is malformed, the way a flaky publisher would send it.
const GARBAGE_EVERY: u64 = 41;

/// Alerts listed in the final report.
const REPORT_ALERTS: usize = 5;

// ---------------------------------------------------------------------------
// Mock data generation
// ---------------------------------------------------------------------------

/// Generates synthetic humidity payloads that drift through all three bands.
struct MockHumiditySource {
    /// Simulated seconds since start.
    elapsed_secs: f64,
    sent: u64,
}

impl MockHumiditySource {
    fn new() -> Self {
        Self {
            elapsed_secs: 0.0,
            sent: 0,
        }
    }

    /// Advance the internal clock and return the next textual payload.
    fn next_payload(&mut self, dt_secs: f64) -> String {
        self.elapsed_secs += dt_secs;
        self.sent += 1;

        if self.sent % GARBAGE_EVERY == 0 {
            return "n/a".into();
        }

        let t = self.elapsed_secs;
        // Roughly 10-60 %: dips below the band and climbs above it every few hours
        let humidity = 35.0 + 22.0 * (t / 5400.0).sin() + 3.0 * (t / 700.0).cos();
        format!("{humidity:.2}")
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

fn config_from_env() -> EngineConfig {
    match std::env::var("HYGRO_PRESET").as_deref() {
        Ok("capacity") => EngineConfig::capacity_window(),
        Ok("throttled") => EngineConfig::throttled(),
        Ok("duration") | Err(_) => EngineConfig::duration_window(),
        Ok(other) => {
            warn!("Unknown preset {other:?}, using duration");
            EngineConfig::duration_window()
        }
    }
}

fn env_number<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Counters {
    admitted: u64,
    throttled: u64,
    rejected: u64,
}

/// Log what the chart would currently show.
fn log_chart_summary(monitor: &Monitor<'_>, now: Timestamp, utc_offset: i32) {
    let series = monitor.series();
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        info!("[{}] Chart: no data", time_label(now, utc_offset));
        return;
    };

    let band = monitor.optimal_band();
    let outside = series
        .iter()
        .filter(|point| point.status != Status::Optimal)
        .count();

    info!(
        "[{}] Chart: {} points {}..{}, {} outside {:.0}-{:.0}%",
        time_label(now, utc_offset),
        series.len(),
        time_label(first.timestamp, utc_offset),
        time_label(last.timestamp, utc_offset),
        outside,
        band.low,
        band.high
    );

    if let Some(stats) = monitor.stats() {
        info!(
            "        min {} / avg {} / max {} ({})",
            format_reading(stats.min),
            format_reading(stats.avg),
            format_reading(stats.max),
            stats.status(&monitor.config().thresholds).label()
        );
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config_from_env();
    let sim_hours: u64 = env_number("HYGRO_SIM_HOURS", DEFAULT_SIM_HOURS);
    let utc_offset: i32 = env_number("HYGRO_UTC_OFFSET", 0);

    info!("Starting hygro-rs simulator");
    info!("Simulating {} h in steps of {} s", sim_hours, SIM_STEP_MS / 1000);

    let channel = MonitorChannel::new();
    let mut alert_feed = match channel.subscriber() {
        Ok(subscriber) => subscriber,
        Err(e) => {
            error!("Failed to subscribe to monitor events: {:?}", e);
            return;
        }
    };

    let mut monitor = match Monitor::new(config) {
        Ok(monitor) => monitor.with_publisher(channel.immediate_publisher()),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let start: Timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as Timestamp;
    let end = start + sim_hours * HOUR_MS;

    let mut source = MockHumiditySource::new();
    let mut sweep_timer = IntervalTimer::new(SWEEP_PERIOD);
    let mut clock_timer = IntervalTimer::new(CLOCK_REFRESH_PERIOD);
    let mut counters = Counters::default();
    let mut reported_hours = 0;
    let mut now = start;

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    while now < end {
        let frame_start = Instant::now();

        // --- Incoming reading ---------------------------------------------
        let payload = source.next_payload(SIM_STEP_MS as f64 / 1000.0);
        match monitor.ingest(payload.as_str(), now) {
            AdmissionResult::Admitted { sample, .. } => {
                counters.admitted += 1;
                debug!("{}", sample);
            }
            AdmissionResult::Throttled { value } => {
                counters.throttled += 1;
                debug!("Throttled {}", format_reading(value));
            }
            AdmissionResult::Rejected(reason) => {
                counters.rejected += 1;
                warn!("Dropped payload {:?}: {}", payload, reason);
            }
        }

        // --- Alert list ---------------------------------------------------
        while let Some(event) = alert_feed.try_next_message_pure() {
            match event {
                MonitorEvent::Alert(alert) => {
                    warn!("{} at {}", alert, time_label(alert.timestamp, utc_offset));
                }
                MonitorEvent::Evicted { count, at } => {
                    debug!("Evicted {} samples at {}", count, time_label(at, utc_offset));
                }
                MonitorEvent::Admitted(_) => {}
            }
        }

        // --- Periodic tasks -----------------------------------------------
        if sweep_timer.poll(now) {
            monitor.sweep(now);
        }

        if clock_timer.poll(now)
            && let Some(latest) = monitor.latest()
        {
            debug!(
                "[{}] Current {} ({})",
                time_label(now, utc_offset),
                format_reading(latest.value),
                latest.status.label()
            );
        }

        let hours = (now - start) / HOUR_MS;
        if hours > reported_hours {
            reported_hours = hours;
            log_chart_summary(&monitor, now, utc_offset);
        }

        now += SIM_STEP_MS;

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    log_chart_summary(&monitor, now, utc_offset);
    info!(
        "Readings: {} admitted, {} throttled, {} rejected",
        counters.admitted, counters.throttled, counters.rejected
    );
    info!("Alerts retained: {}", monitor.alert_log().len());
    for alert in monitor.alerts().take(REPORT_ALERTS) {
        info!("  {}", alert);
    }

    info!("Simulator exiting");
}
