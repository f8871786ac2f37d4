//! Statistics gathered by the control loop during a crawl
//!
//! These counters are owned by the coordinator and only ever touched from the
//! control loop, so they need no synchronization.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// Wall-clock time the deadline was armed
    pub started_at: DateTime<Utc>,

    /// Time spent in the control loop
    pub elapsed: Duration,

    /// Number of distinct URLs printed
    pub urls_seen: u64,

    /// Number of fetch tasks spawned
    pub fetches_spawned: u64,

    /// Number of result batches consumed by the control loop
    pub batches_received: u64,

    /// Number of fetch tasks that posted an empty batch because the GET failed
    pub fetch_failures: u64,

    /// Number of discovered URLs skipped because robots.txt disallows them
    pub disallowed_skipped: u64,

    /// Number of discovered URLs skipped because they were already seen
    pub duplicates_skipped: u64,

    /// Highest number of tokens observed in use when a batch arrived
    pub peak_in_flight: usize,
}

impl CrawlStats {
    /// Creates empty statistics stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
            urls_seen: 0,
            fetches_spawned: 0,
            batches_received: 0,
            fetch_failures: 0,
            disallowed_skipped: 0,
            duplicates_skipped: 0,
            peak_in_flight: 0,
        }
    }

    /// Records the number of tokens currently in use, keeping the maximum
    pub fn observe_in_flight(&mut self, in_flight: usize) {
        self.peak_in_flight = self.peak_in_flight.max(in_flight);
    }

    /// Fetch tasks completed per second of crawl time
    pub fn fetch_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            // The seed batch is not a fetch
            self.batches_received.saturating_sub(1) as f64 / secs
        } else {
            0.0
        }
    }

    /// Logs a summary of the crawl to the diagnostics stream
    pub fn log_summary(&self) {
        tracing::info!(
            "Crawl finished: {} URLs seen, {} fetches spawned, {} failed, in {:?} (started {})",
            self.urls_seen,
            self.fetches_spawned,
            self.fetch_failures,
            self.elapsed,
            self.started_at.to_rfc3339()
        );
        tracing::info!(
            "Skipped {} disallowed and {} duplicate URLs; peak {} fetches in flight, {:.2} fetches/sec",
            self.disallowed_skipped,
            self.duplicates_skipped,
            self.peak_in_flight,
            self.fetch_rate()
        );
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}
