//! Process-wide counters and latency samples
//!
//! Nothing here is exported over the network. The binary dumps a
//! [`Snapshot`] into the debug log when a command finishes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Metric names used across the workspace
pub mod names {
    pub const CACHE_HIT: &str = "tournament.cache.hit";
    pub const CACHE_MISS: &str = "tournament.cache.miss";
    pub const LOCALE_FALLBACK: &str = "cms.locale_fallback";
    pub const ENTRY_DROPPED: &str = "cms.entry_dropped";
    pub const REQUEST_LATENCY: &str = "http.request_ms";
}

/// Counters and millisecond samples keyed by metric name
pub struct Metrics {
    counters: RwLock<BTreeMap<&'static str, AtomicU64>>,
    samples: Mutex<BTreeMap<&'static str, Vec<f64>>>,
    created: Instant,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self {
            counters: RwLock::new(BTreeMap::new()),
            samples: Mutex::new(BTreeMap::new()),
            created: Instant::now(),
        }
    }

    /// Add one to `name`
    pub fn increment(&self, name: &'static str) {
        self.add(name, 1);
    }

    /// Add `amount` to `name`
    pub fn add(&self, name: &'static str, amount: u64) {
        // Fast path: the counter already exists, a shared lock is enough.
        {
            let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(counter) = counters.get(name) {
                counter.fetch_add(amount, Ordering::Relaxed);
                return;
            }
        }
        self.counters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name)
            .or_default()
            .fetch_add(amount, Ordering::Relaxed);
    }

    /// Current value of `name`, zero when never touched
    pub fn count(&self, name: &str) -> u64 {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        counters.get(name).map_or(0, |c| c.load(Ordering::Relaxed))
    }

    /// Record one duration sample under `name`
    pub fn observe(&self, name: &'static str, elapsed: Duration) {
        self.samples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name)
            .or_default()
            .push(elapsed.as_secs_f64() * 1000.0);
    }

    /// Point-in-time copy of everything recorded so far
    pub fn snapshot(&self) -> Snapshot {
        let counters = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, c)| ((*name).to_string(), c.load(Ordering::Relaxed)))
            .collect();
        let latencies = self
            .samples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, values)| ((*name).to_string(), Summary::of(values)))
            .collect();

        Snapshot {
            session_id: crate::session_id().to_string(),
            taken_at: Utc::now(),
            uptime_secs: self.created.elapsed().as_secs(),
            counters,
            latencies,
        }
    }

    /// [`Self::snapshot`] as a JSON value
    pub fn export_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or(serde_json::Value::Null)
    }
}

/// Serializable view of [`Metrics`]
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub session_id: String,
    pub taken_at: DateTime<Utc>,
    pub uptime_secs: u64,
    pub counters: BTreeMap<String, u64>,
    pub latencies: BTreeMap<String, Summary>,
}

/// Distribution of one latency metric, in milliseconds
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
}

impl Summary {
    #[allow(clippy::cast_precision_loss)]
    fn of(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Self::default();
        };

        Self {
            count: sorted.len(),
            min,
            max,
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
            p50: nearest_rank(&sorted, 0.50),
            p95: nearest_rank(&sorted, 0.95),
        }
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn nearest_rank(sorted: &[f64], quantile: f64) -> f64 {
    let last = sorted.len().saturating_sub(1);
    let rank = (quantile * last as f64).round() as usize;
    sorted.get(rank.min(last)).copied().unwrap_or_default()
}

/// Measures one operation and records it on drop or [`Timer::stop`]
pub struct Timer {
    name: &'static str,
    started: Instant,
    recorded: bool,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            started: Instant::now(),
            recorded: false,
        }
    }

    /// Record the elapsed time and return it
    pub fn stop(mut self) -> Duration {
        self.record()
    }

    fn record(&mut self) -> Duration {
        let elapsed = self.started.elapsed();
        if !self.recorded {
            self.recorded = true;
            crate::metrics().observe(self.name, elapsed);
        }
        elapsed
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.record();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = Metrics::new();
        metrics.increment(names::CACHE_HIT);
        metrics.increment(names::CACHE_HIT);
        metrics.add(names::CACHE_HIT, 3);

        assert_eq!(metrics.count(names::CACHE_HIT), 5);
        assert_eq!(metrics.count(names::CACHE_MISS), 0);
    }

    #[test]
    fn test_summary() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let summary = Summary::of(&values);

        assert_eq!(summary.count, 10);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 10.0);
        assert_eq!(summary.mean, 5.5);
        assert_eq!(summary.p95, 10.0);
        assert_eq!(Summary::of(&[]), Summary::default());
    }

    #[test]
    fn test_snapshot_json() {
        let metrics = Metrics::new();
        metrics.increment(names::LOCALE_FALLBACK);
        metrics.observe(names::REQUEST_LATENCY, Duration::from_millis(12));

        let json = metrics.export_json();
        assert_eq!(json["counters"][names::LOCALE_FALLBACK], 1);
        assert_eq!(json["latencies"][names::REQUEST_LATENCY]["count"], 1);
        assert_eq!(json["session_id"], crate::session_id());
    }

    #[test]
    fn test_timer_records_once() {
        let timer = Timer::start("test.timer_records_once");
        std::thread::sleep(Duration::from_millis(5));
        let elapsed = timer.stop();

        assert!(elapsed >= Duration::from_millis(5));
        let json = crate::metrics().export_json();
        assert_eq!(json["latencies"]["test.timer_records_once"]["count"], 1);
    }
}
