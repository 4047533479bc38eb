//! In-memory histogram of stats page build times.

use std::sync::Mutex;
use std::time::Duration;

use crate::config::{LATENCY_MAX_US, LATENCY_MIN_US};

/// Shared latency stats. `PlayerStats` records, the API reads.
/// Values stored in microseconds.
pub struct LatencyStats {
    inner: Mutex<hdrhistogram::Histogram<u64>>,
}

impl LatencyStats {
    /// 3 significant figures between the configured bounds.
    pub fn new() -> Self {
        let histogram = hdrhistogram::Histogram::new_with_bounds(LATENCY_MIN_US, LATENCY_MAX_US, 3)
            .expect("valid histogram bounds");
        Self {
            inner: Mutex::new(histogram),
        }
    }

    pub fn record(&self, d: Duration) {
        let us = d.as_micros().clamp(u128::from(LATENCY_MIN_US), u128::from(LATENCY_MAX_US)) as u64;
        if let Ok(mut h) = self.inner.lock() {
            let _ = h.record(us);
        }
    }

    /// (p50, p95, p99) in milliseconds. None if no samples.
    pub fn percentiles_ms(&self) -> Option<(f64, f64, f64)> {
        let h = self.inner.lock().ok()?;
        if h.len() == 0 {
            return None;
        }
        let ms = |q: f64| h.value_at_quantile(q) as f64 / 1000.0;
        Some((ms(0.5), ms(0.95), ms(0.99)))
    }

    pub fn len(&self) -> u64 {
        self.inner.lock().map(|h| h.len()).unwrap_or(0)
    }
}

impl Default for LatencyStats {
    fn default() -> Self {
        Self::new()
    }
}
