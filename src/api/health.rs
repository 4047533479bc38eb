//! Shared counters for the /health endpoint.

use std::sync::atomic::{AtomicU64, Ordering};

/// Updated by `PlayerStats`, read by the API.
#[derive(Default)]
pub struct HealthState {
    /// Stats pages built.
    pub pages_built: AtomicU64,
    /// Requests answered without a page (no players or no stakes).
    pub empty_pages: AtomicU64,
    /// Sites found by the detector at startup.
    pub sites_detected: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_pages_built(&self) {
        self.pages_built.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_empty_pages(&self) {
        self.empty_pages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_sites_detected(&self, n: u64) {
        self.sites_detected.store(n, Ordering::Relaxed);
    }

    pub fn pages_built(&self) -> u64 {
        self.pages_built.load(Ordering::Relaxed)
    }

    pub fn empty_pages(&self) -> u64 {
        self.empty_pages.load(Ordering::Relaxed)
    }

    pub fn sites_detected(&self) -> u64 {
        self.sites_detected.load(Ordering::Relaxed)
    }
}
