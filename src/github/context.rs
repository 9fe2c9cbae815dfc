use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every fetch and walk step of a single run.
///
/// A fresh context is created per run and shared behind an `Arc`, so the
/// counters never leak from one dashboard refresh into the next.
#[derive(Debug)]
pub struct RunContext {
    requests: AtomicU64,
    tasks: AtomicU64,
    // u64::MAX means no rate-limit header has been observed yet
    min_rate_limit: AtomicU64,
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            tasks: AtomicU64::new(0),
            min_rate_limit: AtomicU64::new(u64::MAX),
        }
    }

    /// Count one HTTP attempt, successful or not.
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Count the units of work scheduled at one fan-out level.
    pub fn record_tasks(&self, count: usize) {
        self.tasks.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record an observed `X-RateLimit-Remaining` value. The stored value
    /// only ever decreases.
    pub fn observe_rate_limit(&self, remaining: u64) {
        self.min_rate_limit.fetch_min(remaining, Ordering::Relaxed);
    }

    pub fn total_requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn total_tasks(&self) -> u64 {
        self.tasks.load(Ordering::Relaxed)
    }

    /// Lowest remaining quota seen during the run, if any response carried
    /// the header.
    pub fn rate_limit(&self) -> Option<u64> {
        match self.min_rate_limit.load(Ordering::Relaxed) {
            u64::MAX => None,
            value => Some(value),
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
