// Pipeline metrics module
//
// Lightweight counters for the dispatcher and its analysis tasks

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Process-wide analysis metrics
///
/// Uses atomic operations so analysis tasks can record outcomes without
/// locks. Logged on shutdown.
#[derive(Debug)]
pub struct Metrics {
    /// Requests that passed validation and were handed to an analysis task
    pub requests_dispatched: AtomicU64,

    /// Requests rejected because a path was not configured
    pub requests_rejected: AtomicU64,

    /// Analyses that produced and recorded a score
    pub analyses_completed: AtomicU64,

    /// Analyses aborted by a read, sink or task error
    pub analyses_failed: AtomicU64,

    /// Token occurrences scored across all completed analyses
    pub tokens_scored: AtomicU64,

    /// Total analysis time in milliseconds
    pub total_analysis_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            requests_dispatched: AtomicU64::new(0),
            requests_rejected: AtomicU64::new(0),
            analyses_completed: AtomicU64::new(0),
            analyses_failed: AtomicU64::new(0),
            tokens_scored: AtomicU64::new(0),
            total_analysis_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_dispatched(&self) {
        self.requests_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finished analysis and how much work it did
    pub fn record_completed(&self, tokens: usize, duration: Duration) {
        self.analyses_completed.fetch_add(1, Ordering::Relaxed);
        self.tokens_scored.fetch_add(tokens as u64, Ordering::Relaxed);
        self.total_analysis_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.analyses_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average wall time per completed analysis in milliseconds
    pub fn avg_analysis_time_ms(&self) -> f64 {
        let total = self.total_analysis_time_ms.load(Ordering::Relaxed);
        let count = self.analyses_completed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Analysis Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Requests: {} dispatched, {} rejected",
            self.requests_dispatched.load(Ordering::Relaxed),
            self.requests_rejected.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Analyses: {} completed, {} failed, {} tokens scored",
            self.analyses_completed.load(Ordering::Relaxed),
            self.analyses_failed.load(Ordering::Relaxed),
            self.tokens_scored.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Total analysis time: {:.2}s (avg: {:.2}ms per analysis)",
            self.total_analysis_time_ms.load(Ordering::Relaxed) as f64 / 1000.0,
            self.avg_analysis_time_ms()
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
