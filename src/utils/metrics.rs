//! Gate Metrics
//!
//! Atomic counters for the verdicts a gate hands out. Each gate owns its own
//! set so tests and differently-configured gates in one process stay apart.

use crate::protocol::accept::Verdict;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Verdict counters for one gate
#[derive(Debug)]
pub struct GateMetrics {
    /// Headers passed on for full processing
    pub accepted: AtomicU64,
    /// Requests answered with FORMERR
    pub rejected: AtomicU64,
    /// Responses dropped without reply
    pub ignored: AtomicU64,
    /// Messages too short to hold a header
    pub undecodable: AtomicU64,
    start_time: Instant,
}

impl GateMetrics {
    pub fn new() -> Self {
        Self {
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            ignored: AtomicU64::new(0),
            undecodable: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record one verdict
    #[inline]
    pub fn record(&self, verdict: Verdict) {
        let counter = match verdict {
            Verdict::Accept => &self.accepted,
            Verdict::Reject => &self.rejected,
            Verdict::Ignore => &self.ignored,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a message that never reached the decision
    pub fn undecodable(&self) {
        self.undecodable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            undecodable: self.undecodable.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            accepted = snapshot.accepted,
            rejected = snapshot.rejected,
            ignored = snapshot.ignored,
            undecodable = snapshot.undecodable,
            uptime_seconds = snapshot.uptime_seconds,
            "Accept gate metrics snapshot"
        );
    }
}

impl Default for GateMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub accepted: u64,
    pub rejected: u64,
    pub ignored: u64,
    pub undecodable: u64,
    pub uptime_seconds: u64,
}

impl MetricsSnapshot {
    /// Every message seen, decodable or not
    pub fn total(&self) -> u64 {
        self.accepted + self.rejected + self.ignored + self.undecodable
    }
}
