use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::scan::cache::ScanResult;

/// Cumulative per-scheduler scan statistics for debugging/perf tuning.
///
/// Not tied to any metrics backend; callers snapshot and export as needed.
#[derive(Debug, Default)]
pub struct ScanStats {
    queries_issued: AtomicU64,
    queries_succeeded: AtomicU64,
    queries_failed: AtomicU64,
    execution_nanos: AtomicU64,
    result_rows: AtomicUsize,
    result_bytes: AtomicUsize,
}

impl ScanStats {
    pub fn snapshot(&self) -> ScanStatsSnapshot {
        ScanStatsSnapshot {
            queries_issued: self.queries_issued.load(Ordering::Relaxed),
            queries_succeeded: self.queries_succeeded.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
            execution_seconds: nanos_to_seconds_f64(self.execution_nanos.load(Ordering::Relaxed)),
            result_rows: self.result_rows.load(Ordering::Relaxed),
            result_bytes: self.result_bytes.load(Ordering::Relaxed),
        }
    }

    // ----------------- update helpers -----------------

    pub fn on_query_issued(&self) {
        self.queries_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn on_query_succeeded(&self, elapsed: Duration, result: &ScanResult) {
        self.queries_succeeded.fetch_add(1, Ordering::Relaxed);
        self.execution_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
        self.result_rows.fetch_add(result.num_rows(), Ordering::Relaxed);
        self.result_bytes.fetch_add(result.byte_size(), Ordering::Relaxed);
    }

    pub fn on_query_failed(&self) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanStatsSnapshot {
    pub queries_issued: u64,
    pub queries_succeeded: u64,
    pub queries_failed: u64,
    pub execution_seconds: f64,
    pub result_rows: usize,
    pub result_bytes: usize,
}

fn nanos_to_seconds_f64(nanos: u64) -> f64 {
    nanos as f64 / 1_000_000_000.0
}
