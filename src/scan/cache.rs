use std::sync::Arc;

use arrow::record_batch::RecordBatch;

use crate::scan::range::ScanRequest;

/// A completed scan: the request that produced it plus the fetched batches.
///
/// Immutable once constructed; shared as `Arc<ScanResult>` between the cache
/// slot, the notification channel and consumers.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub request: ScanRequest,
    pub batches: Vec<RecordBatch>,
}

impl ScanResult {
    pub fn new(request: ScanRequest, batches: Vec<RecordBatch>) -> Self {
        Self { request, batches }
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    /// In-memory arrow size of all batches.
    pub fn byte_size(&self) -> usize {
        self.batches.iter().map(|b| b.get_array_memory_size()).sum()
    }
}

/// Single-slot cache holding the most recent completed scan.
///
/// A new fetch replaces the slot wholesale; overlapping windows are never
/// merged.
#[derive(Debug, Default)]
pub struct ScanCache {
    slot: Option<Arc<ScanResult>>,
}

impl ScanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sole cache-hit decision point: the cached result iff its request
    /// fully covers `request`.
    pub fn try_satisfy(&self, request: &ScanRequest) -> Option<Arc<ScanResult>> {
        self.slot
            .as_ref()
            .filter(|cached| cached.request.includes_request(request))
            .cloned()
    }

    pub fn store(&mut self, result: Arc<ScanResult>) {
        self.slot = Some(result);
    }

    pub fn current(&self) -> Option<Arc<ScanResult>> {
        self.slot.clone()
    }
}
