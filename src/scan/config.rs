use serde::{Deserialize, Serialize};

use crate::scan::range::ScanRequest;

/// Configuration for a scan scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// The table or view scanned.
    pub target: String,
    /// Scheduled by `start()`, before any consumer request arrives.
    pub initial_request: Option<ScanRequest>,
}

impl ScanConfig {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            initial_request: None,
        }
    }

    pub fn with_initial_request(mut self, request: ScanRequest) -> Self {
        self.initial_request = Some(request);
        self
    }
}
