use std::sync::Arc;

use anyhow::Result;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;

/// The narrow seam to the host's query engine.
///
/// The scheduler issues at most one outstanding call per instance. No retries
/// and no backpressure here; transport, syntax and semantic failures all
/// surface as the same error.
#[async_trait]
pub trait QueryExecutor: Send + Sync + std::fmt::Debug {
    async fn execute_query(&self, query: &str) -> Result<Vec<RecordBatch>>;
}

pub type DynQueryExecutor = Arc<dyn QueryExecutor>;
