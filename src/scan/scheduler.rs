use std::sync::{Arc, Mutex};
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use tokio::sync::mpsc;

use crate::query::executor::DynQueryExecutor;
use crate::query::sql::{ScanQueryBuilder, SqlScanQueryBuilder};
use crate::scan::cache::{ScanCache, ScanResult};
use crate::scan::config::ScanConfig;
use crate::scan::range::ScanRequest;
use crate::scan::stats::{ScanStats, ScanStatsSnapshot};

/// Single-flight scan scheduler with a last-writer-wins queue.
///
/// Holds at most one in-flight fetch and at most one queued request. Requests
/// already covered by the cache or by the in-flight fetch are dropped;
/// everything else replaces the queued slot. On completion the cache is
/// replaced wholesale, the consumer is notified once, and the queued request
/// (if still uncovered) is promoted.
///
/// Fetches run as spawned tokio tasks, so the scheduler must live inside a
/// runtime. All state transitions are serialized through one lock.
#[derive(Debug, Clone)]
pub struct ScanScheduler {
    inner: Arc<SchedulerInner>,
}

#[derive(Debug)]
struct SchedulerInner {
    config: ScanConfig,
    executor: DynQueryExecutor,
    query_builder: Arc<dyn ScanQueryBuilder>,
    stats: ScanStats,
    state: Mutex<SchedulerState>,
    result_tx: mpsc::UnboundedSender<Arc<ScanResult>>,
    result_rx: Mutex<Option<mpsc::UnboundedReceiver<Arc<ScanResult>>>>,
}

#[derive(Debug, Default)]
struct SchedulerState {
    in_flight: Option<ScanRequest>,
    queued: Option<QueuedScan>,
    cache: ScanCache,
    stopped: bool,
}

#[derive(Debug, Clone)]
struct QueuedScan {
    request: ScanRequest,
    /// Set by `refresh()`: run even if the cache covers the range.
    force: bool,
}

impl ScanScheduler {
    pub fn new(config: ScanConfig, executor: DynQueryExecutor) -> Self {
        Self::with_query_builder(config, executor, Arc::new(SqlScanQueryBuilder))
    }

    pub fn with_query_builder(
        config: ScanConfig,
        executor: DynQueryExecutor,
        query_builder: Arc<dyn ScanQueryBuilder>,
    ) -> Self {
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        Self {
            inner: Arc::new(SchedulerInner {
                config,
                executor,
                query_builder,
                stats: ScanStats::default(),
                state: Mutex::new(SchedulerState::default()),
                result_tx,
                result_rx: Mutex::new(Some(result_rx)),
            }),
        }
    }

    /// Schedule the configured initial request, if any.
    pub fn start(&self) {
        if let Some(initial) = self.inner.config.initial_request.clone() {
            SchedulerInner::request_scan(&self.inner, initial);
        }
    }

    /// Fire-and-forget: the result arrives through the channel from
    /// [`take_results`](Self::take_results), or not at all if the request is
    /// already covered.
    pub fn request_scan(&self, request: ScanRequest) {
        SchedulerInner::request_scan(&self.inner, request);
    }

    /// Re-run the window the consumer currently sees, after the underlying
    /// table changed.
    ///
    /// A queued request already captures the new data; an in-flight request
    /// predates the change and is queued again; otherwise the cached window
    /// is re-fetched.
    pub fn refresh(&self) {
        SchedulerInner::refresh(&self.inner);
    }

    /// Stop the scheduler. The in-flight fetch is not cancelled; its result
    /// is discarded when it lands.
    pub fn stop(&self) {
        let mut state = self.inner.state.lock().unwrap();
        state.stopped = true;
        state.queued = None;
    }

    pub fn current_result(&self) -> Option<Arc<ScanResult>> {
        self.inner.state.lock().unwrap().cache.current()
    }

    /// The notification channel: exactly one message per completed fetch.
    /// Can be taken once.
    pub fn take_results(&self) -> Option<mpsc::UnboundedReceiver<Arc<ScanResult>>> {
        self.inner.result_rx.lock().unwrap().take()
    }

    pub fn stats(&self) -> ScanStatsSnapshot {
        self.inner.stats.snapshot()
    }
}

impl SchedulerInner {
    fn request_scan(this: &Arc<Self>, request: ScanRequest) {
        {
            let mut state = this.state.lock().unwrap();
            if state.stopped {
                return;
            }
            // Served from cache already.
            if state.cache.try_satisfy(&request).is_some() {
                return;
            }
            // The in-flight fetch will cover this request once it lands.
            if state
                .in_flight
                .as_ref()
                .is_some_and(|in_flight| in_flight.includes_request(&request))
            {
                return;
            }
            // Last request wins; a previously queued request is dropped
            // without execution.
            state.queued = Some(QueuedScan { request, force: false });
        }
        Self::schedule_next(this);
    }

    fn refresh(this: &Arc<Self>) {
        {
            let mut state = this.state.lock().unwrap();
            if state.stopped {
                return;
            }
            if state.queued.is_some() {
                // Will observe the new data when it runs.
            } else if let Some(in_flight) = state.in_flight.clone() {
                state.queued = Some(QueuedScan { request: in_flight, force: true });
            } else if let Some(current) = state.cache.current() {
                state.queued = Some(QueuedScan {
                    request: current.request.clone(),
                    force: true,
                });
            } else {
                return;
            }
        }
        Self::schedule_next(this);
    }

    fn schedule_next(this: &Arc<Self>) {
        let request = {
            let mut state = this.state.lock().unwrap();
            if state.stopped || state.in_flight.is_some() {
                return;
            }
            let Some(queued) = state.queued.take() else {
                return;
            };
            // A fetch that landed since this request was queued may already
            // cover it.
            if !queued.force && state.cache.try_satisfy(&queued.request).is_some() {
                return;
            }
            state.in_flight = Some(queued.request.clone());
            queued.request
        };
        Self::spawn_fetch(this, request);
    }

    fn spawn_fetch(this: &Arc<Self>, request: ScanRequest) {
        this.stats.on_query_issued();
        let inner = Arc::clone(this);
        tokio::spawn(async move {
            let query = inner
                .query_builder
                .build_query(&inner.config.target, &request);
            let started = Instant::now();
            match inner.executor.execute_query(&query).await {
                Ok(batches) => Self::finish_fetch(&inner, request, batches, started),
                Err(err) => Self::fail_fetch(&inner, request, err),
            }
        });
    }

    fn finish_fetch(
        this: &Arc<Self>,
        request: ScanRequest,
        batches: Vec<RecordBatch>,
        started: Instant,
    ) {
        let result = Arc::new(ScanResult::new(request, batches));
        {
            let mut state = this.state.lock().unwrap();
            if state.stopped {
                tracing::debug!(
                    table = %this.config.target,
                    "discarding scan result that landed after stop"
                );
                return;
            }
            state.in_flight = None;
            state.cache.store(Arc::clone(&result));
        }
        this.stats.on_query_succeeded(started.elapsed(), &result);
        // Receiver may be gone; the cache still serves current_result.
        let _ = this.result_tx.send(result);
        Self::schedule_next(this);
    }

    fn fail_fetch(this: &Arc<Self>, request: ScanRequest, err: anyhow::Error) {
        {
            let mut state = this.state.lock().unwrap();
            if state.stopped {
                return;
            }
            state.in_flight = None;
            // The cache keeps serving the previous (stale but valid) result.
        }
        this.stats.on_query_failed();
        tracing::error!(
            table = %this.config.target,
            begin = request.begin(),
            end = request.end(),
            "scan query failed: {err:#}"
        );
        // A queued request must not be stranded by the failure.
        Self::schedule_next(this);
    }
}
