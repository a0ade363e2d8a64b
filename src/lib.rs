pub mod query;
pub mod scan;

pub use query::{DynQueryExecutor, QueryExecutor, ScanQueryBuilder, SqlScanQueryBuilder};
pub use scan::{
    OrderingTerm, ScanCache, ScanConfig, ScanRange, ScanRequest, ScanResult, ScanScheduler,
    ScanStats, ScanStatsSnapshot,
};
