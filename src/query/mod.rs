pub mod executor;
pub mod sql;

pub use executor::{DynQueryExecutor, QueryExecutor};
pub use sql::{ScanQueryBuilder, SqlScanQueryBuilder};
