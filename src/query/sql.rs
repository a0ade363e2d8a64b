use std::fmt::Write as _;

use crate::scan::range::ScanRequest;

/// Renders the fetch query for a scan request.
///
/// Injected into the scheduler so hosts with a different SQL surface can
/// swap the query text without touching the range algebra or scheduling.
pub trait ScanQueryBuilder: Send + Sync + std::fmt::Debug {
    fn build_query(&self, target: &str, request: &ScanRequest) -> String;
}

/// Default builder emitting DuckDB-flavored SQL:
/// `SELECT * FROM <target>[ ORDER BY ...][ OFFSET ...][ LIMIT ...][ USING SAMPLE RESERVOIR (n ROWS)]`.
///
/// The emitted bounds are the overscanned `[begin, end)`, not the raw
/// requested window: overscan must be reflected in the fetch for the cache
/// to absorb scroll deltas.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlScanQueryBuilder;

impl ScanQueryBuilder for SqlScanQueryBuilder {
    fn build_query(&self, target: &str, request: &ScanRequest) -> String {
        let begin = request.begin();
        let width = request.end() - begin;

        let mut query = format!("SELECT * FROM {target}");
        if !request.ordering.is_empty() {
            let clauses: Vec<String> = request
                .ordering
                .iter()
                .map(|term| {
                    let mut clause = term.column.clone();
                    if term.descending {
                        clause.push_str(" DESC");
                    }
                    if term.nulls_first {
                        clause.push_str(" NULLS FIRST");
                    }
                    clause
                })
                .collect();
            let _ = write!(query, " ORDER BY {}", clauses.join(","));
        }
        if request.range.offset > 0 {
            let _ = write!(query, " OFFSET {begin}");
        }
        if request.range.limit > 0 {
            let _ = write!(query, " LIMIT {width}");
        }
        if request.sample > 0 {
            let _ = write!(query, " USING SAMPLE RESERVOIR ({} ROWS)", request.sample);
        }
        query
    }
}
