use serde::{Deserialize, Serialize};

/// A window of rows described by `offset` + `limit`, widened by `overscan`
/// rows on both sides so small scroll deltas stay inside the fetched range.
///
/// `limit == 0` means unbounded (no limit clause).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanRange {
    /// First logical row index of the visible window.
    pub offset: u64,
    /// Number of visible rows, 0 = unbounded.
    pub limit: u64,
    /// Extra rows fetched on both sides of the visible window.
    pub overscan: u64,
}

impl ScanRange {
    pub fn new(offset: u64, limit: u64, overscan: u64) -> Self {
        Self { offset, limit, overscan }
    }

    /// First row actually fetched (overscan clamped at row 0).
    pub fn begin(&self) -> u64 {
        self.offset.saturating_sub(self.overscan)
    }

    /// One past the last row actually fetched.
    pub fn end(&self) -> u64 {
        self.offset + self.limit + self.overscan
    }

    /// Does this range fully cover `[offset, offset + limit)`?
    ///
    /// An unbounded range covers any offset at or after its begin; a query
    /// for an unbounded range is only covered by another unbounded range.
    pub fn includes_range(&self, offset: u64, limit: u64) -> bool {
        if self.limit == 0 || limit == 0 {
            self.limit == 0 && self.begin() <= offset
        } else {
            self.begin() <= offset && self.end() >= offset + limit
        }
    }

    /// Could this range share any row with `[offset, offset + limit)`?
    ///
    /// Boundary-touching ranges count as intersecting.
    pub fn intersects_range(&self, offset: u64, limit: u64) -> bool {
        if limit == 0 {
            return true;
        }
        if self.limit == 0 {
            return offset + limit > self.begin();
        }
        let b = self.begin();
        let e = self.end();
        (offset >= b && offset + limit <= e)
            || (offset <= b && offset + limit >= b)
            || (offset < e && offset + limit >= e)
    }
}

/// One ORDER BY term of a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderingTerm {
    pub column: String,
    pub descending: bool,
    pub nulls_first: bool,
}

impl OrderingTerm {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self { column: column.into(), descending: false, nulls_first: false }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self { column: column.into(), descending: true, nulls_first: false }
    }

    pub fn with_nulls_first(mut self) -> Self {
        self.nulls_first = true;
        self
    }
}

/// The unit of work a consumer submits: a range plus an optional reservoir
/// sample size and ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanRequest {
    pub range: ScanRange,
    /// Reservoir-sample this many rows from the matched range, 0 = none.
    pub sample: u64,
    pub ordering: Vec<OrderingTerm>,
}

impl ScanRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, offset: u64, limit: u64, overscan: u64) -> Self {
        self.range = ScanRange::new(offset, limit, overscan);
        self
    }

    pub fn with_sample(mut self, sample: u64) -> Self {
        self.sample = sample;
        self
    }

    pub fn with_ordering(mut self, ordering: Vec<OrderingTerm>) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn begin(&self) -> u64 {
        self.range.begin()
    }

    pub fn end(&self) -> u64 {
        self.range.end()
    }

    pub fn includes_range(&self, offset: u64, limit: u64) -> bool {
        self.range.includes_range(offset, limit)
    }

    pub fn intersects_range(&self, offset: u64, limit: u64) -> bool {
        self.range.intersects_range(offset, limit)
    }

    /// Does a result fetched for `self` satisfy `other`?
    ///
    /// Range coverage alone is not enough: sample size and ordering are part
    /// of the cache key, a sampled or differently ordered result never
    /// stands in for another.
    pub fn includes_request(&self, other: &ScanRequest) -> bool {
        self.includes_range(other.range.offset, other.range.limit)
            && self.sample == other.sample
            && self.ordering == other.ordering
    }
}
