//! Page-based pagination for list queries.
//!
//! Both `page` and `limit` come straight from the client, so they are always
//! passed through [`Pagination::normalize`] before reaching a query.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Page size used when the client asks for a non-positive limit.
pub const DEFAULT_LIMIT: i64 = 10;

/// Maximum number of items per page.
pub const MAX_LIMIT: i64 = 100;

/// Normalized pagination parameters.
///
/// A value of `{ page: -1, limit: -1 }` means the query is unbounded: no
/// `LIMIT` and no `OFFSET` are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Pagination {
    /// One-based page number, or `-1` when unbounded.
    pub page: i64,
    /// Page size, or `-1` when unbounded.
    pub limit: i64,
}

impl Pagination {
    /// Pagination that returns every matching row.
    pub const UNBOUNDED: Self = Self {
        page: -1,
        limit: -1,
    };

    /// Normalizes client-supplied paging parameters.
    ///
    /// `(0, 0)` selects [`Pagination::UNBOUNDED`]. Otherwise a non-positive
    /// page becomes `1`, a non-positive limit becomes [`DEFAULT_LIMIT`] and
    /// a limit above [`MAX_LIMIT`] is clamped to it.
    pub fn normalize(page: i64, limit: i64) -> Self {
        if page == 0 && limit == 0 {
            return Self::UNBOUNDED;
        }

        let page = if page <= 0 { 1 } else { page };
        let limit = match limit {
            l if l <= 0 => DEFAULT_LIMIT,
            l if l > MAX_LIMIT => MAX_LIMIT,
            l => l,
        };

        Self { page, limit }
    }

    /// Returns whether paging is disabled for this query.
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.limit < 0
    }

    /// Number of rows to skip.
    #[inline]
    pub fn offset(&self) -> i64 {
        if self.is_unbounded() {
            0
        } else {
            (self.page - 1).saturating_mul(self.limit)
        }
    }

    /// Number of pages needed to hold `total_rows`.
    pub fn total_pages(&self, total_rows: i64) -> i64 {
        match total_rows {
            t if t <= 0 => 0,
            _ if self.is_unbounded() => 1,
            t => (t + self.limit - 1) / self.limit,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::normalize(1, DEFAULT_LIMIT)
    }
}

/// Result of a paginated list query.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Rows on the requested page.
    pub items: Vec<T>,
    /// Count of rows matching the query across all pages.
    pub total_rows: i64,
    /// Pagination the rows were loaded with.
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Creates a new page.
    pub fn new(items: Vec<T>, total_rows: i64, pagination: Pagination) -> Self {
        Self {
            items,
            total_rows,
            pagination,
        }
    }

    /// Number of pages for the query this page belongs to.
    pub fn total_pages(&self) -> i64 {
        self.pagination.total_pages(self.total_rows)
    }

    /// Maps the items to a different type.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_rows: self.total_rows,
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_zero_is_unbounded() {
        let pagination = Pagination::normalize(0, 0);
        assert_eq!(pagination, Pagination { page: -1, limit: -1 });
        assert!(pagination.is_unbounded());
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn limit_is_clamped() {
        for limit in [101, 500, i64::MAX] {
            assert_eq!(Pagination::normalize(1, limit).limit, MAX_LIMIT);
        }
        assert_eq!(Pagination::normalize(3, 100).limit, 100);
    }

    #[test]
    fn non_positive_limit_defaults() {
        assert_eq!(Pagination::normalize(1, 0).limit, DEFAULT_LIMIT);
        assert_eq!(Pagination::normalize(2, -5).limit, DEFAULT_LIMIT);
        assert_eq!(Pagination::normalize(-1, -1).limit, DEFAULT_LIMIT);
    }

    #[test]
    fn non_positive_page_becomes_first() {
        assert_eq!(Pagination::normalize(0, 20).page, 1);
        assert_eq!(Pagination::normalize(-7, 20).page, 1);
        assert_eq!(Pagination::normalize(-1, -1).page, 1);
    }

    #[test]
    fn offset_and_total_pages() {
        let pagination = Pagination::normalize(3, 10);
        assert_eq!(pagination.offset(), 20);
        assert_eq!(pagination.total_pages(0), 0);
        assert_eq!(pagination.total_pages(10), 1);
        assert_eq!(pagination.total_pages(11), 2);
        assert_eq!(Pagination::UNBOUNDED.total_pages(42), 1);
    }
}
