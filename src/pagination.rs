//! This modules defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// The number of expenses per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a request may ask for. Larger requests are
    /// clamped to this size.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl PaginationConfig {
    /// Turn the optional `page` and `limit` of a request into a [Pagination].
    ///
    /// # Errors
    /// Returns an [Error::Validation] if `page` or `limit` is zero.
    pub fn resolve(&self, page: Option<u64>, limit: Option<u64>) -> Result<Pagination, Error> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(Error::validation("page", "page must be at least 1"));
        }

        let limit = limit.unwrap_or(self.default_page_size);
        if limit == 0 {
            return Err(Error::validation("limit", "limit must be greater than 0"));
        }

        Ok(Pagination {
            page,
            limit: limit.min(self.max_page_size.max(1)),
        })
    }
}

/// Which page of results to fetch.
///
/// Pages are numbered from one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// The one-based page number.
    pub page: u64,
    /// The maximum number of items per page, at least one.
    pub limit: u64,
}

impl Pagination {
    /// The number of items before the first item of this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// The number of pages needed to show `count` items.
    pub fn page_count(&self, count: u64) -> u64 {
        count.div_ceil(self.limit.max(1))
    }
}
