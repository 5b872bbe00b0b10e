//! Page/limit handling shared by list operations.

use campus_common::{AppError, AppResult};
use serde::Serialize;

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Largest row offset the database accepts (`OFFSET` is a signed bigint).
const MAX_OFFSET: u64 = i64::MAX as u64;

/// A validated page request (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build from optional query values. `page` must be >= 1 and `limit` in 1..=100,
    /// and the resulting offset must fit the database's bigint.
    pub fn new(page: Option<u64>, limit: Option<u64>) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);

        if page == 0 {
            return Err(AppError::Validation("page must be at least 1".to_string()));
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        match (page - 1).checked_mul(limit) {
            Some(offset) if offset <= MAX_OFFSET => {}
            _ => return Err(AppError::Validation("page is out of range".to_string())),
        }

        Ok(Self { page, limit })
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    /// Summary for a result set of `total` rows.
    #[must_use]
    pub const fn summarize(&self, total: u64) -> Pagination {
        Pagination {
            current: self.page,
            pages: total.div_ceil(self.limit),
            total,
        }
    }
}

/// Pagination block of list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current: u64,
    pub pages: u64,
    pub total: u64,
}

/// One page of results.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}
