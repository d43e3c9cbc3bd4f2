//! Data models shared across database access and API handlers.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 20;
const MAX_PER_PAGE: i64 = 100;
const MAX_PAGE: i64 = 1_000;

/// Query parameters for paginated list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PaginationQuery {
    /// Returns the page number clamped to 1..=1000.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE)
    }

    /// Returns the page size clamped to 1..=100.
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    /// Returns the row offset implied by page/per_page.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: None,
            per_page: None,
        }
    }
}

/// Wrapper for paginated API responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedResponse<T: Serialize> {
    pub page: i64,
    pub per_page: i64,
    /// Total number of records matching the query.
    pub total: i64,
    pub items: Vec<T>,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(page: i64, per_page: i64, total: i64, items: Vec<T>) -> Self {
        Self {
            page,
            per_page,
            total,
            items,
        }
    }
}

pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod section;
pub mod session;
pub mod user;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_query_applies_defaults() {
        let query = PaginationQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 20);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn pagination_query_clamps_out_of_range_values() {
        let query = PaginationQuery {
            page: Some(0),
            per_page: Some(999),
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 100);

        let query = PaginationQuery {
            page: Some(5),
            per_page: Some(10),
        };
        assert_eq!(query.offset(), 40);
    }
}
