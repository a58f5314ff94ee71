//! Page arithmetic shared by every list operation.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: i64 = 10;

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}

/// Requested page. Out-of-range values are corrected by [`Pagination::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Resolved position within a result set. `start`/`end` are 1-based row
/// numbers for display; `start` is 0 when nothing matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub start: i64,
    pub end: i64,
    #[serde(skip)]
    pub offset: i64,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Pagination { page, per_page }
    }

    pub fn resolve(&self, total: i64) -> PageInfo {
        let mut page = if self.page < 1 { 1 } else { self.page };
        let per_page = if self.per_page < 1 { DEFAULT_PER_PAGE } else { self.per_page };
        let total = total.max(0);

        let total_pages = (total + per_page - 1) / per_page;
        if page > total_pages && total > 0 {
            page = total_pages;
        }

        let offset = (page - 1) * per_page;
        let start = if total == 0 { 0 } else { offset + 1 };
        let end = (offset + per_page).min(total);

        PageInfo {
            total,
            page,
            per_page,
            total_pages,
            start,
            end,
            offset,
        }
    }
}

/// One page of records plus its position.
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    #[serde(flatten)]
    pub page: PageInfo,
}
