//! Common types used across the platform.

use serde::{Deserialize, Serialize};

/// Pagination parameters accepted by list endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl Pagination {
    /// Clamp to sane bounds: page >= 1, 1 <= limit <= 100.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, 100),
        }
    }

    pub fn offset(&self) -> i64 {
        ((self.page.max(1) - 1) as i64) * (self.limit as i64)
    }

    pub fn limit(&self) -> i64 {
        self.limit as i64
    }
}

/// Envelope for paginated list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
}

impl<T> PagedResponse<T> {
    pub fn new(items: Vec<T>, pagination: Pagination, total: i64) -> Self {
        let limit = pagination.limit.max(1);
        Self {
            items,
            page: pagination.page,
            limit,
            total,
            pages: (total + limit as i64 - 1) / limit as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_bounds() {
        let p = Pagination { page: 0, limit: 500 }.clamped();
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 100);
    }

    #[test]
    fn paged_response_computes_page_count() {
        let r = PagedResponse::new(vec![1, 2, 3], Pagination { page: 1, limit: 20 }, 41);
        assert_eq!(r.pages, 3);
        assert_eq!(r.total, 41);
    }
}
