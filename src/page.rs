//! Listing pagination.

use serde::Serialize;

/// A 1-indexed page request with a clamped page size.
#[derive(Clone, Copy, Debug)]
pub struct Page {
    page: u32,
    limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 20;
    pub const MAX_LIMIT: u32 = 100;

    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn number(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// A page of visible rows. `total` counts only visible rows, so clients can
/// derive page counts without ever seeing hidden entities.
#[derive(Clone, Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn empty(page: Page) -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: page.number(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_page_minus_one_times_limit() {
        let page = Page::new(Some(3), Some(25));
        assert_eq!(page.offset(), 50);
        assert_eq!(page.limit(), 25);
    }

    #[test]
    fn test_defaults_and_clamping() {
        let page = Page::new(None, None);
        assert_eq!(page.number(), 1);
        assert_eq!(page.limit(), i64::from(Page::DEFAULT_LIMIT));
        assert_eq!(page.offset(), 0);

        assert_eq!(Page::new(Some(0), Some(0)).number(), 1);
        assert_eq!(Page::new(Some(0), Some(0)).limit(), 1);
        assert_eq!(Page::new(Some(2), Some(500)).limit(), i64::from(Page::MAX_LIMIT));
    }
}
