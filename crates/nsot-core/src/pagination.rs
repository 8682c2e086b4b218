// ── Offset pagination ──
//
// Pages are 0-based. The server speaks `limit`/`offset`; the UI speaks
// page numbers. Everything here saturates instead of overflowing.

use serde::{Deserialize, Serialize};

/// `offset = limit * page`.
pub fn offset_for(page: u64, limit: u64) -> u64 {
    limit.saturating_mul(page)
}

/// `ceil(count / limit)`; 0 when either is 0.
pub fn total_pages(count: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    count.div_ceil(limit)
}

/// Pagination metadata recorded from a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageInfo {
    /// Total rows on the server, across all pages.
    pub count: u64,
    /// `None` for unpaginated responses.
    pub limit: Option<u64>,
    pub offset: u64,
}

impl PageInfo {
    /// Page holding `offset`. Unpaginated responses are a single page 0.
    pub fn page(&self) -> u64 {
        match self.limit {
            Some(limit) if limit > 0 => self.offset / limit,
            _ => 0,
        }
    }

    pub fn total_pages(&self) -> u64 {
        match self.limit {
            Some(limit) => total_pages(self.count, limit),
            None => u64::from(self.count > 0),
        }
    }

    /// Whether this response answered exactly `request`.
    pub fn matches(&self, request: PageRequest) -> bool {
        self.limit == Some(request.limit) && self.offset == request.offset()
    }
}

/// A request for page `page` of `limit` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn first(limit: u64) -> Self {
        Self { page: 0, limit }
    }

    pub fn offset(self) -> u64 {
        offset_for(self.page, self.limit)
    }

    /// The following page, clamped to the last of `total` pages.
    #[must_use]
    pub fn next(self, total: u64) -> Self {
        let last = total.saturating_sub(1);
        Self {
            page: self.page.saturating_add(1).min(last),
            ..self
        }
    }

    /// The preceding page, clamped to 0.
    #[must_use]
    pub fn prev(self) -> Self {
        Self {
            page: self.page.saturating_sub(1),
            ..self
        }
    }

    /// Clamp into `[0, total - 1]` (0 when there are no pages).
    #[must_use]
    pub fn clamp(self, total: u64) -> Self {
        Self {
            page: self.page.min(total.saturating_sub(1)),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_limit_times_page() {
        for page in 0..5 {
            assert_eq!(PageRequest { page, limit: 10 }.offset(), 10 * page);
        }
        assert_eq!(offset_for(u64::MAX, 10), u64::MAX);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 10), 10);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn next_and_prev_clamp() {
        let last = PageRequest { page: 2, limit: 10 };
        assert_eq!(last.next(3).page, 2);
        assert_eq!(PageRequest::first(10).prev().page, 0);
        assert_eq!(PageRequest::first(10).next(0).page, 0);
        assert_eq!(PageRequest { page: 9, limit: 10 }.clamp(3).page, 2);
    }

    #[test]
    fn page_info_locates_current_page() {
        let info = PageInfo {
            count: 42,
            limit: Some(10),
            offset: 30,
        };
        assert_eq!(info.page(), 3);
        assert_eq!(info.total_pages(), 5);
        assert!(info.matches(PageRequest { page: 3, limit: 10 }));
        assert!(!info.matches(PageRequest { page: 3, limit: 25 }));
    }

    #[test]
    fn unpaginated_is_one_page() {
        let info = PageInfo {
            count: 3,
            limit: None,
            offset: 0,
        };
        assert_eq!(info.total_pages(), 1);
        assert_eq!(PageInfo::default().total_pages(), 0);
    }
}
