//! Result pages returned by a search service.

use serde::{Deserialize, Serialize};

/// Pagination metadata for one fetched page.
///
/// Totals are query-invariant: every page fetched for the same filter-set
/// reports the same `total_pages` and `total_items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

impl PaginationMeta {
    pub fn new(current_page: u32, total_pages: u32, total_items: u64) -> Self {
        Self {
            current_page,
            total_pages,
            total_items,
        }
    }

    /// Derive metadata from a total item count and a page size.
    ///
    /// An empty result still has zero pages, so `has_next_page` is false.
    pub fn from_totals(current_page: u32, limit: u32, total_items: u64) -> Self {
        let limit = u64::from(limit.max(1));
        let total_pages = total_items.div_ceil(limit);
        Self {
            current_page,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            total_items,
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// One fetch's worth of items plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in the order returned by the service
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: PaginationMeta) -> Self {
        Self { items, pagination }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_next_page() {
        assert!(PaginationMeta::new(1, 5, 42).has_next_page());
        assert!(!PaginationMeta::new(5, 5, 42).has_next_page());
        assert!(!PaginationMeta::new(1, 0, 0).has_next_page());
    }

    #[test]
    fn test_from_totals_rounds_up() {
        let meta = PaginationMeta::from_totals(1, 10, 42);
        assert_eq!(meta.total_pages, 5);
        assert_eq!(meta.total_items, 42);

        let exact = PaginationMeta::from_totals(2, 10, 20);
        assert_eq!(exact.total_pages, 2);
        assert!(!exact.has_next_page());
    }

    #[test]
    fn test_from_totals_empty() {
        let meta = PaginationMeta::from_totals(1, 10, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page());
    }

    #[test]
    fn test_pagination_meta_wire_format() {
        let meta: PaginationMeta =
            serde_json::from_str(r#"{"currentPage":1,"totalPages":5,"totalItems":42}"#).unwrap();
        assert_eq!(meta, PaginationMeta::new(1, 5, 42));
    }
}
