//! Merging fetched pages into the visible list.
//!
//! ## Algorithm
//! - Replace: the visible list becomes exactly the page's items
//! - Append: the page's items are added after the existing items
//!
//! In both modes the pagination metadata is taken from the newest page.

use crate::page::{Page, PaginationMeta};

/// How a fetched page is merged into the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Fresh query, sort change, filter update, page jump, reset
    Replace,
    /// Incremental "load more"
    Append,
}

/// Visible list plus the metadata of the page that last touched it.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembled<T> {
    pub items: Vec<T>,
    pub pagination: Option<PaginationMeta>,
}

impl<T> Assembled<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            pagination: None,
        }
    }

    /// Merge `page` into the list according to `mode`.
    ///
    /// # Returns
    /// The number of items now visible.
    pub fn merge(&mut self, page: Page<T>, mode: FetchMode) -> usize {
        let Page { items, pagination } = page;
        match mode {
            FetchMode::Replace => self.items = items,
            FetchMode::Append => self.items.extend(items),
        }
        self.pagination = Some(pagination);
        self.items.len()
    }

    pub fn has_next_page(&self) -> bool {
        self.pagination
            .as_ref()
            .is_some_and(PaginationMeta::has_next_page)
    }
}

impl<T> Default for Assembled<T> {
    fn default() -> Self {
        Self::new()
    }
}
