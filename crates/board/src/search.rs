//! Matching, ordering and paging shared by the in-memory search services.

use std::cmp::Ordering;

use listing::{Page, PageRequest, PaginationMeta, SearchError, SortOrder};

/// Largest page size the in-memory services accept by default.
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// HTTP-style status used when a request is rejected.
const BAD_REQUEST: u16 = 400;

/// Lowercased text filter, prepared once per search.
#[derive(Debug, Clone)]
pub(crate) struct TextFilter(Option<String>);

impl TextFilter {
    pub(crate) fn new(value: Option<&str>) -> Self {
        Self(value.map(str::to_lowercase))
    }

    /// True if the filter is unset or `haystack` contains it, ignoring case.
    pub(crate) fn matches(&self, haystack: &str) -> bool {
        match &self.0 {
            Some(needle) => haystack.to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }

    /// True if the filter is unset or any of `haystacks` contains it.
    pub(crate) fn matches_any<'a>(&self, haystacks: impl IntoIterator<Item = &'a str>) -> bool {
        if self.0.is_none() {
            return true;
        }
        haystacks.into_iter().any(|h| self.matches(h))
    }
}

/// Reject page sizes outside `1..=max_page_size`.
pub(crate) fn check_page_size(limit: u32, max_page_size: u32) -> Result<(), SearchError> {
    if limit == 0 || limit > max_page_size {
        return Err(SearchError::rejected(
            BAD_REQUEST,
            format!("Page size must be between 1 and {max_page_size}, got {limit}"),
        ));
    }
    Ok(())
}

/// Apply a sort direction to an ascending comparison.
pub(crate) fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Case-insensitive string comparison for name/title sorts.
pub(crate) fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Cut one page out of a fully matched and sorted result set.
///
/// A page past the end is empty but still reports the real totals.
pub(crate) fn paginate<T>(matched: Vec<T>, paging: PageRequest) -> Page<T> {
    let total_items = matched.len() as u64;
    let pagination = PaginationMeta::from_totals(paging.page, paging.limit, total_items);

    let items = matched
        .into_iter()
        .skip(paging.offset())
        .take(paging.limit as usize)
        .collect();

    Page::new(items, pagination)
}
