//! Core traits for the listing controller.
//!
//! This module defines the seams the controller is generic over:
//! - [`Entity`]: anything listed, addressable by an identifier
//! - [`FilterSet`]: an entity-specific filter vocabulary
//! - [`SearchService`]: the remote paginated search the controller calls
//! - [`Notifier`]: where user-facing failure messages go

use std::fmt;

use async_trait::async_trait;

use crate::error::SearchError;
use crate::filters::SortOrder;
use crate::page::Page;

/// A listed record with a stable identifier.
///
/// The identifier is what the selection tracker remembers, so it must stay
/// meaningful across page fetches.
pub trait Entity: Clone + fmt::Debug + Send + Sync + 'static {
    type Id: Clone + Eq + fmt::Debug + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;
}

/// An entity-specific set of search parameters.
///
/// Implementors own their field vocabulary (query text, facets, sub-filters)
/// and expose only what the controller needs: paging, a way to merge a
/// partial update, and the "are any real filters set" check.
///
/// ## Design Note
/// `Patch` never carries a page number. Page changes go through
/// `set_page`, which is what lets the controller reset the page to 1 on
/// every other change.
pub trait FilterSet: Clone + Default + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Sort keys accepted by the entity's search endpoint.
    type SortKey: Copy + fmt::Debug + PartialEq + Send + Sync + 'static;

    /// Partial update with every field optional.
    type Patch: Default + fmt::Debug + Send + 'static;

    /// Current 1-based page number.
    fn page(&self) -> u32;

    /// Set the page number. Values below 1 are clamped to 1.
    fn set_page(&mut self, page: u32);

    /// Merge a partial update into this filter-set.
    fn merge(&mut self, patch: Self::Patch);

    /// Build the patch applied by a free-text search.
    ///
    /// # Arguments
    /// * `query` - Free-text query
    /// * `sub_filter` - Optional secondary text filter (location for both
    ///   jobs and candidates)
    fn search_patch(query: String, sub_filter: Option<String>) -> Self::Patch;

    /// Build the patch applied by a sort change.
    fn sort_patch(sort_by: Self::SortKey, sort_order: SortOrder) -> Self::Patch;

    /// Build a patch that sets every field back to its value in `defaults`.
    fn restore_patch(defaults: &Self) -> Self::Patch;

    /// True if any non-paging, non-sort field is set.
    fn has_active_filters(&self) -> bool;
}

/// Remote paginated search for one entity type.
///
/// Implementations may fail with a [`SearchError`]; the controller recovers
/// from every failure locally.
#[async_trait]
pub trait SearchService<F: FilterSet>: Send + Sync {
    type Entity: Entity;

    /// Fetch one page of results for `filters`.
    ///
    /// # Returns
    /// * `Ok(Page)` - Items in server order plus pagination metadata
    /// * `Err(SearchError)` - The call failed or was rejected
    async fn search(&self, filters: &F) -> Result<Page<Self::Entity>, SearchError>;
}

/// Receives user-facing failure messages. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}
