//! # List Search Controller
//!
//! This module coordinates the whole listing flow:
//! 1. Mutate the filter-set (search, sort, filter update, page jump, load more)
//! 2. Dispatch exactly one search for the resulting filter-set
//! 3. Merge the returned page into the visible list (replace or append)
//! 4. Record failures and forward them to the notifier
//! 5. Resolve the selected entity against whatever list is current
//!
//! ## Concurrency
//! Operations take `&self` and may run concurrently. State sits behind a
//! mutex that is never held across an `.await`. Every dispatch is numbered;
//! only the response to the latest dispatch is applied, anything older is
//! discarded when it arrives. The busy flag stays set while the latest
//! dispatch is outstanding and guards `load_more` against duplicates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info};

use crate::assembler::{Assembled, FetchMode};
use crate::config::ListConfig;
use crate::filters::SortOrder;
use crate::notifier::TracingNotifier;
use crate::page::PaginationMeta;
use crate::selection::resolve_selection;
use crate::traits::{Entity, FilterSet, Notifier, SearchService};

/// What a controller operation ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was merged into the visible list
    Applied {
        visible: usize,
        pagination: PaginationMeta,
    },
    /// The fetch failed; `message` is now the current error
    Failed { message: String },
    /// A later dispatch was issued before this one completed
    Superseded,
    /// No fetch was dispatched
    Skipped(SkipReason),
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied { .. })
    }
}

/// Why an operation did not dispatch a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A fetch is already in flight (load more only)
    Busy,
    /// The last page has been reached, or nothing was fetched yet
    NoNextPage,
    /// `mount` already ran for this controller
    AlreadyMounted,
    /// `auto_load` is off
    AutoLoadDisabled,
}

/// Read-only view of the controller state handed to the rendering layer.
#[derive(Debug, Clone, Serialize)]
#[serde(
    rename_all = "camelCase",
    bound(serialize = "E: Serialize, E::Id: Serialize, F: Serialize")
)]
pub struct ListSnapshot<E: Entity, F> {
    pub entities: Vec<E>,
    pub pagination: Option<PaginationMeta>,
    pub filters: F,
    pub loading: bool,
    pub error: Option<String>,
    pub selected_id: Option<E::Id>,
    pub selected: Option<E>,
    pub has_active_filters: bool,
    pub has_next_page: bool,
}

struct ListState<E: Entity, F> {
    filters: F,
    /// Filters of the last applied response
    applied_filters: Option<F>,
    list: Assembled<E>,
    selected_id: Option<E::Id>,
    loading: bool,
    error: Option<String>,
    /// Number of the most recently dispatched request
    latest_request: u64,
}

impl<E: Entity, F: FilterSet> ListState<E, F> {
    fn new(filters: F) -> Self {
        Self {
            filters,
            applied_filters: None,
            list: Assembled::new(),
            selected_id: None,
            loading: false,
            error: None,
            latest_request: 0,
        }
    }

    /// Mark a new request as dispatched and capture the filters it runs with.
    fn begin_request(&mut self) -> (u64, F) {
        self.latest_request += 1;
        self.loading = true;
        self.error = None;
        (self.latest_request, self.filters.clone())
    }

    /// Whether the visible list was produced by the current filters, page aside.
    fn list_matches_filters(&self) -> bool {
        self.applied_filters.as_ref().is_none_or(|applied| {
            let mut applied = applied.clone();
            applied.set_page(self.filters.page());
            applied == self.filters
        })
    }
}

/// Generic search/pagination/selection controller.
///
/// `F` is the entity's filter vocabulary, `S` the service that answers
/// searches for it. The listed entity type is `S::Entity`.
///
/// ## Usage
/// ```ignore
/// let controller = ListController::new(JobSearch::new(index))
///     .with_notifier(ConsoleNotifier);
///
/// controller.mount().await;
/// controller.search("frontend", Some("Hanoi".to_string())).await;
/// controller.load_more().await;
///
/// let snapshot = controller.snapshot();
/// ```
pub struct ListController<F, S>
where
    F: FilterSet,
    S: SearchService<F>,
{
    service: S,
    notifier: Arc<dyn Notifier>,
    config: ListConfig,
    defaults: F,
    mounted: AtomicBool,
    state: Mutex<ListState<S::Entity, F>>,
}

impl<F, S> ListController<F, S>
where
    F: FilterSet,
    S: SearchService<F>,
{
    /// Create a controller with default filters, the default config and a
    /// [`TracingNotifier`].
    pub fn new(service: S) -> Self {
        let defaults = F::default();
        Self {
            service,
            notifier: Arc::new(TracingNotifier),
            config: ListConfig::default(),
            state: Mutex::new(ListState::new(defaults.clone())),
            defaults,
            mounted: AtomicBool::new(false),
        }
    }

    /// Configure where failure messages go
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Share an existing notifier
    pub fn with_shared_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_config(mut self, config: ListConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the defaults `reset_filters` returns to, and the initial
    /// filter-set (`defaults` merged with `overrides`).
    pub fn with_filters(mut self, defaults: F, overrides: F::Patch) -> Self {
        let mut initial = defaults.clone();
        initial.merge(overrides);
        initial.set_page(1);

        self.defaults = defaults;
        self.state = Mutex::new(ListState::new(initial));
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    // =========================================================================
    // Filter operations
    // =========================================================================

    /// Run the initial fetch.
    ///
    /// Only the first call on a controller fetches, and only when
    /// `auto_load` is enabled.
    pub async fn mount(&self) -> FetchOutcome {
        if !self.config.auto_load {
            return FetchOutcome::Skipped(SkipReason::AutoLoadDisabled);
        }
        if self.mounted.swap(true, Ordering::SeqCst) {
            return FetchOutcome::Skipped(SkipReason::AlreadyMounted);
        }
        info!("mounting list controller");
        self.refresh().await
    }

    /// Search by free text, with an optional location/sub-filter.
    pub async fn search(
        &self,
        query: impl Into<String>,
        sub_filter: Option<String>,
    ) -> FetchOutcome {
        self.update_filters(F::search_patch(query.into(), sub_filter))
            .await
    }

    pub async fn change_sort(
        &self,
        sort_by: F::SortKey,
        sort_order: SortOrder,
    ) -> FetchOutcome {
        self.update_filters(F::sort_patch(sort_by, sort_order)).await
    }

    /// Merge a partial filter update and fetch page 1.
    pub async fn update_filters(&self, patch: F::Patch) -> FetchOutcome {
        self.apply_filter_change(patch, true).await
    }

    /// Restore the construction-time defaults and fetch page 1.
    pub async fn reset_filters(&self) -> FetchOutcome {
        self.apply_filter_change(F::restore_patch(&self.defaults), true)
            .await
    }

    /// Jump to `page`, keeping every other filter. Replaces the list.
    pub async fn go_to_page(&self, page: u32) -> FetchOutcome {
        self.dispatch(FetchMode::Replace, move |filters| filters.set_page(page))
            .await
    }

    /// Fetch the page after the last one received and append it.
    ///
    /// No-op while a fetch is in flight or when there is no next page.
    /// If the filters changed since the visible list was fetched (a failed
    /// search, say), page 1 of the current filters replaces the list instead.
    pub async fn load_more(&self) -> FetchOutcome {
        let (request_id, filters, mode) = {
            let mut state = self.lock();
            if state.loading {
                debug!("load more skipped, fetch in flight");
                return FetchOutcome::Skipped(SkipReason::Busy);
            }
            if !state.list_matches_filters() {
                debug!("filters changed since the list was fetched, reloading page 1");
                state.filters.set_page(1);
                let (request_id, filters) = state.begin_request();
                (request_id, filters, FetchMode::Replace)
            } else {
                let Some(meta) = state.list.pagination.filter(PaginationMeta::has_next_page)
                else {
                    debug!("load more skipped, no next page");
                    return FetchOutcome::Skipped(SkipReason::NoNextPage);
                };
                state.filters.set_page(meta.current_page + 1);
                let (request_id, filters) = state.begin_request();
                (request_id, filters, FetchMode::Append)
            }
        };
        self.execute(request_id, filters, mode).await
    }

    /// Fetch the current filter-set again, replacing the list.
    pub async fn refresh(&self) -> FetchOutcome {
        self.dispatch(FetchMode::Replace, |_| {}).await
    }

    /// Merge `patch` into the filters and fetch, optionally resetting to
    /// page 1. Every named filter operation funnels through here.
    pub async fn apply_filter_change(&self, patch: F::Patch, reset_page: bool) -> FetchOutcome {
        self.dispatch(FetchMode::Replace, move |filters| {
            filters.merge(patch);
            if reset_page {
                filters.set_page(1);
            }
        })
        .await
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select an entity by id, or clear the selection with `None`.
    ///
    /// # Returns
    /// The entity the id resolves to in the current list, if any.
    pub fn select(&self, id: Option<<S::Entity as Entity>::Id>) -> Option<S::Entity> {
        let mut state = self.lock();
        state.selected_id = id;
        let resolved = resolve_selection(&state.list.items, state.selected_id.as_ref()).cloned();
        debug!(
            selected = ?state.selected_id,
            resolved = resolved.is_some(),
            "selection changed"
        );
        resolved
    }

    pub fn selected_id(&self) -> Option<<S::Entity as Entity>::Id> {
        self.lock().selected_id.clone()
    }

    /// The selected entity as found in the current list.
    pub fn selected(&self) -> Option<S::Entity> {
        let state = self.lock();
        resolve_selection(&state.list.items, state.selected_id.as_ref()).cloned()
    }

    // =========================================================================
    // Read-only state
    // =========================================================================

    pub fn snapshot(&self) -> ListSnapshot<S::Entity, F> {
        let state = self.lock();
        let selected =
            resolve_selection(&state.list.items, state.selected_id.as_ref()).cloned();
        ListSnapshot {
            entities: state.list.items.clone(),
            pagination: state.list.pagination,
            filters: state.filters.clone(),
            loading: state.loading,
            error: state.error.clone(),
            selected_id: state.selected_id.clone(),
            selected,
            has_active_filters: state.filters.has_active_filters(),
            has_next_page: state.list.has_next_page(),
        }
    }

    pub fn entities(&self) -> Vec<S::Entity> {
        self.lock().list.items.clone()
    }

    pub fn pagination(&self) -> Option<PaginationMeta> {
        self.lock().list.pagination
    }

    pub fn filters(&self) -> F {
        self.lock().filters.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn has_active_filters(&self) -> bool {
        self.lock().filters.has_active_filters()
    }

    pub fn has_next_page(&self) -> bool {
        self.lock().list.has_next_page()
    }

    // =========================================================================
    // Fetch execution
    // =========================================================================

    /// Apply `change` to the filters and fetch with the result.
    async fn dispatch(&self, mode: FetchMode, change: impl FnOnce(&mut F)) -> FetchOutcome {
        let (request_id, filters) = {
            let mut state = self.lock();
            change(&mut state.filters);
            state.begin_request()
        };
        self.execute(request_id, filters, mode).await
    }

    /// Call the service and apply the response if it is still the latest.
    async fn execute(&self, request_id: u64, filters: F, mode: FetchMode) -> FetchOutcome {
        debug!(request_id, ?mode, ?filters, "dispatching search");
        let result = self.service.search(&filters).await;

        let mut state = self.lock();
        if request_id != state.latest_request {
            debug!(
                request_id,
                latest_request = state.latest_request,
                "discarding superseded response"
            );
            return FetchOutcome::Superseded;
        }
        state.loading = false;

        match result {
            Ok(page) => {
                let pagination = page.pagination;
                let received = page.len();
                let visible = state.list.merge(page, mode);
                state.applied_filters = Some(filters);
                debug!(request_id, received, visible, "applied search results");
                FetchOutcome::Applied {
                    visible,
                    pagination,
                }
            }
            Err(err) => {
                let message = err
                    .user_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| self.config.fallback_error_message.clone());
                debug!(request_id, error = %err, "search failed");

                // Ask for the same page again on the next load more.
                if mode == FetchMode::Append {
                    if let Some(meta) = state.list.pagination {
                        state.filters.set_page(meta.current_page);
                    }
                }
                state.error = Some(message.clone());
                drop(state);

                self.notifier.notify(&message);
                FetchOutcome::Failed { message }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState<S::Entity, F>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::filters::{PageRequest, normalize_text};
    use crate::page::Page;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: u32,
    }

    impl Entity for Note {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum NoteSort {
        Id,
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct NoteFilters {
        query: Option<String>,
        paging: PageRequest,
        sort_order: SortOrder,
    }

    #[derive(Debug, Default)]
    struct NotePatch {
        query: Option<String>,
        sort_order: Option<SortOrder>,
    }

    impl FilterSet for NoteFilters {
        type SortKey = NoteSort;
        type Patch = NotePatch;

        fn page(&self) -> u32 {
            self.paging.page
        }

        fn set_page(&mut self, page: u32) {
            self.paging.page = page.max(1);
        }

        fn merge(&mut self, patch: NotePatch) {
            if let Some(query) = patch.query {
                self.query = normalize_text(query);
            }
            if let Some(order) = patch.sort_order {
                self.sort_order = order;
            }
        }

        fn search_patch(query: String, _sub_filter: Option<String>) -> NotePatch {
            NotePatch {
                query: Some(query),
                ..NotePatch::default()
            }
        }

        fn sort_patch(_sort_by: NoteSort, sort_order: SortOrder) -> NotePatch {
            NotePatch {
                sort_order: Some(sort_order),
                ..NotePatch::default()
            }
        }

        fn restore_patch(defaults: &Self) -> NotePatch {
            NotePatch {
                query: Some(defaults.query.clone().unwrap_or_default()),
                sort_order: Some(defaults.sort_order),
            }
        }

        fn has_active_filters(&self) -> bool {
            self.query.is_some()
        }
    }

    /// Answers every search with ten notes per page out of 25.
    #[derive(Default)]
    struct PagedNotes {
        calls: StdMutex<Vec<NoteFilters>>,
    }

    #[async_trait]
    impl SearchService<NoteFilters> for PagedNotes {
        type Entity = Note;

        async fn search(&self, filters: &NoteFilters) -> Result<Page<Note>, SearchError> {
            self.calls.lock().unwrap().push(filters.clone());
            let start = (filters.paging.page - 1) * 10;
            let end = (start + 10).min(25);
            let items = (start..end).map(|id| Note { id }).collect();
            Ok(Page::new(
                items,
                PaginationMeta::from_totals(filters.paging.page, 10, 25),
            ))
        }
    }

    fn controller() -> ListController<NoteFilters, PagedNotes> {
        ListController::new(PagedNotes::default())
    }

    // ============================================================================
    // Unit Tests
    // ============================================================================

    #[tokio::test]
    async fn test_initial_state_is_empty() {
        let controller = controller();
        let snapshot = controller.snapshot();

        assert!(snapshot.entities.is_empty());
        assert!(snapshot.pagination.is_none());
        assert!(!snapshot.loading);
        assert!(!snapshot.has_next_page);
        assert!(!snapshot.has_active_filters);
    }

    #[tokio::test]
    async fn test_mount_fetches_once() {
        let controller = controller();

        assert!(controller.mount().await.is_applied());
        assert_eq!(
            controller.mount().await,
            FetchOutcome::Skipped(SkipReason::AlreadyMounted)
        );
        assert_eq!(controller.service().calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mount_respects_auto_load() {
        let controller = controller().with_config(ListConfig::default().with_auto_load(false));

        assert_eq!(
            controller.mount().await,
            FetchOutcome::Skipped(SkipReason::AutoLoadDisabled)
        );
        assert!(controller.service().calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_more_walks_to_last_page() {
        let controller = controller();
        controller.mount().await;

        assert!(controller.load_more().await.is_applied());
        assert!(controller.load_more().await.is_applied());
        assert_eq!(controller.entities().len(), 25);
        assert!(!controller.has_next_page());
        assert_eq!(
            controller.load_more().await,
            FetchOutcome::Skipped(SkipReason::NoNextPage)
        );
    }

    #[tokio::test]
    async fn test_load_more_before_first_fetch_is_skipped() {
        let controller = controller();
        assert_eq!(
            controller.load_more().await,
            FetchOutcome::Skipped(SkipReason::NoNextPage)
        );
    }

    #[tokio::test]
    async fn test_with_filters_merges_overrides() {
        let controller = controller().with_filters(
            NoteFilters::default(),
            NotePatch {
                query: Some("draft".to_string()),
                ..NotePatch::default()
            },
        );

        assert_eq!(controller.filters().query.as_deref(), Some("draft"));
        assert!(controller.has_active_filters());

        controller.reset_filters().await;
        assert_eq!(controller.filters(), NoteFilters::default());
    }

    #[tokio::test]
    async fn test_selection_follows_list() {
        let controller = controller();
        controller.mount().await;

        let selected = controller.select(Some(3));
        assert_eq!(selected, Some(Note { id: 3 }));

        controller.go_to_page(2).await;
        assert_eq!(controller.selected_id(), Some(3));
        assert!(controller.selected().is_none());

        controller.go_to_page(1).await;
        assert_eq!(controller.selected(), Some(Note { id: 3 }));
    }
}
