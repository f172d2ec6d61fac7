//! Generic search/pagination/selection controller for paginated listings.
//!
//! This crate provides:
//! - The `Entity`, `FilterSet`, `SearchService` and `Notifier` traits the
//!   controller is generic over
//! - `ListController`, which owns filter state, dispatches searches, merges
//!   pages and tracks a selected entity
//! - Page and pagination types shared with search services
//!
//! ## Architecture
//! One operation goes through these stages:
//! 1. The filter store mutates the filter-set (page resets to 1 unless the
//!    operation is a page jump or load more)
//! 2. The fetch executor calls the search service, numbering the request
//! 3. The result assembler replaces or appends the visible list
//! 4. Failures are recorded and forwarded to the notifier
//! 5. The selection is resolved against the current list on every read
//!
//! ## Example Usage
//! ```ignore
//! use listing::{ListController, SortOrder};
//!
//! let controller = ListController::new(service);
//! controller.mount().await;
//! controller.search("frontend", Some("Hanoi".to_string())).await;
//! controller.change_sort(JobSortBy::Salary, SortOrder::Desc).await;
//!
//! if controller.has_next_page() {
//!     controller.load_more().await;
//! }
//! ```

pub mod assembler;
pub mod config;
pub mod controller;
pub mod error;
pub mod filters;
pub mod notifier;
pub mod page;
pub mod selection;
pub mod traits;

// Re-export main types
pub use assembler::FetchMode;
pub use config::ListConfig;
pub use controller::{FetchOutcome, ListController, ListSnapshot, SkipReason};
pub use error::SearchError;
pub use filters::{DEFAULT_PAGE_SIZE, PageRequest, SortOrder};
pub use notifier::{SilentNotifier, TracingNotifier};
pub use page::{Page, PaginationMeta};
pub use selection::resolve_selection;
pub use traits::{Entity, FilterSet, Notifier, SearchService};
