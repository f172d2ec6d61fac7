//! # Board Crate
//!
//! This crate wires the generic list controller to the job board's two
//! listings.
//!
//! ## Components
//!
//! ### Jobs
//! - `JobFilters`: query, location and category, sortable by creation date,
//!   title or salary
//! - `JobSearch`: in-memory search over a shared catalog
//!
//! ### Candidates
//! - `CandidateFilters`: query, skills, experience title/company and
//!   location, sortable by creation date, name or years of experience
//! - `CandidateSearch`: in-memory search over a shared catalog
//!
//! ### Latency
//! - `SimulatedLatency`: wraps any service with a fixed delay
//!
//! ## Example Usage
//!
//! ```ignore
//! use board::{JobListController, JobSearch};
//! use catalog::CatalogIndex;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(CatalogIndex::load_from_files(Path::new("data/sample"))?);
//! let jobs = JobListController::new(JobSearch::new(catalog.clone()));
//!
//! jobs.mount().await;
//! jobs.search("frontend", Some("Hanoi".to_string())).await;
//! println!("{} postings", jobs.pagination().map_or(0, |p| p.total_items));
//! ```

pub mod candidates;
pub mod jobs;
pub mod latency;
mod search;

// Re-export commonly used types
pub use candidates::{
    CandidateFilterPatch, CandidateFilters, CandidateListController, CandidateSearch,
    CandidateSortBy,
};
pub use jobs::{JobFilterPatch, JobFilters, JobListController, JobSearch, JobSortBy};
pub use latency::SimulatedLatency;
pub use search::DEFAULT_MAX_PAGE_SIZE;
