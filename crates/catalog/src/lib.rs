//! # Catalog Crate
//!
//! This crate loads and indexes the job board catalog: job postings,
//! candidate profiles and the skills and categories they reference.
//!
//! ## Main Components
//!
//! - **types**: Domain types (Job, Candidate, Skill, Category, CatalogIndex)
//! - **parser**: Parse the JSON catalog files into Rust structs
//! - **index**: Build secondary indices and validate references
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::CatalogIndex;
//! use std::path::Path;
//!
//! let index = CatalogIndex::load_from_files(Path::new("data/sample"))?;
//!
//! let job = index.get_job(1).unwrap();
//! let engineering = index.jobs_in_category(job.category_id);
//!
//! println!("{} has {} sibling postings", job.title, engineering.len());
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{
    // Type aliases
    CandidateId,
    CategoryId,
    JobId,
    SkillId,
    // Core types
    Candidate,
    CatalogCounts,
    CatalogIndex,
    Category,
    Experience,
    Job,
    Skill,
};
