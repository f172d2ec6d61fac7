//! Example: Browse job and candidate listings
//!
//! Run with: cargo run --package board --example browse_listings
//!
//! This example shows how to:
//! 1. Load the sample catalog
//! 2. Drive a job controller through search, sort and load more
//! 3. Track a selection while the list changes
//! 4. Filter candidates by skill

use anyhow::Context;
use board::{
    CandidateFilterPatch, CandidateListController, CandidateSearch, JobListController, JobSearch,
    JobSortBy,
};
use catalog::CatalogIndex;
use listing::SortOrder;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("=== Job Board Listing Example ===\n");

    let start = Instant::now();
    let data_dir = Path::new("data/sample");
    let catalog = Arc::new(
        CatalogIndex::load_from_files(data_dir)
            .with_context(|| format!("loading catalog from {}", data_dir.display()))?,
    );
    println!("Loaded catalog in {:?}\n", start.elapsed());

    // Jobs: search, then sort by salary
    let jobs = JobListController::new(JobSearch::new(catalog.clone()));
    jobs.mount().await;
    jobs.search("engineer", Some("Hanoi".to_string())).await;
    jobs.change_sort(JobSortBy::Salary, SortOrder::Desc).await;

    let snapshot = jobs.snapshot();
    println!("Engineering jobs in Hanoi, best paid first:");
    for (i, job) in snapshot.entities.iter().enumerate() {
        println!(
            "  {}. {} at {} ({})",
            i + 1,
            job.title,
            job.company,
            job.salary_max.map_or("unpublished".to_string(), |s| format!("${}", s))
        );
    }

    // Keep loading while there are pages left
    while jobs.has_next_page() {
        jobs.load_more().await;
    }
    if let Some(meta) = jobs.pagination() {
        println!(
            "\nLoaded {} of {} postings across {} pages",
            jobs.entities().len(),
            meta.total_items,
            meta.total_pages
        );
    }

    // Selection follows the list
    if let Some(first) = jobs.entities().first() {
        jobs.select(Some(first.id));
        jobs.search("designer", None).await;
        println!(
            "\nSelected job {} still listed after a new search: {}",
            first.id,
            jobs.selected().is_some()
        );
    }

    // Candidates with a given skill
    let candidates = CandidateListController::new(CandidateSearch::new(catalog.clone()));
    if let Some(rust) = catalog.find_skill("Rust") {
        candidates
            .update_filters(CandidateFilterPatch::new().with_skills(vec![rust.id]))
            .await;
        println!("\nCandidates with Rust:");
        for candidate in candidates.entities() {
            println!(
                "  - {} ({} years)",
                candidate.full_name,
                candidate.years_of_experience()
            );
        }
    }

    Ok(())
}
