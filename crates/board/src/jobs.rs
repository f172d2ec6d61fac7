//! Job listings: filter vocabulary and in-memory search.
//!
//! ## Filters
//! - `query`: matched against title, company and description
//! - `location`: matched against the posting location
//! - `category_id`: exact category
//!
//! ## Algorithm
//! 1. Narrow to the category's postings through the catalog index, if set
//! 2. Match text filters in parallel (order preserved)
//! 3. Stable sort by the requested key and direction
//! 4. Cut out the requested page

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use catalog::{CatalogIndex, CategoryId, Job};
use listing::filters::normalize_text;
use listing::{FilterSet, ListController, Page, PageRequest, SearchError, SearchService, SortOrder};

use crate::search::{
    DEFAULT_MAX_PAGE_SIZE, TextFilter, check_page_size, compare_text, directed, paginate,
};

// ============================================================================
// Filter vocabulary
// ============================================================================

/// Sort keys accepted by job search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobSortBy {
    #[default]
    CreatedAt,
    Title,
    Salary,
}

impl fmt::Display for JobSortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobSortBy::CreatedAt => f.write_str("createdAt"),
            JobSortBy::Title => f.write_str("title"),
            JobSortBy::Salary => f.write_str("salary"),
        }
    }
}

impl FromStr for JobSortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "createdat" => Ok(JobSortBy::CreatedAt),
            "title" => Ok(JobSortBy::Title),
            "salary" => Ok(JobSortBy::Salary),
            _ => Err(format!(
                "unknown job sort '{s}', expected createdAt, title or salary"
            )),
        }
    }
}

/// Search parameters for job listings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(flatten)]
    pub paging: PageRequest,
    pub sort_by: JobSortBy,
    pub sort_order: SortOrder,
}

/// Partial update of [`JobFilters`].
///
/// `None` leaves a field alone. For text fields an empty string clears the
/// filter; `category_id: Some(None)` clears the category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilterPatch {
    pub query: Option<String>,
    pub location: Option<String>,
    pub category_id: Option<Option<CategoryId>>,
    pub limit: Option<u32>,
    pub sort_by: Option<JobSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl JobFilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_category(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_sort(mut self, sort_by: JobSortBy, sort_order: SortOrder) -> Self {
        self.sort_by = Some(sort_by);
        self.sort_order = Some(sort_order);
        self
    }
}

impl FilterSet for JobFilters {
    type SortKey = JobSortBy;
    type Patch = JobFilterPatch;

    fn page(&self) -> u32 {
        self.paging.page
    }

    fn set_page(&mut self, page: u32) {
        self.paging.page = page.max(1);
    }

    fn merge(&mut self, patch: JobFilterPatch) {
        if let Some(query) = patch.query {
            self.query = normalize_text(query);
        }
        if let Some(location) = patch.location {
            self.location = normalize_text(location);
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(limit) = patch.limit {
            self.paging.limit = limit.max(1);
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
    }

    fn search_patch(query: String, sub_filter: Option<String>) -> JobFilterPatch {
        JobFilterPatch {
            query: Some(query),
            location: sub_filter,
            ..JobFilterPatch::default()
        }
    }

    fn sort_patch(sort_by: JobSortBy, sort_order: SortOrder) -> JobFilterPatch {
        JobFilterPatch::new().with_sort(sort_by, sort_order)
    }

    fn restore_patch(defaults: &Self) -> JobFilterPatch {
        JobFilterPatch {
            query: Some(defaults.query.clone().unwrap_or_default()),
            location: Some(defaults.location.clone().unwrap_or_default()),
            category_id: Some(defaults.category_id),
            limit: Some(defaults.paging.limit),
            sort_by: Some(defaults.sort_by),
            sort_order: Some(defaults.sort_order),
        }
    }

    fn has_active_filters(&self) -> bool {
        self.query.is_some() || self.location.is_some() || self.category_id.is_some()
    }
}

// ============================================================================
// In-memory search service
// ============================================================================

/// Answers job searches from a shared catalog.
#[derive(Debug, Clone)]
pub struct JobSearch {
    catalog: Arc<CatalogIndex>,
    max_page_size: u32,
}

impl JobSearch {
    pub fn new(catalog: Arc<CatalogIndex>) -> Self {
        Self {
            catalog,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    /// Configure the largest accepted page size (default: 100)
    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    /// All postings matching `filters`, sorted, before paging.
    pub fn matching(&self, filters: &JobFilters) -> Vec<Job> {
        let query = TextFilter::new(filters.query.as_deref());
        let location = TextFilter::new(filters.location.as_deref());

        let pool: Vec<&Job> = match filters.category_id {
            Some(category_id) => self
                .catalog
                .jobs_in_category(category_id)
                .iter()
                .filter_map(|&id| self.catalog.get_job(id))
                .collect(),
            None => self.catalog.jobs().iter().collect(),
        };

        let mut matched: Vec<Job> = pool
            .par_iter()
            .filter(|job| {
                query.matches_any([
                    job.title.as_str(),
                    job.company.as_str(),
                    job.description.as_str(),
                ]) && location.matches(&job.location)
            })
            .map(|job| (*job).clone())
            .collect();

        matched.sort_by(|a, b| {
            let ordering = match filters.sort_by {
                JobSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                JobSortBy::Title => compare_text(&a.title, &b.title),
                JobSortBy::Salary => a.salary_sort_key().cmp(&b.salary_sort_key()),
            };
            directed(ordering, filters.sort_order)
        });
        matched
    }
}

#[async_trait]
impl SearchService<JobFilters> for JobSearch {
    type Entity = Job;

    #[instrument(skip(self, filters), fields(page = filters.paging.page, limit = filters.paging.limit))]
    async fn search(&self, filters: &JobFilters) -> Result<Page<Job>, SearchError> {
        check_page_size(filters.paging.limit, self.max_page_size)?;

        let page = paginate(self.matching(filters), filters.paging);
        debug!(
            returned = page.len(),
            total_items = page.pagination.total_items,
            "job search complete"
        );
        Ok(page)
    }
}

/// Controller over job listings.
pub type JobListController<S> = ListController<JobFilters, S>;
