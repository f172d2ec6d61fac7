//! Candidate listings: filter vocabulary and in-memory search.
//!
//! ## Filters
//! - `query`: matched against full name and headline
//! - `skill_ids`: the candidate must have every listed skill
//! - `experience_title` / `experience_company`: matched against any
//!   experience entry
//! - `location`: matched against the candidate location

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use catalog::{Candidate, CatalogIndex, SkillId};
use listing::filters::normalize_text;
use listing::{FilterSet, ListController, Page, PageRequest, SearchError, SearchService, SortOrder};

use crate::search::{
    DEFAULT_MAX_PAGE_SIZE, TextFilter, check_page_size, compare_text, directed, paginate,
};

/// Sort keys accepted by candidate search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CandidateSortBy {
    #[default]
    CreatedAt,
    FullName,
    YearsOfExperience,
}

impl fmt::Display for CandidateSortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateSortBy::CreatedAt => f.write_str("createdAt"),
            CandidateSortBy::FullName => f.write_str("fullName"),
            CandidateSortBy::YearsOfExperience => f.write_str("yearsOfExperience"),
        }
    }
}

impl FromStr for CandidateSortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "createdat" => Ok(CandidateSortBy::CreatedAt),
            "fullname" => Ok(CandidateSortBy::FullName),
            "yearsofexperience" => Ok(CandidateSortBy::YearsOfExperience),
            _ => Err(format!(
                "unknown candidate sort '{s}', expected createdAt, fullName or yearsOfExperience"
            )),
        }
    }
}

/// Search parameters for candidate listings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skill_ids: Vec<SkillId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub paging: PageRequest,
    pub sort_by: CandidateSortBy,
    pub sort_order: SortOrder,
}

/// Partial update of [`CandidateFilters`].
///
/// `None` leaves a field alone. Empty text or an empty skill list clears the
/// filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFilterPatch {
    pub query: Option<String>,
    pub skill_ids: Option<Vec<SkillId>>,
    pub experience_title: Option<String>,
    pub experience_company: Option<String>,
    pub location: Option<String>,
    pub limit: Option<u32>,
    pub sort_by: Option<CandidateSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl CandidateFilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_skills(mut self, skill_ids: Vec<SkillId>) -> Self {
        self.skill_ids = Some(skill_ids);
        self
    }

    pub fn with_experience_title(mut self, title: impl Into<String>) -> Self {
        self.experience_title = Some(title.into());
        self
    }

    pub fn with_experience_company(mut self, company: impl Into<String>) -> Self {
        self.experience_company = Some(company.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_sort(mut self, sort_by: CandidateSortBy, sort_order: SortOrder) -> Self {
        self.sort_by = Some(sort_by);
        self.sort_order = Some(sort_order);
        self
    }
}

impl FilterSet for CandidateFilters {
    type SortKey = CandidateSortBy;
    type Patch = CandidateFilterPatch;

    fn page(&self) -> u32 {
        self.paging.page
    }

    fn set_page(&mut self, page: u32) {
        self.paging.page = page.max(1);
    }

    fn merge(&mut self, patch: CandidateFilterPatch) {
        if let Some(query) = patch.query {
            self.query = normalize_text(query);
        }
        if let Some(mut skill_ids) = patch.skill_ids {
            skill_ids.sort_unstable();
            skill_ids.dedup();
            self.skill_ids = skill_ids;
        }
        if let Some(title) = patch.experience_title {
            self.experience_title = normalize_text(title);
        }
        if let Some(company) = patch.experience_company {
            self.experience_company = normalize_text(company);
        }
        if let Some(location) = patch.location {
            self.location = normalize_text(location);
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

    fn search_patch(query: String, sub_filter: Option<String>) -> CandidateFilterPatch {
        CandidateFilterPatch {
            query: Some(query),
            location: sub_filter,
            ..CandidateFilterPatch::default()
        }
    }

    fn sort_patch(sort_by: CandidateSortBy, sort_order: SortOrder) -> CandidateFilterPatch {
        CandidateFilterPatch::new().with_sort(sort_by, sort_order)
    }

    fn restore_patch(defaults: &Self) -> CandidateFilterPatch {
        CandidateFilterPatch {
            query: Some(defaults.query.clone().unwrap_or_default()),
            skill_ids: Some(defaults.skill_ids.clone()),
            experience_title: Some(defaults.experience_title.clone().unwrap_or_default()),
            experience_company: Some(defaults.experience_company.clone().unwrap_or_default()),
            location: Some(defaults.location.clone().unwrap_or_default()),
            limit: Some(defaults.paging.limit),
            sort_by: Some(defaults.sort_by),
            sort_order: Some(defaults.sort_order),
        }
    }

    fn has_active_filters(&self) -> bool {
        self.query.is_some()
            || !self.skill_ids.is_empty()
            || self.experience_title.is_some()
            || self.experience_company.is_some()
            || self.location.is_some()
    }
}

/// Answers candidate searches from a shared catalog.
#[derive(Debug, Clone)]
pub struct CandidateSearch {
    catalog: Arc<CatalogIndex>,
    max_page_size: u32,
}

impl CandidateSearch {
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

    /// All candidates matching `filters`, sorted, before paging.
    pub fn matching(&self, filters: &CandidateFilters) -> Vec<Candidate> {
        let query = TextFilter::new(filters.query.as_deref());
        let title = TextFilter::new(filters.experience_title.as_deref());
        let company = TextFilter::new(filters.experience_company.as_deref());
        let location = TextFilter::new(filters.location.as_deref());

        // Start from the first skill's posting list; the rest are checked
        // per candidate.
        let pool: Vec<&Candidate> = match filters.skill_ids.first() {
            Some(&skill_id) => self
                .catalog
                .candidates_with_skill(skill_id)
                .iter()
                .filter_map(|&id| self.catalog.get_candidate(id))
                .collect(),
            None => self.catalog.candidates().iter().collect(),
        };

        let mut matched: Vec<Candidate> = pool
            .par_iter()
            .filter(|candidate| {
                filters.skill_ids.iter().all(|&id| candidate.has_skill(id))
                    && query.matches_any([
                        candidate.full_name.as_str(),
                        candidate.headline.as_str(),
                    ])
                    && title.matches_any(candidate.experiences.iter().map(|e| e.title.as_str()))
                    && company
                        .matches_any(candidate.experiences.iter().map(|e| e.company.as_str()))
                    && location.matches(&candidate.location)
            })
            .map(|candidate| (*candidate).clone())
            .collect();

        matched.sort_by(|a, b| {
            let ordering = match filters.sort_by {
                CandidateSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                CandidateSortBy::FullName => compare_text(&a.full_name, &b.full_name),
                CandidateSortBy::YearsOfExperience => {
                    a.years_of_experience().cmp(&b.years_of_experience())
                }
            };
            directed(ordering, filters.sort_order)
        });
        matched
    }
}

#[async_trait]
impl SearchService<CandidateFilters> for CandidateSearch {
    type Entity = Candidate;

    #[instrument(skip(self, filters), fields(page = filters.paging.page, limit = filters.paging.limit))]
    async fn search(&self, filters: &CandidateFilters) -> Result<Page<Candidate>, SearchError> {
        check_page_size(filters.paging.limit, self.max_page_size)?;

        let page = paginate(self.matching(filters), filters.paging);
        debug!(
            returned = page.len(),
            total_items = page.pagination.total_items,
            "candidate search complete"
        );
        Ok(page)
    }
}

/// Controller over candidate listings.
pub type CandidateListController<S> = ListController<CandidateFilters, S>;

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{Experience, Skill};

    fn candidate(
        id: u32,
        name: &str,
        location: &str,
        skill_ids: Vec<u32>,
        experiences: Vec<(&str, &str, u32)>,
    ) -> Candidate {
        Candidate {
            id,
            full_name: name.to_string(),
            headline: String::new(),
            location: location.to_string(),
            skill_ids,
            experiences: experiences
                .into_iter()
                .map(|(title, company, years)| Experience {
                    title: title.to_string(),
                    company: company.to_string(),
                    years,
                })
                .collect(),
            created_at: i64::from(id),
        }
    }

    fn service() -> CandidateSearch {
        let skills = (1..=3)
            .map(|id| Skill {
                id,
                name: format!("skill-{}", id),
            })
            .collect();
        let candidates = vec![
            candidate(1, "Mai Pham", "Hanoi", vec![1, 2], vec![("Frontend Developer", "Acme", 2)]),
            candidate(2, "an Vu", "Hanoi", vec![1], vec![("Backend Developer", "Beta", 6)]),
            candidate(3, "Khoa Do", "Hue", vec![1, 2, 3], vec![
                ("Frontend Lead", "Beta", 3),
                ("Frontend Developer", "Acme", 2),
            ]),
            candidate(4, "Ha Bui", "Hanoi", vec![], vec![]),
        ];
        let index = CatalogIndex::from_parts(vec![], candidates, skills, vec![]).unwrap();
        CandidateSearch::new(Arc::new(index))
    }

    fn ids(candidates: &[Candidate]) -> Vec<u32> {
        candidates.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_skill_filter_requires_all() {
        let service = service();
        let mut filters = CandidateFilters::default();
        filters.merge(CandidateFilterPatch::new().with_skills(vec![2, 1, 2]));

        assert_eq!(filters.skill_ids, vec![1, 2]);
        assert_eq!(ids(&service.matching(&filters)), vec![3, 1]);
    }

    #[test]
    fn test_experience_filters_match_any_entry() {
        let service = service();
        let mut filters = CandidateFilters::default();
        filters.merge(
            CandidateFilterPatch::new()
                .with_experience_title("frontend")
                .with_experience_company("beta"),
        );

        // Title and company may match different entries
        assert_eq!(ids(&service.matching(&filters)), vec![3]);
    }

    #[test]
    fn test_empty_skill_list_clears_filter() {
        let mut filters = CandidateFilters::default();
        filters.merge(CandidateFilterPatch::new().with_skills(vec![3]));
        assert!(filters.has_active_filters());

        filters.merge(CandidateFilterPatch::new().with_skills(vec![]));
        assert!(!filters.has_active_filters());
    }

    #[test]
    fn test_sort_by_years_of_experience() {
        let service = service();
        let mut filters = CandidateFilters::default();
        filters.merge(
            CandidateFilterPatch::new().with_sort(CandidateSortBy::YearsOfExperience, SortOrder::Desc),
        );

        assert_eq!(ids(&service.matching(&filters)), vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let service = service();
        let mut filters = CandidateFilters::default();
        filters.merge(CandidateFilterPatch::new().with_sort(CandidateSortBy::FullName, SortOrder::Asc));

        assert_eq!(ids(&service.matching(&filters)), vec![2, 4, 3, 1]);
    }

    #[test]
    fn test_search_patch_sets_location() {
        let patch = CandidateFilters::search_patch("mai".to_string(), Some("Hanoi".to_string()));
        let mut filters = CandidateFilters::default();
        filters.merge(patch);

        assert_eq!(filters.query.as_deref(), Some("mai"));
        assert_eq!(filters.location.as_deref(), Some("Hanoi"));
        assert_eq!(ids(&service().matching(&filters)), vec![1]);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!(
            "years_of_experience".parse::<CandidateSortBy>(),
            Ok(CandidateSortBy::YearsOfExperience)
        );
        assert_eq!("fullName".parse::<CandidateSortBy>(), Ok(CandidateSortBy::FullName));
        assert!("salary".parse::<CandidateSortBy>().is_err());
    }

    #[tokio::test]
    async fn test_search_past_last_page() {
        let service = service();
        let mut filters = CandidateFilters::default();
        filters.set_page(4);

        let page = service.search(&filters).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.pagination.total_items, 4);
        assert_eq!(page.pagination.total_pages, 1);
        assert_eq!(page.pagination.current_page, 4);
    }
}
