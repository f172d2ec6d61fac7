//! Core domain types for the job board catalog.
//!
//! This module defines the records the listings are built from:
//! - Type aliases for identifiers (JobId, CandidateId, SkillId, CategoryId)
//! - Jobs and candidates, the two listed entity types
//! - Skills and categories, the facets they reference
//! - `CatalogIndex`, the in-memory store with secondary indices

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use listing::Entity;

use crate::error::{CatalogError, Result};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a job posting
pub type JobId = u32;

/// Unique identifier for a candidate profile
pub type CandidateId = u32;

/// Unique identifier for a skill
pub type SkillId = u32;

/// Unique identifier for a job category
pub type CategoryId = u32;

// =============================================================================
// Facets
// =============================================================================

/// A skill candidates can list (e.g. "Rust", "React")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
}

/// A job category (e.g. "Engineering", "Design")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

// =============================================================================
// Jobs
// =============================================================================

/// A job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub description: String,
    /// Monthly salary range; either end may be unpublished
    #[serde(default)]
    pub salary_min: Option<u32>,
    #[serde(default)]
    pub salary_max: Option<u32>,
    /// Unix timestamp when the posting was created
    pub created_at: i64,
}

impl Job {
    /// Salary used for ordering: the top of the range, falling back to the
    /// bottom. Postings without any salary sort as 0.
    pub fn salary_sort_key(&self) -> u32 {
        self.salary_max.or(self.salary_min).unwrap_or(0)
    }
}

impl Entity for Job {
    type Id = JobId;

    fn id(&self) -> &JobId {
        &self.id
    }
}

// =============================================================================
// Candidates
// =============================================================================

/// One past or current position on a candidate profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub years: u32,
}

/// A candidate profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub full_name: String,
    #[serde(default)]
    pub headline: String,
    pub location: String,
    #[serde(default)]
    pub skill_ids: Vec<SkillId>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    pub created_at: i64,
}

impl Candidate {
    /// Total years across all experience entries
    pub fn years_of_experience(&self) -> u32 {
        self.experiences.iter().map(|e| e.years).sum()
    }

    pub fn has_skill(&self, skill_id: SkillId) -> bool {
        self.skill_ids.contains(&skill_id)
    }
}

impl Entity for Candidate {
    type Id = CandidateId;

    fn id(&self) -> &CandidateId {
        &self.id
    }
}

// =============================================================================
// CatalogIndex - The In-Memory Store
// =============================================================================

/// Record counts, for logging and the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub jobs: usize,
    pub candidates: usize,
    pub skills: usize,
    pub categories: usize,
}

/// Holds every catalog record plus lookup indices.
///
/// Jobs and candidates are kept in load order, which is the tie-break order
/// for searches that sort on equal keys.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    pub(crate) jobs: Vec<Job>,
    pub(crate) candidates: Vec<Candidate>,
    pub(crate) skills: HashMap<SkillId, Skill>,
    pub(crate) categories: HashMap<CategoryId, Category>,

    // Position of each record in its vector
    pub(crate) job_positions: HashMap<JobId, usize>,
    pub(crate) candidate_positions: HashMap<CandidateId, usize>,

    /// Jobs grouped by category
    pub(crate) jobs_by_category: HashMap<CategoryId, Vec<JobId>>,
    /// Candidates grouped by skill (a candidate appears once per skill)
    pub(crate) candidates_by_skill: HashMap<SkillId, Vec<CandidateId>>,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_job(&self, id: JobId) -> Option<&Job> {
        self.job_positions.get(&id).map(|&pos| &self.jobs[pos])
    }

    pub fn get_candidate(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidate_positions
            .get(&id)
            .map(|&pos| &self.candidates[pos])
    }

    pub fn get_skill(&self, id: SkillId) -> Option<&Skill> {
        self.skills.get(&id)
    }

    pub fn get_category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    /// Find a skill by case-insensitive name
    pub fn find_skill(&self, name: &str) -> Option<&Skill> {
        self.skills
            .values()
            .find(|skill| skill.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Find a category by case-insensitive name
    pub fn find_category(&self, name: &str) -> Option<&Category> {
        self.categories
            .values()
            .find(|category| category.name.eq_ignore_ascii_case(name.trim()))
    }

    /// All jobs, in load order
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// All candidates, in load order
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// All skills, ordered by id
    pub fn skills(&self) -> Vec<&Skill> {
        let mut skills: Vec<&Skill> = self.skills.values().collect();
        skills.sort_unstable_by_key(|skill| skill.id);
        skills
    }

    /// All categories, ordered by id
    pub fn categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.categories.values().collect();
        categories.sort_unstable_by_key(|category| category.id);
        categories
    }

    pub fn jobs_in_category(&self, category_id: CategoryId) -> &[JobId] {
        self.jobs_by_category
            .get(&category_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn candidates_with_skill(&self, skill_id: SkillId) -> &[CandidateId] {
        self.candidates_by_skill
            .get(&skill_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    // Mutators used while loading. Each rejects a duplicate id.

    pub fn insert_job(&mut self, job: Job) -> Result<()> {
        if self.job_positions.contains_key(&job.id) {
            return Err(CatalogError::DuplicateId {
                entity: "Job".to_string(),
                id: job.id,
            });
        }
        self.job_positions.insert(job.id, self.jobs.len());
        self.jobs.push(job);
        Ok(())
    }

    pub fn insert_candidate(&mut self, candidate: Candidate) -> Result<()> {
        if self.candidate_positions.contains_key(&candidate.id) {
            return Err(CatalogError::DuplicateId {
                entity: "Candidate".to_string(),
                id: candidate.id,
            });
        }
        self.candidate_positions
            .insert(candidate.id, self.candidates.len());
        self.candidates.push(candidate);
        Ok(())
    }

    pub fn insert_skill(&mut self, skill: Skill) -> Result<()> {
        if self.skills.contains_key(&skill.id) {
            return Err(CatalogError::DuplicateId {
                entity: "Skill".to_string(),
                id: skill.id,
            });
        }
        self.skills.insert(skill.id, skill);
        Ok(())
    }

    pub fn insert_category(&mut self, category: Category) -> Result<()> {
        if self.categories.contains_key(&category.id) {
            return Err(CatalogError::DuplicateId {
                entity: "Category".to_string(),
                id: category.id,
            });
        }
        self.categories.insert(category.id, category);
        Ok(())
    }

    pub fn counts(&self) -> CatalogCounts {
        CatalogCounts {
            jobs: self.jobs.len(),
            candidates: self.candidates.len(),
            skills: self.skills.len(),
            categories: self.categories.len(),
        }
    }
}
