//! CatalogIndex building and validation.
//!
//! Loading goes through these steps:
//! 1. Parse the four catalog files in parallel
//! 2. Insert records, rejecting duplicate ids
//! 3. Build secondary indices (jobs by category, candidates by skill)
//! 4. Validate that every reference resolves

use std::path::Path;

use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::parser::{self, CANDIDATES_FILE, CATEGORIES_FILE, JOBS_FILE, SKILLS_FILE};
use crate::types::*;

impl CatalogIndex {
    /// Load a catalog from a directory holding `jobs.json`,
    /// `candidates.json`, `skills.json` and `categories.json`.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!(data_dir = %data_dir.display(), "loading catalog");

        let jobs_path = data_dir.join(JOBS_FILE);
        let candidates_path = data_dir.join(CANDIDATES_FILE);
        let skills_path = data_dir.join(SKILLS_FILE);
        let categories_path = data_dir.join(CATEGORIES_FILE);

        // Nested joins give four-way parallelism
        let ((jobs, candidates), (skills, categories)) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_jobs(&jobs_path),
                    || parser::parse_candidates(&candidates_path),
                )
            },
            || {
                rayon::join(
                    || parser::parse_skills(&skills_path),
                    || parser::parse_categories(&categories_path),
                )
            },
        );

        let index = Self::from_parts(jobs?, candidates?, skills?, categories?)?;

        let counts = index.counts();
        info!(
            jobs = counts.jobs,
            candidates = counts.candidates,
            skills = counts.skills,
            categories = counts.categories,
            "catalog loaded"
        );
        Ok(index)
    }

    /// Build a validated index from already-parsed records.
    pub fn from_parts(
        jobs: Vec<Job>,
        candidates: Vec<Candidate>,
        skills: Vec<Skill>,
        categories: Vec<Category>,
    ) -> Result<Self> {
        let mut index = CatalogIndex::new();

        for skill in skills {
            index.insert_skill(skill)?;
        }
        for category in categories {
            index.insert_category(category)?;
        }
        for job in jobs {
            index.insert_job(job)?;
        }
        for candidate in candidates {
            index.insert_candidate(candidate)?;
        }

        index.build_secondary_indices();
        index.validate()?;

        debug!("catalog index built and validated");
        Ok(index)
    }

    /// Rebuild `jobs_by_category` and `candidates_by_skill` from the
    /// primary records. Id lists follow load order.
    pub fn build_secondary_indices(&mut self) {
        self.jobs_by_category.clear();
        self.candidates_by_skill.clear();

        for job in &self.jobs {
            self.jobs_by_category
                .entry(job.category_id)
                .or_default()
                .push(job.id);
        }

        for candidate in &self.candidates {
            let mut seen = Vec::with_capacity(candidate.skill_ids.len());
            for &skill_id in &candidate.skill_ids {
                if seen.contains(&skill_id) {
                    continue;
                }
                seen.push(skill_id);
                self.candidates_by_skill
                    .entry(skill_id)
                    .or_default()
                    .push(candidate.id);
            }
        }
    }

    /// Check that every job category and candidate skill exists.
    pub fn validate(&self) -> Result<()> {
        for job in &self.jobs {
            if !self.categories.contains_key(&job.category_id) {
                return Err(CatalogError::MissingReference {
                    entity: "Category".to_string(),
                    id: job.category_id,
                    referenced_by: format!("Job {}", job.id),
                });
            }
        }

        for candidate in &self.candidates {
            for skill_id in &candidate.skill_ids {
                if !self.skills.contains_key(skill_id) {
                    return Err(CatalogError::MissingReference {
                        entity: "Skill".to_string(),
                        id: *skill_id,
                        referenced_by: format!("Candidate {}", candidate.id),
                    });
                }
            }
        }
        Ok(())
    }
}
