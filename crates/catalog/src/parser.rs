//! Parser for catalog files.
//!
//! Each file holds one JSON array of records:
//! - jobs.json: `[{ "id", "title", "company", "location", "categoryId", ... }]`
//! - candidates.json: `[{ "id", "fullName", "location", "skillIds", "experiences", ... }]`
//! - skills.json / categories.json: `[{ "id", "name" }]`

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::error::{CatalogError, Result};
use crate::types::*;

pub const JOBS_FILE: &str = "jobs.json";
pub const CANDIDATES_FILE: &str = "candidates.json";
pub const SKILLS_FILE: &str = "skills.json";
pub const CATEGORIES_FILE: &str = "categories.json";

/// Read a file and parse it as a JSON array of `T`.
fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path)?;
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_records(&file, &content)
}

/// Parse `content` as a JSON array of `T`. `file` only labels errors.
pub fn parse_records<T: DeserializeOwned>(file: &str, content: &str) -> Result<Vec<T>> {
    serde_json::from_str(content).map_err(|e| CatalogError::Parse {
        file: file.to_string(),
        line: e.line(),
        column: e.column(),
        reason: e.to_string(),
    })
}

pub fn parse_jobs(path: &Path) -> Result<Vec<Job>> {
    let jobs: Vec<Job> = read_records(path)?;
    for job in &jobs {
        check_salary_range(job)?;
    }
    Ok(jobs)
}

pub fn parse_candidates(path: &Path) -> Result<Vec<Candidate>> {
    read_records(path)
}

pub fn parse_skills(path: &Path) -> Result<Vec<Skill>> {
    read_records(path)
}

pub fn parse_categories(path: &Path) -> Result<Vec<Category>> {
    read_records(path)
}

/// A published salary range must not be inverted.
fn check_salary_range(job: &Job) -> Result<()> {
    if let (Some(min), Some(max)) = (job.salary_min, job.salary_max) {
        if min > max {
            return Err(CatalogError::InvalidValue {
                entity: "Job".to_string(),
                id: job.id,
                field: "salaryMin".to_string(),
                value: format!("{} > salaryMax {}", min, max),
            });
        }
    }
    Ok(())
}
