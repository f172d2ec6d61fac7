//! Terminal rendering for listings and the catalog.

use board::{CandidateFilters, JobFilters};
use catalog::{Candidate, CatalogIndex, Job};
use colored::Colorize;
use listing::{ListSnapshot, Notifier, PaginationMeta};

/// Prints failure messages to stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }
}

pub fn print_jobs(snapshot: &ListSnapshot<Job, JobFilters>, catalog: &CatalogIndex) {
    println!("{}", "Job Postings:".bold().blue());
    if snapshot.entities.is_empty() {
        println!("  {}", "No postings match these filters".dimmed());
    }

    for (i, job) in snapshot.entities.iter().enumerate() {
        let category = catalog
            .get_category(job.category_id)
            .map_or("?", |c| c.name.as_str());
        println!(
            "{}. [{}] {} at {} ({}, {}) {}",
            (i + 1).to_string().green(),
            job.id,
            job.title.bold(),
            job.company,
            job.location,
            category,
            format_salary(job).cyan()
        );
    }

    print_footer(
        snapshot.pagination,
        snapshot.has_active_filters,
        snapshot.entities.len(),
    );

    if let Some(id) = snapshot.selected_id {
        match &snapshot.selected {
            Some(job) => {
                println!("\n{} {} ({})", "Selected:".bold(), job.title, job.company);
                if !job.description.is_empty() {
                    println!("  {}", job.description);
                }
            }
            None => println!("\n{} job {} is not in the current list", "Selected:".bold(), id),
        }
    }
}

pub fn print_candidates(
    snapshot: &ListSnapshot<Candidate, CandidateFilters>,
    catalog: &CatalogIndex,
) {
    println!("{}", "Candidates:".bold().blue());
    if snapshot.entities.is_empty() {
        println!("  {}", "No candidates match these filters".dimmed());
    }

    for (i, candidate) in snapshot.entities.iter().enumerate() {
        println!(
            "{}. [{}] {} - {} ({}, {} years)",
            (i + 1).to_string().green(),
            candidate.id,
            candidate.full_name.bold(),
            candidate.headline,
            candidate.location,
            candidate.years_of_experience()
        );
    }

    print_footer(
        snapshot.pagination,
        snapshot.has_active_filters,
        snapshot.entities.len(),
    );

    if let Some(id) = snapshot.selected_id {
        match &snapshot.selected {
            Some(candidate) => {
                println!("\n{} {}", "Selected:".bold(), candidate.full_name);
                let skills = candidate
                    .skill_ids
                    .iter()
                    .filter_map(|&id| catalog.get_skill(id))
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("  {}Skills: {}", "• ".green(), skills);
                for experience in &candidate.experiences {
                    println!(
                        "  {}{} at {} ({} years)",
                        "• ".cyan(),
                        experience.title,
                        experience.company,
                        experience.years
                    );
                }
            }
            None => println!(
                "\n{} candidate {} is not in the current list",
                "Selected:".bold(),
                id
            ),
        }
    }
}

pub fn print_catalog(catalog: &CatalogIndex) {
    let counts = catalog.counts();
    println!("{}", "Catalog:".bold().blue());
    println!("{}Jobs: {}", "• ".green(), counts.jobs);
    println!("{}Candidates: {}", "• ".green(), counts.candidates);

    println!("\n{}", "Categories:".bold());
    for category in catalog.categories() {
        println!(
            "  {:>3}  {} ({} postings)",
            category.id,
            category.name,
            catalog.jobs_in_category(category.id).len()
        );
    }

    println!("\n{}", "Skills:".bold());
    for skill in catalog.skills() {
        println!(
            "  {:>3}  {} ({} candidates)",
            skill.id,
            skill.name,
            catalog.candidates_with_skill(skill.id).len()
        );
    }
}

fn print_footer(pagination: Option<PaginationMeta>, filtered: bool, shown: usize) {
    match pagination {
        Some(meta) => println!(
            "\nShowing {} of {} ({}page {} of {}){}",
            shown,
            meta.total_items,
            if filtered { "filtered, " } else { "" },
            meta.current_page,
            meta.total_pages.max(1),
            if meta.has_next_page() {
                " - more available".yellow().to_string()
            } else {
                String::new()
            }
        ),
        None => println!("\n{}", "Nothing loaded".dimmed()),
    }
}

fn format_salary(job: &Job) -> String {
    match (job.salary_min, job.salary_max) {
        (Some(min), Some(max)) => format!("${}-${}", min, max),
        (Some(min), None) => format!("from ${}", min),
        (None, Some(max)) => format!("up to ${}", max),
        (None, None) => "salary not published".to_string(),
    }
}
