use anyhow::{anyhow, bail, Context, Result};
use board::{
    CandidateFilterPatch, CandidateFilters, CandidateListController, CandidateSearch,
    CandidateSortBy, JobFilterPatch, JobFilters, JobListController, JobSearch, JobSortBy,
    SimulatedLatency,
};
use catalog::{CatalogIndex, CategoryId, SkillId};
use clap::{Args, Parser, Subcommand};
use listing::{Entity, FetchOutcome, FilterSet, ListController, SearchService, SortOrder};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

mod bench;
mod output;

use output::{print_candidates, print_jobs, ConsoleNotifier};

/// jobboard - browse job and candidate listings
#[derive(Parser)]
#[command(name = "jobboard")]
#[command(about = "Search, page and select job board listings", long_about = None)]
struct Cli {
    /// Directory holding jobs.json, candidates.json, skills.json and categories.json
    #[arg(short, long, env = "JOBBOARD_DATA_DIR", default_value = "data/sample", global = true)]
    data_dir: PathBuf,

    /// Artificial delay added to every search, in milliseconds
    #[arg(long, default_value = "0", global = true)]
    latency_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

/// Paging, selection and output flags shared by both listings
#[derive(Args, Debug)]
struct ListArgs {
    /// Sort direction (asc or desc)
    #[arg(long, default_value = "desc")]
    sort_order: SortOrder,

    /// Page to show (replaces the first page)
    #[arg(long, default_value = "1")]
    page: u32,

    /// Items per page
    #[arg(long, default_value = "10")]
    limit: u32,

    /// Append this many following pages after the first fetch
    #[arg(long, default_value = "0")]
    load_more: u32,

    /// Select an entity by id after loading
    #[arg(long)]
    select: Option<u32>,

    /// Print the controller snapshot as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search job postings
    Jobs {
        /// Free-text query (title, company, description)
        #[arg(short, long)]
        query: Option<String>,

        /// Location substring
        #[arg(short, long)]
        location: Option<String>,

        /// Category id or name
        #[arg(short, long)]
        category: Option<String>,

        /// Sort key (createdAt, title, salary)
        #[arg(long, default_value = "createdAt")]
        sort_by: JobSortBy,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Search candidate profiles
    Candidates {
        /// Free-text query (name, headline)
        #[arg(short, long)]
        query: Option<String>,

        /// Required skill id or name (repeatable)
        #[arg(short, long = "skill")]
        skills: Vec<String>,

        /// Experience title substring
        #[arg(long)]
        title: Option<String>,

        /// Experience company substring
        #[arg(long)]
        company: Option<String>,

        /// Location substring
        #[arg(short, long)]
        location: Option<String>,

        /// Sort key (createdAt, fullName, yearsOfExperience)
        #[arg(long, default_value = "createdAt")]
        sort_by: CandidateSortBy,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Show catalog counts, skills and categories
    Catalog,

    /// Run concurrent controllers against the catalog and report latency
    Bench {
        /// Number of concurrent controllers
        #[arg(long, default_value = "16")]
        controllers: usize,

        /// Operations per controller
        #[arg(long, default_value = "25")]
        operations: usize,

        /// Seed for the operation mix (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let start = Instant::now();
    let catalog = Arc::new(
        CatalogIndex::load_from_files(&cli.data_dir)
            .with_context(|| format!("Failed to load catalog from {}", cli.data_dir.display()))?,
    );
    tracing::debug!(elapsed = ?start.elapsed(), "catalog ready");

    let latency = Duration::from_millis(cli.latency_ms);

    match cli.command {
        Commands::Jobs {
            query,
            location,
            category,
            sort_by,
            list,
        } => {
            let category_id = category
                .map(|value| resolve_category(&catalog, &value))
                .transpose()?;
            let mut patch = JobFilterPatch::new()
                .with_category(category_id)
                .with_limit(list.limit)
                .with_sort(sort_by, list.sort_order);
            patch.query = query;
            patch.location = location;

            let service = SimulatedLatency::new(JobSearch::new(catalog.clone()), latency);
            let controller: JobListController<_> = ListController::new(service)
                .with_notifier(ConsoleNotifier)
                .with_filters(JobFilters::default(), patch);

            run_listing(&controller, &list).await?;
            if !list.json {
                print_jobs(&controller.snapshot(), &catalog);
            }
            finish(&controller)
        }
        Commands::Candidates {
            query,
            skills,
            title,
            company,
            location,
            sort_by,
            list,
        } => {
            let skill_ids = skills
                .iter()
                .map(|value| resolve_skill(&catalog, value))
                .collect::<Result<Vec<_>>>()?;
            let mut patch = CandidateFilterPatch::new()
                .with_skills(skill_ids)
                .with_limit(list.limit)
                .with_sort(sort_by, list.sort_order);
            patch.query = query;
            patch.experience_title = title;
            patch.experience_company = company;
            patch.location = location;

            let service = SimulatedLatency::new(CandidateSearch::new(catalog.clone()), latency);
            let controller: CandidateListController<_> = ListController::new(service)
                .with_notifier(ConsoleNotifier)
                .with_filters(CandidateFilters::default(), patch);

            run_listing(&controller, &list).await?;
            if !list.json {
                print_candidates(&controller.snapshot(), &catalog);
            }
            finish(&controller)
        }
        Commands::Catalog => {
            output::print_catalog(&catalog);
            Ok(())
        }
        Commands::Bench {
            controllers,
            operations,
            seed,
        } => {
            let seed = seed.unwrap_or_else(rand::random);
            bench::run(catalog, latency, controllers, operations, seed).await
        }
    }
}

/// Mount the controller, then apply the page, load-more and selection flags.
async fn run_listing<F, S>(controller: &ListController<F, S>, list: &ListArgs) -> Result<()>
where
    F: FilterSet + Serialize,
    S: SearchService<F>,
    S::Entity: Entity<Id = u32> + Serialize,
{
    let start = Instant::now();
    controller.mount().await;

    if list.page > 1 {
        controller.go_to_page(list.page).await;
    }

    for _ in 0..list.load_more {
        match controller.load_more().await {
            FetchOutcome::Applied { .. } => {}
            FetchOutcome::Skipped(reason) => {
                tracing::debug!(?reason, "stopping load more");
                break;
            }
            FetchOutcome::Failed { .. } | FetchOutcome::Superseded => break,
        }
    }

    if let Some(id) = list.select {
        controller.select(Some(id));
    }
    tracing::debug!(elapsed = ?start.elapsed(), "listing operations complete");

    if list.json {
        let snapshot = controller.snapshot();
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?
        );
    }
    Ok(())
}

/// Turn a recorded failure into a non-zero exit.
fn finish<F, S>(controller: &ListController<F, S>) -> Result<()>
where
    F: FilterSet,
    S: SearchService<F>,
{
    match controller.error() {
        Some(message) => Err(anyhow!("search failed: {}", message)),
        None => Ok(()),
    }
}

/// Accept a category id or a case-insensitive category name.
fn resolve_category(catalog: &CatalogIndex, value: &str) -> Result<CategoryId> {
    if let Ok(id) = value.parse::<CategoryId>() {
        if catalog.get_category(id).is_none() {
            bail!("Unknown category id {}", id);
        }
        return Ok(id);
    }
    catalog
        .find_category(value)
        .map(|category| category.id)
        .ok_or_else(|| anyhow!("Unknown category '{}'", value))
}

/// Accept a skill id or a case-insensitive skill name.
fn resolve_skill(catalog: &CatalogIndex, value: &str) -> Result<SkillId> {
    if let Ok(id) = value.parse::<SkillId>() {
        if catalog.get_skill(id).is_none() {
            bail!("Unknown skill id {}", id);
        }
        return Ok(id);
    }
    catalog
        .find_skill(value)
        .map(|skill| skill.id)
        .ok_or_else(|| anyhow!("Unknown skill '{}'", value))
}
