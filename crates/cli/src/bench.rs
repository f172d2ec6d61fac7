//! Concurrent controller benchmark.
//!
//! ## Algorithm
//! 1. Spawn one task per controller, each with its own seeded RNG
//! 2. Each task mounts its controller, then runs a random mix of searches,
//!    sort changes, page jumps and load-mores
//! 3. Some steps fire a search and a page jump at once; with latency the
//!    older response gets discarded
//! 4. Collect per-operation latencies and outcome counts, then report
//!    percentiles and throughput

use anyhow::Result;
use board::{JobFilterPatch, JobListController, JobSearch, JobSortBy, SimulatedLatency};
use catalog::CatalogIndex;
use colored::Colorize;
use listing::{FetchOutcome, ListController, SilentNotifier, SortOrder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::{Duration, Instant};

const QUERIES: [&str; 8] = [
    "engineer", "frontend", "backend", "designer", "data", "manager", "rust", "",
];
const LOCATIONS: [&str; 4] = ["Hanoi", "Ho Chi Minh City", "Da Nang", ""];
const SORTS: [JobSortBy; 3] = [JobSortBy::CreatedAt, JobSortBy::Title, JobSortBy::Salary];

type BenchController = JobListController<SimulatedLatency<JobSearch>>;

#[derive(Debug, Default)]
struct Tally {
    timings: Vec<Duration>,
    applied: usize,
    failed: usize,
    superseded: usize,
    skipped: usize,
}

impl Tally {
    fn record(&mut self, outcome: &FetchOutcome, elapsed: Duration) {
        self.timings.push(elapsed);
        match outcome {
            FetchOutcome::Applied { .. } => self.applied += 1,
            FetchOutcome::Failed { .. } => self.failed += 1,
            FetchOutcome::Superseded => self.superseded += 1,
            FetchOutcome::Skipped(_) => self.skipped += 1,
        }
    }

    fn absorb(&mut self, other: Tally) {
        self.timings.extend(other.timings);
        self.applied += other.applied;
        self.failed += other.failed;
        self.superseded += other.superseded;
        self.skipped += other.skipped;
    }
}

/// Run the benchmark and print the report.
pub async fn run(
    catalog: Arc<CatalogIndex>,
    latency: Duration,
    controllers: usize,
    operations: usize,
    seed: u64,
) -> Result<()> {
    println!(
        "Running {} controllers x {} operations (latency {:?}, seed {})",
        controllers, operations, latency, seed
    );

    let start = Instant::now();
    let mut handles = Vec::with_capacity(controllers);
    for worker in 0..controllers {
        let service = SimulatedLatency::new(JobSearch::new(catalog.clone()), latency);
        let controller: BenchController =
            ListController::new(service).with_notifier(SilentNotifier);
        let rng = StdRng::seed_from_u64(seed.wrapping_add(worker as u64));
        handles.push(tokio::spawn(drive(controller, rng, operations)));
    }

    let mut tally = Tally::default();
    for handle in handles {
        tally.absorb(handle.await?);
    }
    let wall_time = start.elapsed();

    report(tally, wall_time);
    Ok(())
}

async fn drive(controller: BenchController, mut rng: StdRng, operations: usize) -> Tally {
    let mut tally = Tally::default();

    let started = Instant::now();
    let outcome = controller.mount().await;
    tally.record(&outcome, started.elapsed());

    for _ in 0..operations {
        let started = Instant::now();
        let outcome = match rng.random_range(0..10) {
            0..=2 => {
                let query = QUERIES[rng.random_range(0..QUERIES.len())];
                let location = LOCATIONS[rng.random_range(0..LOCATIONS.len())];
                controller
                    .search(query, Some(location.to_string()))
                    .await
            }
            3 => {
                let sort_by = SORTS[rng.random_range(0..SORTS.len())];
                let sort_order = if rng.random_bool(0.5) {
                    SortOrder::Asc
                } else {
                    SortOrder::Desc
                };
                controller.change_sort(sort_by, sort_order).await
            }
            4 => {
                let limit = rng.random_range(5..=25);
                controller
                    .update_filters(JobFilterPatch::new().with_limit(limit))
                    .await
            }
            5 => {
                let pages = controller.pagination().map_or(1, |p| p.total_pages.max(1));
                controller.go_to_page(rng.random_range(1..=pages)).await
            }
            6 => {
                // With latency the search is still in flight when the page
                // jump goes out and gets superseded; without it both apply
                let query = QUERIES[rng.random_range(0..QUERIES.len())];
                let (first, second) =
                    tokio::join!(controller.search(query, None), controller.go_to_page(1));
                tally.record(&first, started.elapsed());
                second
            }
            _ => controller.load_more().await,
        };
        tally.record(&outcome, started.elapsed());

        if rng.random_bool(0.3) {
            let visible = controller.entities();
            if !visible.is_empty() {
                let pick = &visible[rng.random_range(0..visible.len())];
                controller.select(Some(pick.id));
            }
        }
    }
    tally
}

fn report(mut tally: Tally, wall_time: Duration) {
    if tally.timings.is_empty() {
        println!("No operations were run");
        return;
    }

    tally.timings.sort();
    let count = tally.timings.len();
    let total: Duration = tally.timings.iter().sum();
    let avg = total / count as u32;
    let percentile = |p: f64| {
        let idx = ((count as f64 * p) as usize).min(count - 1);
        tally.timings[idx]
    };
    let throughput = count as f64 / wall_time.as_secs_f64();

    println!("\n{}", "Benchmark results:".bold().blue());
    println!("Wall time: {:?}", wall_time);
    println!("Operations: {}", count);
    println!(
        "Outcomes: {} applied, {} superseded, {} skipped, {} failed",
        tally.applied.to_string().green(),
        tally.superseded.to_string().yellow(),
        tally.skipped,
        tally.failed.to_string().red()
    );
    println!("Average latency: {:?}", avg);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} operations/second", throughput);
}
