//! Benchmarks for the in-memory search services
//!
//! Run with: cargo bench --package board
//!
//! Builds a synthetic catalog so the benchmark does not depend on data files.

use board::{
    CandidateFilterPatch, CandidateFilters, CandidateSearch, JobFilterPatch, JobFilters, JobSearch,
    JobSortBy,
};
use catalog::{Candidate, CatalogIndex, Category, Experience, Job, Skill};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use listing::{FilterSet, SearchService, SortOrder};
use std::sync::Arc;

const CITIES: [&str; 4] = ["Hanoi", "Ho Chi Minh City", "Da Nang", "Hue"];
const TITLES: [&str; 5] = ["Frontend", "Backend", "Platform", "Data", "Mobile"];

fn synthetic_catalog(size: u32) -> Arc<CatalogIndex> {
    let categories = (1..=5)
        .map(|id| Category {
            id,
            name: format!("Category {}", id),
        })
        .collect();
    let skills = (1..=20)
        .map(|id| Skill {
            id,
            name: format!("Skill {}", id),
        })
        .collect();

    let jobs = (1..=size)
        .map(|id| Job {
            id,
            title: format!("{} Engineer {}", TITLES[id as usize % TITLES.len()], id),
            company: format!("Company {}", id % 50),
            location: CITIES[id as usize % CITIES.len()].to_string(),
            category_id: id % 5 + 1,
            description: String::new(),
            salary_min: Some(1000 + id % 20 * 100),
            salary_max: Some(2000 + id % 30 * 100),
            created_at: i64::from(id),
        })
        .collect();

    let candidates = (1..=size)
        .map(|id| Candidate {
            id,
            full_name: format!("Candidate {}", id),
            headline: String::new(),
            location: CITIES[id as usize % CITIES.len()].to_string(),
            skill_ids: vec![id % 20 + 1, (id * 7) % 20 + 1],
            experiences: vec![Experience {
                title: format!("{} Developer", TITLES[id as usize % TITLES.len()]),
                company: format!("Company {}", id % 50),
                years: id % 12,
            }],
            created_at: i64::from(id),
        })
        .collect();

    let index = CatalogIndex::from_parts(jobs, candidates, skills, categories)
        .expect("Failed to build synthetic catalog");
    Arc::new(index)
}

fn bench_job_search(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to build runtime");
    let service = JobSearch::new(synthetic_catalog(20_000));

    let mut filters = JobFilters::default();
    filters.merge(
        JobFilterPatch::new()
            .with_query("frontend")
            .with_location("hanoi")
            .with_sort(JobSortBy::Salary, SortOrder::Desc),
    );

    c.bench_function("job_search_text_and_sort", |b| {
        b.iter(|| {
            let page = runtime.block_on(service.search(black_box(&filters)));
            black_box(page)
        })
    });
}

fn bench_candidate_skill_search(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to build runtime");
    let service = CandidateSearch::new(synthetic_catalog(20_000));

    let mut filters = CandidateFilters::default();
    filters.merge(CandidateFilterPatch::new().with_skills(vec![3, 8]));

    c.bench_function("candidate_search_skills", |b| {
        b.iter(|| {
            let page = runtime.block_on(service.search(black_box(&filters)));
            black_box(page)
        })
    });
}

criterion_group!(benches, bench_job_search, bench_candidate_skill_search);
criterion_main!(benches);
