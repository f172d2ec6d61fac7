use catalog::CatalogIndex;
use std::path::PathBuf;
use std::time::Instant;

fn main() -> catalog::Result<()> {
    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/sample"));

    println!("Loading catalog from {}...\n", data_dir.display());

    let start = Instant::now();
    let index = CatalogIndex::load_from_files(&data_dir)?;
    let elapsed = start.elapsed();

    let counts = index.counts();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Jobs: {}", counts.jobs);
    println!("Candidates: {}", counts.candidates);
    println!("Skills: {}", counts.skills);
    println!("Categories: {}", counts.categories);

    let records = counts.jobs + counts.candidates;
    println!(
        "\nPerformance: {:.0} records/second",
        records as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
