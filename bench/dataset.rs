use point_clusterer::io::{read_points, write_points};
use point_clusterer::utils::generate_blobs;
use std::path::{Path, PathBuf};

/// Generate a deterministic point cloud and save it as CSV
pub fn generate_dataset(
    point_count: usize,
    clusters: usize,
    spread: f64,
    seed: u64,
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if output_path.exists() {
        eprintln!("Dataset already exists at {:?}, skipping generation", output_path);
        return Ok(());
    }

    eprintln!(
        "Generating {} points around {} centers with seed {}...",
        point_count, clusters, seed
    );

    let points = generate_blobs(point_count, clusters, spread, seed)?;
    write_points(output_path, &points)?;

    eprintln!("Dataset saved to {:?}", output_path);
    Ok(())
}

/// Get the path for a dataset file based on parameters. Every generation
/// parameter is part of the name so a cached file is only reused for an
/// identical dataset.
pub fn dataset_path(point_count: usize, clusters: usize, spread: f64, seed: u64) -> PathBuf {
    PathBuf::from("bench_data").join(format!(
        "{}_{}_{}_{}.csv",
        point_count, clusters, spread, seed
    ))
}

pub fn load_dataset(path: &Path) -> Result<Vec<(f64, f64)>, Box<dyn std::error::Error>> {
    Ok(read_points(path, false)?)
}

/// Ensure dataset exists, generating it if necessary
pub fn ensure_dataset(
    point_count: usize,
    clusters: usize,
    spread: f64,
    seed: u64,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dataset_path(point_count, clusters, spread, seed);
    generate_dataset(point_count, clusters, spread, seed, &path)?;
    Ok(path)
}
