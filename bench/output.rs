use crate::config::BenchmarkRun;
use crate::workloads::ComparisonResult;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete benchmark result for a single run
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub point_count: usize,
    pub k: usize,
    pub epochs: usize,
    pub threads: usize,
    pub workers: usize,
    pub repetitions: usize,
    pub seed: u64,
    pub serial_median_sec: f64,
    pub serial_min_sec: f64,
    pub serial_mean_sec: f64,
    pub serial_std_dev_sec: f64,
    pub parallel_median_sec: f64,
    pub parallel_min_sec: f64,
    pub parallel_mean_sec: f64,
    pub parallel_std_dev_sec: f64,
    pub speedup: f64,
    pub inertia: f64,
    pub equivalent: bool,
}

impl BenchmarkResult {
    pub fn from_run_and_comparison(run: &BenchmarkRun, cmp: &ComparisonResult) -> Self {
        BenchmarkResult {
            point_count: run.point_count,
            k: run.k,
            epochs: run.epochs,
            threads: run.threads,
            workers: cmp.workers,
            repetitions: run.repetitions,
            seed: run.seed,
            serial_median_sec: cmp.serial.median_sec,
            serial_min_sec: cmp.serial.min_sec,
            serial_mean_sec: cmp.serial.mean_sec,
            serial_std_dev_sec: cmp.serial.std_dev_sec,
            parallel_median_sec: cmp.parallel.median_sec,
            parallel_min_sec: cmp.parallel.min_sec,
            parallel_mean_sec: cmp.parallel.mean_sec,
            parallel_std_dev_sec: cmp.parallel.std_dev_sec,
            speedup: cmp.speedup,
            inertia: cmp.parallel.inertia,
            equivalent: cmp.equivalent,
        }
    }
}

fn create_output(output_path: &Path) -> Result<File, Box<dyn std::error::Error>> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(File::create(output_path)?)
}

/// Write results to JSON file
pub fn write_json(
    results: &[BenchmarkResult],
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Writing JSON results to {:?}", output_path);

    let json = serde_json::to_string_pretty(results)?;
    let mut file = create_output(output_path)?;
    file.write_all(json.as_bytes())?;

    eprintln!("Wrote {} results to JSON", results.len());
    Ok(())
}

/// Write results to CSV file
pub fn write_csv(
    results: &[BenchmarkResult],
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Writing CSV results to {:?}", output_path);

    let mut wtr = csv::Writer::from_writer(create_output(output_path)?);
    for result in results {
        wtr.serialize(result)?;
    }
    wtr.flush()?;

    eprintln!("Wrote {} results to CSV", results.len());
    Ok(())
}

/// Write results to Markdown file
pub fn write_markdown(
    results: &[BenchmarkResult],
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Writing Markdown results to {:?}", output_path);

    let mut file = create_output(output_path)?;

    writeln!(file, "# Benchmark Results\n")?;

    let mut grouped: BTreeMap<usize, Vec<&BenchmarkResult>> = BTreeMap::new();
    for result in results {
        grouped.entry(result.point_count).or_default().push(result);
    }

    for (point_count, mut group_results) in grouped {
        group_results.sort_by_key(|r| r.workers);

        writeln!(
            file,
            "## Dataset: {} points, k={}, epochs={}\n",
            point_count, group_results[0].k, group_results[0].epochs
        )?;
        writeln!(
            file,
            "| Workers | Serial median (s) | Parallel median (s) | Speedup | Equivalent |"
        )?;
        writeln!(
            file,
            "|---------|-------------------|---------------------|---------|------------|"
        )?;

        for result in group_results {
            writeln!(
                file,
                "| {} | {:.4} | {:.4} | {:.2}x | {} |",
                result.workers,
                result.serial_median_sec,
                result.parallel_median_sec,
                result.speedup,
                if result.equivalent { "yes" } else { "no" },
            )?;
        }

        writeln!(file)?;
    }

    eprintln!("Wrote {} results to Markdown", results.len());
    Ok(())
}
