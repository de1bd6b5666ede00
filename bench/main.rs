mod config;
mod dataset;
mod metrics;
mod output;
mod workloads;

use config::BenchmarkConfig;
use output::{write_csv, write_json, write_markdown, BenchmarkResult};
use std::env;
use std::path::PathBuf;
use workloads::{compare_strategies, prepare_points};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <config.yaml>", args[0]);
        std::process::exit(1);
    }

    let config_path = &args[1];
    eprintln!("Loading config from: {}", config_path);

    let config = BenchmarkConfig::from_file(config_path)?;
    let runs = config.expand_combinations();
    eprintln!("Expanded to {} benchmark runs", runs.len());

    let mut results = Vec::new();

    for (idx, run) in runs.iter().enumerate() {
        eprintln!(
            "\n=== Run {}/{}: {} points, k={}, epochs={}, threads={} ===",
            idx + 1,
            runs.len(),
            run.point_count,
            run.k,
            run.epochs,
            run.threads
        );

        let points = match prepare_points(run) {
            Ok(points) => points,
            Err(e) => {
                eprintln!("ERROR: Dataset preparation failed: {}", e);
                continue;
            }
        };

        match compare_strategies(run, points) {
            Ok(cmp) => {
                eprintln!("  Executed in {:.6} secs", cmp.serial.median_sec);
                eprintln!(
                    "  Parallel executed in {:.6} secs ({} workers, {:.2}x)",
                    cmp.parallel.median_sec, cmp.workers, cmp.speedup
                );
                results.push(BenchmarkResult::from_run_and_comparison(run, &cmp));
            }
            Err(e) => {
                eprintln!("ERROR: Comparison failed: {}", e);
            }
        }
    }

    eprintln!("\n=== Writing Results ===");

    let output_prefix = &config.output_prefix;
    let json_path = PathBuf::from(format!("{}.json", output_prefix));
    let csv_path = PathBuf::from(format!("{}.csv", output_prefix));
    let md_path = PathBuf::from(format!("{}.md", output_prefix));

    write_json(&results, &json_path)?;
    write_csv(&results, &csv_path)?;
    write_markdown(&results, &md_path)?;

    eprintln!("\n=== Benchmark Complete ===");
    eprintln!("Results written to:");
    eprintln!("  - {}", json_path.display());
    eprintln!("  - {}", csv_path.display());
    eprintln!("  - {}", md_path.display());

    Ok(())
}
