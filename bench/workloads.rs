use crate::config::BenchmarkRun;
use crate::dataset::{ensure_dataset, load_dataset};
use crate::metrics::{compute_stats, TimingSamples};
use point_clusterer::kmeans::init_centroids;
use point_clusterer::{
    Centroid, ClusteringConfig, ClusteringResult, ExecutionStrategy, KMeans, PointStore,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

/// Timings of one strategy over the repetitions
#[derive(Debug, Clone)]
pub struct StrategyTiming {
    pub median_sec: f64,
    pub min_sec: f64,
    pub mean_sec: f64,
    pub std_dev_sec: f64,
    pub inertia: f64,
}

/// Serial vs parallel comparison for one run
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    pub workers: usize,
    pub serial: StrategyTiming,
    pub parallel: StrategyTiming,
    pub speedup: f64,
    /// Both strategies produced the same labels and centroids.
    pub equivalent: bool,
}

/// Load the dataset for a run, generating it on first use
pub fn prepare_points(run: &BenchmarkRun) -> Result<Vec<(f64, f64)>, Box<dyn std::error::Error>> {
    let path = ensure_dataset(run.point_count, run.k, run.spread, run.seed)?;
    load_dataset(&path)
}

/// Time serial and parallel runs started from the same centroids
pub fn compare_strategies(
    run: &BenchmarkRun,
    points: Vec<(f64, f64)>,
) -> Result<ComparisonResult, Box<dyn std::error::Error>> {
    let store = PointStore::new(points)?;
    let mut rng = StdRng::seed_from_u64(run.seed);
    let initial = init_centroids(&store, run.k, &mut rng)?;

    let base = ClusteringConfig::new(run.k)
        .with_epochs(run.epochs)
        .with_seed(run.seed);
    let serial_engine = KMeans::new(base.clone().with_strategy(ExecutionStrategy::Serial))?;
    let parallel_engine = KMeans::new(base.with_strategy(ExecutionStrategy::Parallel {
        threads: run.threads,
    }))?;

    let (serial_samples, serial_result) =
        time_engine(&serial_engine, &store, &initial, run.repetitions)?;
    let (parallel_samples, parallel_result) =
        time_engine(&parallel_engine, &store, &initial, run.repetitions)?;

    let equivalent = serial_result.labels() == parallel_result.labels()
        && serial_result.centroids == parallel_result.centroids;
    if !equivalent {
        eprintln!("WARNING: serial and parallel runs diverged");
    }

    let serial = summarize(&serial_samples, serial_result.inertia);
    let parallel = summarize(&parallel_samples, parallel_result.inertia);
    let speedup = if parallel.median_sec > 0.0 {
        serial.median_sec / parallel.median_sec
    } else {
        0.0
    };

    Ok(ComparisonResult {
        workers: parallel_engine.workers(),
        serial,
        parallel,
        speedup,
        equivalent,
    })
}

fn time_engine(
    engine: &KMeans,
    store: &PointStore,
    initial: &[Centroid],
    repetitions: usize,
) -> Result<(TimingSamples, ClusteringResult), Box<dyn std::error::Error>> {
    let mut samples = TimingSamples::new();
    let mut last = None;

    for _ in 0..repetitions {
        let mut store = store.clone();
        let start = Instant::now();
        let result = engine.run_with_centroids(&mut store, initial.to_vec())?;
        samples.record_duration(start.elapsed());
        last = Some(result);
    }

    let result = last.ok_or("no repetitions were run")?;
    Ok((samples, result))
}

fn summarize(samples: &TimingSamples, inertia: f64) -> StrategyTiming {
    let (mean, std_dev, _range) = compute_stats(samples.samples());
    StrategyTiming {
        median_sec: samples.median().unwrap_or(0.0),
        min_sec: samples.min().unwrap_or(0.0),
        mean_sec: mean,
        std_dev_sec: std_dev,
        inertia,
    }
}
