use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    pub dataset: DatasetConfig,
    pub kmeans: KMeansSettings,
    /// Worker counts to try for the parallel strategy.
    pub threads: Vec<usize>,
    pub repetitions: usize,
    pub seed: u64,
    pub output_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub point_counts: Vec<usize>,
    /// Half-width of the square each generated blob fills.
    pub spread: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeansSettings {
    pub k: usize,
    pub epochs: usize,
}

/// A single benchmark run configuration (one parameter combination)
#[derive(Debug, Clone)]
pub struct BenchmarkRun {
    pub point_count: usize,
    pub spread: f64,
    pub k: usize,
    pub epochs: usize,
    pub threads: usize,
    pub repetitions: usize,
    pub seed: u64,
}

impl BenchmarkConfig {
    /// Load config from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: BenchmarkConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Expand all parameter combinations into individual BenchmarkRun structs
    pub fn expand_combinations(&self) -> Vec<BenchmarkRun> {
        let mut runs = Vec::new();

        for &point_count in &self.dataset.point_counts {
            for &threads in &self.threads {
                runs.push(BenchmarkRun {
                    point_count,
                    spread: self.dataset.spread,
                    k: self.kmeans.k,
                    epochs: self.kmeans.epochs,
                    threads,
                    repetitions: self.repetitions.max(1),
                    seed: self.seed,
                });
            }
        }

        runs
    }
}
