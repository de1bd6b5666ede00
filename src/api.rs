use crate::error::{ClusterError, Result};
use crate::io::{read_points, write_labeled_points};
use crate::kmeans::{Centroid, ClusteringResult, EmptyClusterPolicy, ExecutionStrategy, KMeans};
use crate::point_store::{LabeledPoint, PointStore};
use std::path::Path;

/// Configuration for a clustering run.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusteringConfig {
    /// Number of clusters.
    pub k: usize,

    /// Number of assignment/update passes. There is no convergence check.
    pub epochs: usize,

    /// Serial or worker-pool execution.
    pub strategy: ExecutionStrategy,

    /// Seed for centroid sampling and reseeding. `None` derives one from the clock.
    pub seed: Option<u64>,

    /// Handling of clusters that end an epoch with no points.
    pub empty_cluster_policy: EmptyClusterPolicy,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            k: 5,
            epochs: 100,
            strategy: ExecutionStrategy::default(),
            seed: None,
            empty_cluster_policy: EmptyClusterPolicy::default(),
        }
    }
}

impl ClusteringConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Self {
        self.empty_cluster_policy = policy;
        self
    }

    /// Checks that do not depend on the input size.
    pub fn check_parameters(&self) -> Result<()> {
        if self.k == 0 {
            return Err(ClusterError::InvalidConfiguration(
                "k must be at least 1".to_string(),
            ));
        }
        if self.epochs == 0 {
            return Err(ClusterError::InvalidConfiguration(
                "epochs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Full validation against an input of `n_points` points.
    pub fn validate(&self, n_points: usize) -> Result<()> {
        self.check_parameters()?;
        if n_points == 0 {
            return Err(ClusterError::EmptyInput);
        }
        if self.k > n_points {
            return Err(ClusterError::InvalidConfiguration(format!(
                "k ({}) exceeds the number of points ({})",
                self.k, n_points
            )));
        }
        Ok(())
    }
}

/// Cluster `points` into `k` groups over `epochs` passes using every core.
/// Returns the points in input order with their final labels.
pub fn run_kmeans(points: Vec<(f64, f64)>, epochs: usize, k: usize) -> Result<Vec<LabeledPoint>> {
    let clusterer = Clusterer::new(ClusteringConfig::new(k).with_epochs(epochs))?;
    Ok(clusterer.cluster_points(points)?.points)
}

/// Engine plus the CSV collaborator.
pub struct Clusterer {
    engine: KMeans,
}

impl Clusterer {
    pub fn new(cfg: ClusteringConfig) -> Result<Self> {
        Ok(Self {
            engine: KMeans::new(cfg)?,
        })
    }

    pub fn cluster_points(&self, points: Vec<(f64, f64)>) -> Result<ClusteringResult> {
        let mut store = PointStore::new(points)?;
        self.engine.run(&mut store)
    }

    pub fn cluster_points_from(
        &self,
        points: Vec<(f64, f64)>,
        centroids: Vec<Centroid>,
    ) -> Result<ClusteringResult> {
        let mut store = PointStore::new(points)?;
        self.engine.run_with_centroids(&mut store, centroids)
    }

    /// Read `x,y` records from `input`, cluster them and write `x,y,c`
    /// records to `output`.
    pub fn cluster_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        has_header: bool,
    ) -> Result<ClusteringResult> {
        let points = read_points(input, has_header)?;
        let result = self.cluster_points(points)?;
        write_labeled_points(output, &result.points)?;
        Ok(result)
    }

    pub fn engine(&self) -> &KMeans {
        &self.engine
    }

    pub fn config(&self) -> &ClusteringConfig {
        self.engine.config()
    }
}
