use crate::api::ClusteringConfig;
use crate::error::{ClusterError, Result};
use crate::point_store::{LabeledPoint, Point, PointStore};
use crate::utils::{default_num_threads, time_seed};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Points per block. A block is the unit of ownership during an epoch: one
/// worker assigns its points and sums them. The size is fixed so partial sums
/// are grouped the same way whatever the worker count.
pub const BLOCK_SIZE: usize = 1024;

/// Cluster center. Its index in the centroid list is the cluster label.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

impl Centroid {
    pub fn new(x: f64, y: f64) -> Self {
        Centroid { x, y }
    }

    pub fn from_point(p: &Point) -> Self {
        Centroid { x: p.x, y: p.y }
    }

    /// Squared euclidean distance to a point.
    #[inline]
    pub fn distance_squared(&self, p: &Point) -> f64 {
        let dx = p.x - self.x;
        let dy = p.y - self.y;
        dx * dx + dy * dy
    }
}

/// How an epoch's per-point work is scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Walk every block on the calling thread.
    Serial,
    /// Fork-join over a fixed-size worker pool. `threads == 0` uses every
    /// available core.
    Parallel { threads: usize },
}

impl Default for ExecutionStrategy {
    fn default() -> Self {
        ExecutionStrategy::Parallel { threads: 0 }
    }
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStrategy::Serial => write!(f, "serial"),
            ExecutionStrategy::Parallel { threads: 0 } => write!(f, "parallel(auto)"),
            ExecutionStrategy::Parallel { threads } => write!(f, "parallel({threads})"),
        }
    }
}

/// What to do with a centroid that received no points in an epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyClusterPolicy {
    /// Leave the centroid where it was.
    #[default]
    #[serde(alias = "keep")]
    KeepPrevious,
    /// Move the centroid onto a randomly drawn point.
    Reseed,
    /// Abort the run with [`ClusterError::DegenerateCluster`].
    Fail,
}

/// Pick `k` starting centroids by sampling store indices uniformly, with
/// replacement. Two centroids may land on the same point.
pub fn init_centroids<R: Rng + ?Sized>(
    store: &PointStore,
    k: usize,
    rng: &mut R,
) -> Result<Vec<Centroid>> {
    if store.is_empty() {
        return Err(ClusterError::EmptyInput);
    }
    if k == 0 {
        return Err(ClusterError::InvalidConfiguration(
            "k must be at least 1".to_string(),
        ));
    }

    let n = store.len();
    let points = store.points();
    let centroids = (0..k)
        .map(|_| {
            let idx = rng.gen_range(0..n);
            debug!("Initial centroid drawn from point {}", idx);
            Centroid::from_point(&points[idx])
        })
        .collect();

    Ok(centroids)
}

/// Assignment step over a range of points.
///
/// Centroid 0 is always taken first. After that a point moves to centroid
/// `c` only when `c` is strictly closer than the best distance recorded so
/// far, so among equidistant centroids the lowest index wins. A distance that
/// overflows to infinity still yields a label. Centroids are only read.
pub fn assign_points(points: &mut [Point], centroids: &[Centroid]) {
    for p in points.iter_mut() {
        for (c, centroid) in centroids.iter().enumerate() {
            let dist = centroid.distance_squared(p);
            if c == 0 || dist < p.min_dist {
                p.min_dist = dist;
                p.cluster = Some(c);
            }
        }
    }
}

/// Per-cluster partial sums over a range of points.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterSums {
    pub sum_x: Vec<f64>,
    pub sum_y: Vec<f64>,
    pub counts: Vec<usize>,
    /// Sum of squared distances from each point to its assigned centroid.
    pub inertia: f64,
}

impl ClusterSums {
    pub fn new(k: usize) -> Self {
        ClusterSums {
            sum_x: vec![0.0; k],
            sum_y: vec![0.0; k],
            counts: vec![0; k],
            inertia: 0.0,
        }
    }

    pub fn k(&self) -> usize {
        self.counts.len()
    }

    /// Adds labelled points to the sums and resets their `min_dist` for the
    /// next epoch. Unlabelled points are skipped.
    pub fn accumulate(&mut self, points: &mut [Point]) {
        let k = self.k();
        for p in points.iter_mut() {
            if let Some(c) = p.cluster.filter(|&c| c < k) {
                self.sum_x[c] += p.x;
                self.sum_y[c] += p.y;
                self.counts[c] += 1;
                if p.min_dist.is_finite() {
                    self.inertia += p.min_dist;
                }
            }
            p.reset_distance();
        }
    }

    pub fn merge(&mut self, other: &ClusterSums) {
        for c in 0..self.k() {
            self.sum_x[c] += other.sum_x[c];
            self.sum_y[c] += other.sum_y[c];
            self.counts[c] += other.counts[c];
        }
        self.inertia += other.inertia;
    }

    /// Mean position of cluster `c`, or `None` when it has no points.
    pub fn mean(&self, c: usize) -> Option<Centroid> {
        match self.counts[c] {
            0 => None,
            n => Some(Centroid::new(
                self.sum_x[c] / n as f64,
                self.sum_y[c] / n as f64,
            )),
        }
    }
}

/// Update step: move every centroid to the mean of its points and apply
/// `policy` to the empty ones. Returns the indices of the empty clusters.
///
/// On error `centroids` is left untouched, so a failed epoch can be retried
/// from the same state.
pub fn apply_update<R: Rng + ?Sized>(
    centroids: &mut [Centroid],
    sums: &ClusterSums,
    points: &[Point],
    policy: EmptyClusterPolicy,
    epoch: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    let mut empty = Vec::new();
    // Committed only once every cluster has been handled.
    let mut updated = centroids.to_vec();

    for (c, centroid) in updated.iter_mut().enumerate() {
        match sums.mean(c) {
            Some(mean) => *centroid = mean,
            None => {
                empty.push(c);
                match policy {
                    EmptyClusterPolicy::KeepPrevious => {
                        warn!("Cluster {} is empty in epoch {}, keeping its centroid", c, epoch);
                    }
                    EmptyClusterPolicy::Reseed => {
                        let ri = rng.gen_range(0..points.len());
                        *centroid = Centroid::from_point(&points[ri]);
                        warn!(
                            "Cluster {} is empty in epoch {}, reseeded on point {}",
                            c, epoch, ri
                        );
                    }
                    EmptyClusterPolicy::Fail => {
                        return Err(ClusterError::DegenerateCluster { cluster: c, epoch });
                    }
                }
            }
        }
    }

    centroids.copy_from_slice(&updated);
    Ok(empty)
}

/// RMS movement of the centroids between two epochs.
fn centroid_shift(prev: &[Centroid], curr: &[Centroid]) -> f64 {
    if curr.is_empty() {
        return 0.0;
    }
    let delta_squared: f64 = prev
        .iter()
        .zip(curr)
        .map(|(a, b)| (a.x - b.x).powi(2) + (a.y - b.y).powi(2))
        .sum();
    (delta_squared / (curr.len() * 2) as f64).sqrt()
}

/// Assign one block and sum it.
fn process_block(block: &mut [Point], centroids: &[Centroid]) -> ClusterSums {
    assign_points(block, centroids);
    let mut sums = ClusterSums::new(centroids.len());
    sums.accumulate(block);
    sums
}

/// Lifecycle of a clustering run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Centroids are seeded, no epoch has run.
    Initialized,
    /// Some, but not all, epochs have completed.
    Running { completed: usize },
    /// Every configured epoch has completed.
    Done,
}

/// Summary of one epoch.
#[derive(Clone, Debug, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    pub counts: Vec<usize>,
    pub empty_clusters: Vec<usize>,
    pub inertia: f64,
    pub shift: f64,
}

/// Outcome of a completed run.
#[derive(Clone, Debug)]
pub struct ClusteringResult {
    /// Input points in input order, labelled.
    pub points: Vec<LabeledPoint>,
    pub centroids: Vec<Centroid>,
    pub epochs: usize,
    /// Inertia measured during the last epoch's assignment.
    pub inertia: f64,
    pub empty_cluster_events: usize,
    /// Seed of the run's random source, when the engine created it.
    pub seed: Option<u64>,
    pub elapsed: Duration,
}

impl ClusteringResult {
    pub fn labels(&self) -> Vec<Option<usize>> {
        self.points.iter().map(|p| p.cluster).collect()
    }
}

/// Fixed-epoch k-means engine.
pub struct KMeans {
    config: ClusteringConfig,
    pool: Option<ThreadPool>,
}

impl KMeans {
    pub fn new(config: ClusteringConfig) -> Result<Self> {
        config.check_parameters()?;

        let pool = match config.strategy {
            ExecutionStrategy::Serial => None,
            ExecutionStrategy::Parallel { threads } => {
                let threads = if threads == 0 {
                    default_num_threads()
                } else {
                    threads
                };
                let pool = ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("kmeans-worker-{i}"))
                    .build()?;
                Some(pool)
            }
        };

        Ok(KMeans { config, pool })
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Number of threads that work on an epoch.
    pub fn workers(&self) -> usize {
        self.pool
            .as_ref()
            .map(|p| p.current_num_threads())
            .unwrap_or(1)
    }

    /// Run every epoch with randomly sampled initial centroids. The random
    /// source is seeded from the config, or from the clock when unset.
    pub fn run(&self, store: &mut PointStore) -> Result<ClusteringResult> {
        let seed = self.config.seed.unwrap_or_else(time_seed);
        let run = self.start(store, StdRng::seed_from_u64(seed))?;
        let mut result = run.finish()?;
        result.seed = Some(seed);
        Ok(result)
    }

    /// Run every epoch from caller-provided initial centroids.
    pub fn run_with_centroids(
        &self,
        store: &mut PointStore,
        centroids: Vec<Centroid>,
    ) -> Result<ClusteringResult> {
        let seed = self.config.seed.unwrap_or_else(time_seed);
        let run = self.start_with_centroids(store, centroids, StdRng::seed_from_u64(seed))?;
        let mut result = run.finish()?;
        result.seed = Some(seed);
        Ok(result)
    }

    /// Validate, seed the centroids from `rng` and return a run ready to step.
    pub fn start<'a, R: Rng>(
        &'a self,
        store: &'a mut PointStore,
        mut rng: R,
    ) -> Result<ClusteringRun<'a, R>> {
        self.config.validate(store.len())?;
        let centroids = init_centroids(store, self.config.k, &mut rng)?;
        Ok(self.begin(store, centroids, rng))
    }

    pub fn start_with_centroids<'a, R: Rng>(
        &'a self,
        store: &'a mut PointStore,
        centroids: Vec<Centroid>,
        rng: R,
    ) -> Result<ClusteringRun<'a, R>> {
        self.config.validate(store.len())?;
        if centroids.len() != self.config.k {
            return Err(ClusterError::InvalidConfiguration(format!(
                "expected {} initial centroids, got {}",
                self.config.k,
                centroids.len()
            )));
        }
        if let Some(c) = centroids
            .iter()
            .position(|c| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(ClusterError::InvalidConfiguration(format!(
                "initial centroid {} is not finite",
                c
            )));
        }
        Ok(self.begin(store, centroids, rng))
    }

    fn begin<'a, R: Rng>(
        &'a self,
        store: &'a mut PointStore,
        centroids: Vec<Centroid>,
        rng: R,
    ) -> ClusteringRun<'a, R> {
        store.clear_labels();
        info!(
            "Starting k-means: n={}, k={}, epochs={}, strategy={}, workers={}",
            store.len(),
            self.config.k,
            self.config.epochs,
            self.config.strategy,
            self.workers()
        );
        ClusteringRun {
            engine: self,
            store,
            centroids,
            rng,
            state: RunState::Initialized,
            last_report: None,
            empty_cluster_events: 0,
            started: Instant::now(),
        }
    }

    /// One fork-join pass: assign and sum every block, then merge the partial
    /// sums in block order.
    fn assign_and_sum(&self, points: &mut [Point], centroids: &[Centroid]) -> ClusterSums {
        let partials: Vec<ClusterSums> = match &self.pool {
            None => points
                .chunks_mut(BLOCK_SIZE)
                .map(|block| process_block(block, centroids))
                .collect(),
            Some(pool) => pool.install(|| {
                points
                    .par_chunks_mut(BLOCK_SIZE)
                    .map(|block| process_block(block, centroids))
                    .collect()
            }),
        };

        let mut total = ClusterSums::new(centroids.len());
        for partial in &partials {
            total.merge(partial);
        }
        total
    }
}

/// A run in progress. Each [`step`](ClusteringRun::step) performs one epoch.
pub struct ClusteringRun<'a, R: Rng> {
    engine: &'a KMeans,
    store: &'a mut PointStore,
    centroids: Vec<Centroid>,
    rng: R,
    state: RunState,
    last_report: Option<EpochReport>,
    empty_cluster_events: usize,
    started: Instant,
}

impl<'a, R: Rng> ClusteringRun<'a, R> {
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn centroids(&self) -> &[Centroid] {
        &self.centroids
    }

    pub fn store(&self) -> &PointStore {
        self.store
    }

    pub fn epochs_completed(&self) -> usize {
        match self.state {
            RunState::Initialized => 0,
            RunState::Running { completed } => completed,
            RunState::Done => self.engine.config.epochs,
        }
    }

    /// Run the next epoch. Returns `None` once the run is done.
    ///
    /// If the epoch fails, the centroids and state stay as they were before
    /// the call.
    pub fn step(&mut self) -> Result<Option<EpochReport>> {
        if self.state == RunState::Done {
            return Ok(None);
        }

        let epoch = self.epochs_completed();
        let engine = self.engine;
        let config = &engine.config;

        let sums = engine.assign_and_sum(self.store.points_mut(), &self.centroids);

        let previous = self.centroids.clone();
        let empty_clusters = apply_update(
            &mut self.centroids,
            &sums,
            self.store.points(),
            config.empty_cluster_policy,
            epoch,
            &mut self.rng,
        )?;
        self.empty_cluster_events += empty_clusters.len();

        let shift = centroid_shift(&previous, &self.centroids);
        debug!(
            "Epoch {}: inertia={:.6}, centroid shift={:.6}",
            epoch, sums.inertia, shift
        );

        let completed = epoch + 1;
        self.state = if completed >= config.epochs {
            RunState::Done
        } else {
            RunState::Running { completed }
        };

        let report = EpochReport {
            epoch,
            counts: sums.counts,
            empty_clusters,
            inertia: sums.inertia,
            shift,
        };
        self.last_report = Some(report.clone());
        Ok(Some(report))
    }

    /// Run the remaining epochs and collect the result.
    pub fn finish(mut self) -> Result<ClusteringResult> {
        while self.step()?.is_some() {}

        let elapsed = self.started.elapsed();
        let inertia = self.last_report.as_ref().map_or(0.0, |r| r.inertia);
        info!(
            "Finished {} epochs in {:?} (inertia {:.6}, {} empty-cluster events)",
            self.engine.config.epochs, elapsed, inertia, self.empty_cluster_events
        );

        Ok(ClusteringResult {
            points: self.store.labeled_points(),
            centroids: self.centroids,
            epochs: self.engine.config.epochs,
            inertia,
            empty_cluster_events: self.empty_cluster_events,
            seed: None,
            elapsed,
        })
    }
}
