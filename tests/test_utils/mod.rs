use point_clusterer::{Centroid, ClusteringConfig, ExecutionStrategy, LabeledPoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;

/// Create points scattered around well-separated centers.
/// Returns (points, true_labels)
#[allow(dead_code)]
pub fn create_gaussian_points(
    num_clusters: usize,
    points_per_cluster: usize,
    separation: f64,
    seed: u64,
) -> (Vec<(f64, f64)>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);

    let total_points = num_clusters * points_per_cluster;
    let mut points = Vec::with_capacity(total_points);
    let mut true_labels = Vec::with_capacity(total_points);

    for cluster_id in 0..num_clusters {
        let center = (cluster_id as f64 * separation, cluster_id as f64 * 0.5 * separation);

        for _ in 0..points_per_cluster {
            let noise_x: f64 = rng.gen_range(-0.5..0.5);
            let noise_y: f64 = rng.gen_range(-0.5..0.5);
            points.push((center.0 + noise_x, center.1 + noise_y));
            true_labels.push(cluster_id);
        }
    }

    (points, true_labels)
}

/// Generate deterministic points in [-10, 10)^2
#[allow(dead_code)]
pub fn create_deterministic_points(n: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0)))
        .collect()
}

#[allow(dead_code)]
pub fn squared_distance(x: f64, y: f64, c: &Centroid) -> f64 {
    (x - c.x).powi(2) + (y - c.y).powi(2)
}

/// Index of the nearest centroid, lowest index winning ties
#[allow(dead_code)]
pub fn nearest_centroid(x: f64, y: f64, centroids: &[Centroid]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(x, y, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = c;
        }
    }
    best
}

/// Within-cluster sum of squares
#[allow(dead_code)]
pub fn calculate_inertia(points: &[LabeledPoint], centroids: &[Centroid]) -> f64 {
    points
        .iter()
        .map(|p| squared_distance(p.x, p.y, &centroids[p.cluster.expect("unlabelled point")]))
        .sum()
}

/// Componentwise mean of the given coordinates
#[allow(dead_code)]
pub fn mean_of(points: &[(f64, f64)]) -> (f64, f64) {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
    (sx / n, sy / n)
}

#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

#[allow(dead_code)]
pub fn serial_config(k: usize, epochs: usize, seed: u64) -> ClusteringConfig {
    ClusteringConfig::new(k)
        .with_epochs(epochs)
        .with_seed(seed)
        .with_strategy(ExecutionStrategy::Serial)
}

#[allow(dead_code)]
pub fn parallel_config(k: usize, epochs: usize, seed: u64, threads: usize) -> ClusteringConfig {
    ClusteringConfig::new(k)
        .with_epochs(epochs)
        .with_seed(seed)
        .with_strategy(ExecutionStrategy::Parallel { threads })
}

#[allow(dead_code)]
pub const TEST_OUTPUT_DIR: &str = "test_output";

/// Remove the shared output directory used by file tests
#[allow(dead_code)]
pub fn cleanup_test_files() {
    let _ = fs::remove_dir_all(TEST_OUTPUT_DIR);
}
