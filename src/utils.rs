use crate::error::{ClusterError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seed used when the caller does not pin one: nanoseconds since the epoch.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Number of workers to use when the configuration asks for "all cores".
pub fn default_num_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Generate `count` points scattered uniformly within `spread` of `clusters`
/// random centers in `[-100, 100)^2`.
///
/// Batches are generated in parallel, each from its own seeded RNG, so the
/// output only depends on the arguments. `spread` must be non-negative and
/// small enough that the sampling interval `[-spread, spread)` has a finite
/// width.
pub fn generate_blobs(
    count: usize,
    clusters: usize,
    spread: f64,
    seed: u64,
) -> Result<Vec<(f64, f64)>> {
    if !(2.0 * spread).is_finite() || spread < 0.0 {
        return Err(ClusterError::InvalidConfiguration(format!(
            "spread must be a finite, non-negative number, got {}",
            spread
        )));
    }
    let clusters = clusters.max(1);
    let mut rng = StdRng::seed_from_u64(seed);
    let centers: Vec<(f64, f64)> = (0..clusters)
        .map(|_| (rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)))
        .collect();

    let batch_size = 4096;
    let total_batches = (count + batch_size - 1) / batch_size;

    let points: Vec<(f64, f64)> = (0..total_batches)
        .into_par_iter()
        .flat_map_iter(|batch_num| {
            let start_idx = batch_num * batch_size;
            let end_idx = ((batch_num + 1) * batch_size).min(count);
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(batch_num as u64 + 1));
            let centers = &centers;

            (start_idx..end_idx)
                .map(move |i| {
                    let (cx, cy) = centers[i % clusters];
                    if spread > 0.0 {
                        (
                            cx + rng.gen_range(-spread..spread),
                            cy + rng.gen_range(-spread..spread),
                        )
                    } else {
                        (cx, cy)
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect();

    Ok(points)
}
