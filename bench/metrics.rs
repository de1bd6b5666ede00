use std::time::Duration;

/// Wall-clock samples of repeated runs, in seconds
pub struct TimingSamples {
    samples: Vec<f64>,
}

impl TimingSamples {
    pub fn new() -> Self {
        TimingSamples {
            samples: Vec::new(),
        }
    }

    pub fn record_duration(&mut self, duration: Duration) {
        self.samples.push(duration.as_secs_f64());
    }

    /// Compute percentile (0.0 to 1.0, e.g., 0.5 for the median)
    pub fn percentile(&self, p: f64) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }

        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let index = ((sorted.len() as f64 * p).ceil() as usize).saturating_sub(1);
        let index = index.min(sorted.len() - 1);
        Some(sorted[index])
    }

    pub fn median(&self) -> Option<f64> {
        self.percentile(0.5)
    }

    pub fn min(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::min)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

impl Default for TimingSamples {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute basic statistics from a slice of values
pub fn compute_stats(values: &[f64]) -> (f64, f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0, 0.0);
    }

    let sum: f64 = values.iter().sum();
    let mean = sum / values.len() as f64;

    let variance: f64 =
        values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64;
    let std_dev = variance.sqrt();

    let min = values.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

    (mean, std_dev, max - min) // mean, std_dev, range
}
