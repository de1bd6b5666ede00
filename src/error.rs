use thiserror::Error;

/// Errors produced while configuring, running or feeding the clustering engine.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Input contains no points")]
    EmptyInput,

    #[error("Point {index} has a non-finite coordinate ({x}, {y})")]
    InvalidPoint { index: usize, x: f64, y: f64 },

    #[error("Cluster {cluster} received no points in epoch {epoch}")]
    DegenerateCluster { cluster: usize, epoch: usize },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, ClusterError>;
