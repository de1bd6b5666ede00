mod api;
pub use api::{run_kmeans, Clusterer, ClusteringConfig};

// Fully re-exported below.
mod config;
mod error;
mod point_store;

// The engine's individual steps, the CSV collaborator and the data helpers
// are used directly by the binaries.
pub mod io;
pub mod kmeans;
pub mod utils;

pub use config::{RunConfig, StrategyKind};
pub use error::{ClusterError, Result};
pub use kmeans::{
    Centroid, ClusteringResult, ClusteringRun, EmptyClusterPolicy, EpochReport,
    ExecutionStrategy, KMeans, RunState,
};
pub use point_store::{LabeledPoint, Point, PointStore};
