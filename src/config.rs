use crate::api::ClusteringConfig;
use crate::error::Result;
use crate::kmeans::{EmptyClusterPolicy, ExecutionStrategy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Serial,
    #[default]
    Parallel,
}

/// Settings for one CLI run, loadable from YAML. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Skip the first record of the input.
    pub has_header: bool,
    pub k: usize,
    pub epochs: usize,
    pub strategy: StrategyKind,
    /// Worker count for the parallel strategy; 0 uses every core.
    pub threads: usize,
    pub seed: Option<u64>,
    pub empty_clusters: EmptyClusterPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            input: PathBuf::from("accBalVsTA.csv"),
            output: PathBuf::from("output.csv"),
            has_header: false,
            k: 5,
            epochs: 100,
            strategy: StrategyKind::default(),
            threads: 0,
            seed: None,
            empty_clusters: EmptyClusterPolicy::default(),
        }
    }
}

impl RunConfig {
    /// Load config from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn execution_strategy(&self) -> ExecutionStrategy {
        match self.strategy {
            StrategyKind::Serial => ExecutionStrategy::Serial,
            StrategyKind::Parallel => ExecutionStrategy::Parallel {
                threads: self.threads,
            },
        }
    }

    pub fn clustering_config(&self) -> ClusteringConfig {
        let mut cfg = ClusteringConfig::new(self.k)
            .with_epochs(self.epochs)
            .with_strategy(self.execution_strategy())
            .with_empty_cluster_policy(self.empty_clusters);
        cfg.seed = self.seed;
        cfg
    }
}
