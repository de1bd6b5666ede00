use clap::{Parser, Subcommand, ValueEnum};
use point_clusterer::io::write_points;
use point_clusterer::utils::generate_blobs;
use point_clusterer::{Clusterer, EmptyClusterPolicy, Result, RunConfig, StrategyKind};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "point_clusterer")]
#[command(version, about = "Fixed-epoch k-means clustering of 2-D points", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster the points of a CSV file and write the labelled points
    Run {
        /// YAML file with run settings; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Input CSV with `x,y` records
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output CSV with `x,y,c` records
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of clusters
        #[arg(short)]
        k: Option<usize>,

        /// Number of epochs
        #[arg(short, long)]
        epochs: Option<usize>,

        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Worker threads for the parallel strategy (0 = all cores)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Seed for centroid sampling (default: derived from the clock)
        #[arg(long)]
        seed: Option<u64>,

        /// What to do when a cluster ends an epoch with no points
        #[arg(long, value_enum)]
        empty_clusters: Option<PolicyArg>,

        /// The input starts with a header record
        #[arg(long)]
        header: bool,
    },

    /// Write a synthetic point cloud usable as input
    Generate {
        #[arg(short, long)]
        output: PathBuf,

        #[arg(short = 'n', long, default_value_t = 100_000)]
        points: usize,

        /// Number of blobs the points are scattered around
        #[arg(short, long, default_value_t = 5)]
        clusters: usize,

        /// Half-width of the square each blob fills
        #[arg(short, long, default_value_t = 10.0)]
        spread: f64,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Serial,
    Parallel,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Keep,
    Reseed,
    Fail,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = execute(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            config,
            input,
            output,
            k,
            epochs,
            strategy,
            threads,
            seed,
            empty_clusters,
            header,
        } => {
            let mut cfg = match config {
                Some(path) => RunConfig::from_file(path)?,
                None => RunConfig::default(),
            };
            if let Some(input) = input {
                cfg.input = input;
            }
            if let Some(output) = output {
                cfg.output = output;
            }
            if let Some(k) = k {
                cfg.k = k;
            }
            if let Some(epochs) = epochs {
                cfg.epochs = epochs;
            }
            if let Some(strategy) = strategy {
                cfg.strategy = match strategy {
                    StrategyArg::Serial => StrategyKind::Serial,
                    StrategyArg::Parallel => StrategyKind::Parallel,
                };
            }
            if let Some(threads) = threads {
                cfg.threads = threads;
            }
            if seed.is_some() {
                cfg.seed = seed;
            }
            if let Some(policy) = empty_clusters {
                cfg.empty_clusters = match policy {
                    PolicyArg::Keep => EmptyClusterPolicy::KeepPrevious,
                    PolicyArg::Reseed => EmptyClusterPolicy::Reseed,
                    PolicyArg::Fail => EmptyClusterPolicy::Fail,
                };
            }
            cfg.has_header |= header;

            run(&cfg)
        }
        Commands::Generate {
            output,
            points,
            clusters,
            spread,
            seed,
        } => {
            println!("Generating {} points around {} centers...", points, clusters);
            let data = generate_blobs(points, clusters, spread, seed)?;
            write_points(&output, &data)?;
            println!("Points saved to {}", output.display());
            Ok(())
        }
    }
}

fn run(cfg: &RunConfig) -> Result<()> {
    let clusterer = Clusterer::new(cfg.clustering_config())?;

    let start = Instant::now();
    let result = clusterer.cluster_file(&cfg.input, &cfg.output, cfg.has_header)?;
    let period = start.elapsed().as_secs_f64();

    let prefix = match cfg.strategy {
        StrategyKind::Serial => "",
        StrategyKind::Parallel => "Parallel ",
    };
    println!("{}Executed in {:.6} secs", prefix, period);

    println!(
        "Clustered {} points into {} clusters (inertia {:.4}, seed {})",
        result.points.len(),
        result.centroids.len(),
        result.inertia,
        result
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "n/a".to_string())
    );
    for (i, c) in result.centroids.iter().enumerate() {
        println!("  Centroid {}: ({:.6}, {:.6})", i, c.x, c.y);
    }
    println!("Labelled points written to {}", cfg.output.display());
    Ok(())
}
