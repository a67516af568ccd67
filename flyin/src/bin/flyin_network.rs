use anyhow::{Context, Result};
use clap::Parser;
use flyin::{BaseGraph, Instance, Map};
use std::io::Write;
use std::path::PathBuf;
use tenet::{Parameters, build_network};

/// Builds the time-expanded network of a drone map and prints its edges.
///
/// Without a map, the network of a small three-hub instance is printed.
#[derive(Debug, Parser)]
#[command(name = "flyin-network", rename_all = "kebab-case")]
struct Args {
    /// Path to the map file.
    map: Option<PathBuf>,
    /// Last time step of the network. Defaults to the time needed for all drones to reach the end hub.
    #[arg(long)]
    horizon: Option<u32>,
    /// Maximum number of outgoing edges of a node (overrides TENET_MAX_OUT_DEGREE).
    #[arg(long)]
    max_out_degree: Option<usize>,
    /// Only print the size of the network instead of its edges.
    #[arg(long)]
    summary: bool,
    /// Annotate each node with the hub or route and the step it stands for.
    #[arg(long)]
    labels: bool,
    /// Logging level to use: one of "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "warn")]
    log_level: tracing::Level,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // logs go to stderr, stdout only receives the network
    let subscriber = tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::Uptime::from(std::time::Instant::now()))
        .with_writer(std::io::stderr)
        .with_max_level(args.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut params = match &args.map {
        Some(path) => {
            anyhow::ensure!(path.exists(), "Map file {} does not exist", path.display());
            let text = std::fs::read_to_string(path).with_context(|| format!("Unable to read {}", path.display()))?;
            let map = Map::parse(&text).with_context(|| format!("Invalid map {}", path.display()))?;
            let mut instance = Instance::new(BaseGraph::new(&map)?)?;
            if let Some(horizon) = args.horizon {
                instance = instance.with_horizon(horizon);
            }
            tracing::info!(
                hubs = instance.graph.num_hubs(),
                drones = instance.graph.nb_drones(),
                min_turns = instance.min_turns,
                horizon = instance.horizon(),
            );
            for &hub in &instance.priority_hubs {
                tracing::info!(hub = instance.hub_name(hub), "priority");
            }
            instance.parameters
        }
        None => {
            let params = Parameters::demo();
            match args.horizon {
                Some(horizon) => params.with_horizon(horizon),
                None => params,
            }
        }
    };
    if let Some(max_out_degree) = args.max_out_degree {
        params = params.with_max_out_degree(max_out_degree);
    }

    let network = build_network(&params)?;
    let mut out = std::io::stdout().lock();
    if args.summary {
        writeln!(out, "nodes: {}", network.total_nodes())?;
        writeln!(out, "edges: {} ({})", network.num_edges(), network.edge_counts())?;
    } else {
        write!(out, "{}", network.dump().with_labels(args.labels))?;
    }
    out.flush()?;
    Ok(())
}
