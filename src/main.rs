use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;

use lattice_snn::backend::{Backend, RecordingBackend};
use lattice_snn::network::config::LatticeConfig;
use lattice_snn::network::lattice::LatticeNetwork;

/// Wire a lattice of excitatory and inhibitory units and run it against the recording backend.
#[derive(Parser, Debug)]
#[command(name = "lattice_snn", version)]
struct Cli {
    /// JSON configuration file (defaults are used for missing fields)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed of the wiring
    #[arg(long)]
    seed: Option<u64>,

    /// Number of units on one side of the cube
    #[arg(long)]
    lattice_size: Option<usize>,

    /// Number of target shards wired concurrently
    #[arg(long)]
    shards: Option<usize>,

    /// Write the wired projections to this JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LatticeConfig::from_json_file(path)?,
        None => LatticeConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.wiring_seed = seed;
    }
    if let Some(size) = cli.lattice_size {
        config.lattice_size = size;
    }
    if let Some(shards) = cli.shards {
        config.num_shards = shards;
    }

    let network = LatticeNetwork::build(config)?;
    let mut backend = RecordingBackend::build(network.config().lim_delays())?;
    network.run_protocol(&mut backend)?;

    for projection in network.projections() {
        let timings = &projection.wiring.timings;
        log::info!(
            "{}: {} connections, {} delays clipped ({} warnings), wired in {:?} (sampling {:?}, distances {:?}, delays {:?}, clipping {:?}, connecting {:?})",
            projection.kind,
            projection.num_connections(),
            projection.wiring.num_clipped,
            projection.wiring.clip_warnings.len(),
            timings.total(),
            timings.sampling,
            timings.distances,
            timings.delays,
            timings.clipping,
            timings.connecting
        );
    }
    log::info!(
        "Simulated {} ms with {} connections ({} from background ghost units)",
        backend.time(),
        backend.num_connections(),
        network.num_background_connections()
    );

    if let Some(path) = &cli.output {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), network.projections())?;
        log::info!("Projections written to {}", path.display());
    }

    Ok(())
}
