//! SALVO CLI
//!
//! Runs the demo engagement headlessly under a jittered host frame loop.

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use salvo_app::host::{HostLoop, HostSettings};
use salvo_app::scenario;
use salvo_sim::{SimConfig, SimulationRegistry};

#[derive(Parser, Debug)]
#[command(name = "salvo")]
#[command(about = "Run the missile salvo simulation headlessly", long_about = None)]
struct Args {
    /// Master seed for the registry and the host jitter
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum host frames to run
    #[arg(short, long, default_value = "7200")]
    frames: u64,

    /// Nominal host frame rate (Hz)
    #[arg(long, default_value = "60")]
    fps: f64,

    /// Fractional frame-time jitter (0.25 = +/-25%)
    #[arg(long, default_value = "0.25")]
    jitter: f64,

    /// Number of salvos to launch
    #[arg(long, default_value = "6")]
    salvos: usize,

    /// Missiles per salvo
    #[arg(short, long, default_value = "4")]
    missiles: usize,

    /// Host time multiplier (overrides the config file)
    #[arg(short = 't', long)]
    time_scale: Option<f64>,

    /// JSON registry config (seed, time_scale, target_update_interval)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    /// Print the final snapshot as JSON instead of the run summary
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SimConfig::from_json_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(time_scale) = args.time_scale {
        config.time_scale = time_scale;
    }
    config.validate()?;
    Ok(config)
}

/// Filter used when RUST_LOG is unset.
fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::new(if verbose { "debug" } else { "info" })
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(args.verbose));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting tracing subscriber")?;

    ensure!(
        args.fps.is_finite() && args.fps >= 1.0,
        "--fps must be at least 1, got {}",
        args.fps
    );

    let config = load_config(&args)?;
    info!(
        seed = config.seed,
        time_scale = config.time_scale,
        target_update_interval = config.target_update_interval,
        "starting salvo run"
    );

    let mut registry = SimulationRegistry::new(config.clone())?;
    scenario::build_demo(&mut registry, args.salvos, args.missiles)?;

    let mut host = HostLoop::new(
        registry,
        HostSettings {
            fps: args.fps,
            jitter: args.jitter,
            seed: config.seed,
        },
    );
    let summary = host.run(args.frames);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&host.registry().snapshot())?);
    } else {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
