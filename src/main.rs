use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fluid_canvas::{run_headless, FluidConfig, HeadlessOptions, Simulation, SimulationError};
use tracing_subscriber::EnvFilter;

/// Paint with swirling, glowing particles.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Arguments {
    /// JSON file with tuning overrides.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the particle RNG (overrides the config file).
    #[arg(short, long)]
    seed: Option<u64>,

    /// Window width, or canvas width when headless.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Window height, or canvas height when headless.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Run a scripted stroke without opening a window.
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode.
    #[arg(long, default_value_t = 300)]
    frames: u32,

    /// Write the last headless frame to this PNG.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run(arguments: Arguments) -> Result<(), SimulationError> {
    let mut config = match &arguments.config {
        Some(path) => FluidConfig::load(path)?,
        None => FluidConfig::default(),
    };
    if arguments.seed.is_some() {
        config.seed = arguments.seed;
    }

    if arguments.headless {
        let options = HeadlessOptions {
            width: arguments.width,
            height: arguments.height,
            output: arguments.output,
            ..HeadlessOptions::default()
        }
        .with_frames(arguments.frames);
        let (_, report) = run_headless(config, &options)?;
        println!(
            "{} frames, {} particles emitted, {} alive",
            report.frames, report.emitted, report.live
        );
        return Ok(());
    }

    Simulation::new()
        .with_config(config)
        .with_window_size(arguments.width, arguments.height)
        .run()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Arguments::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{}", error);
            ExitCode::FAILURE
        }
    }
}
