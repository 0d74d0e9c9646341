use std::process::ExitCode;

use ambient_field::config::{LINK_DISTANCE, MAX_PARTICLES};
use ambient_field::window::{self, WindowOptions};
use ambient_field::FieldConfig;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Ambient particle field in a window.
#[derive(Parser, Debug)]
#[command(name = "ambient-field", version, about)]
struct Args {
    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Seed for a reproducible field
    #[arg(long)]
    seed: Option<u64>,

    /// Behave as if the user prefers reduced motion (no animation)
    #[arg(long)]
    reduced_motion: bool,

    /// Upper bound on particle count
    #[arg(long, default_value_t = MAX_PARTICLES)]
    max_particles: usize,

    /// Distance under which particles are linked
    #[arg(long, default_value_t = LINK_DISTANCE)]
    link_distance: f32,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = FieldConfig::default()
        .with_max_particles(args.max_particles)
        .with_link_distance(args.link_distance);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let options = WindowOptions {
        width: args.width,
        height: args.height,
        reduced_motion: args.reduced_motion,
        ..WindowOptions::default()
    };

    match window::run(config, options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
