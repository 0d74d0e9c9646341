//! # Headless Run
//!
//! Drives the particle field on a virtual clock with no window or GPU and
//! prints what it would have drawn. Frames arrive every 1/60 s; an optional
//! resize lands part-way through to show the debounced regeneration.
//!
//! Run with: `cargo run --example headless -- --frames 300 --resize-to 480`

use std::time::Duration;

use ambient_field::prelude::*;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Headless particle field run with a virtual clock
#[derive(Parser, Debug)]
#[command(name = "ambient-field-headless")]
#[command(about = "Step the ambient particle field without a window", long_about = None)]
struct Args {
    /// Viewport width in logical pixels
    #[arg(short, long, default_value_t = 1000.0)]
    width: f32,

    /// Viewport height in logical pixels
    #[arg(long, default_value_t = 700.0)]
    height: f32,

    /// Device pixel ratio
    #[arg(long, default_value_t = 1.0)]
    dpr: f32,

    /// Number of display refreshes to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u32,

    /// Resize to this width halfway through
    #[arg(short, long)]
    resize_to: Option<f32>,

    /// Report interval in frames
    #[arg(long, default_value_t = 120)]
    report_every: u32,

    /// Seed for a reproducible field
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
}

const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let env = Environment::new(Viewport::new(args.width, args.height, args.dpr));

    let Some(mut renderer) = ParticleFieldRenderer::create(
        FieldConfig::default().with_seed(args.seed),
        &env,
        Some(DisplayList::new()),
        ManualScheduler::new(),
    ) else {
        info!("particle field disabled");
        return;
    };

    println!("=== Ambient Field (headless) ===");
    println!("Viewport: {} x {} @ {}x", args.width, args.height, args.dpr);
    println!("Particles: {}", renderer.field().len());
    println!();

    renderer.start();
    let mut peak_links = 0usize;

    for frame in 1..=args.frames {
        if frame == args.frames / 2 {
            if let Some(width) = args.resize_to {
                renderer.on_resize(Viewport::new(width, args.height, args.dpr));
            }
        }

        for timer in renderer.scheduler_mut().advance(FRAME_INTERVAL) {
            if renderer.on_timer(timer) {
                info!(particles = renderer.field().len(), "regenerated after resize");
            }
        }
        for handle in renderer.scheduler_mut().take_frames() {
            renderer.on_frame(handle);
        }

        let links = renderer.surface().lines().count();
        peak_links = peak_links.max(links);

        if args.report_every > 0 && frame % args.report_every == 0 {
            let t = renderer.scheduler().now().as_secs_f32();
            println!(
                "t={:6.2}s  frame {:5}  particles {:3}  links {:4}",
                t,
                renderer.frames_rendered(),
                renderer.field().len(),
                links
            );
        }
    }

    println!();
    println!("Frames rendered: {}", renderer.frames_rendered());
    println!("Peak links in one frame: {}", peak_links);
    println!("Frames requested: {}", renderer.scheduler().frames_requested());

    renderer.dispose();
}
