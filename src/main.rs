//! Pairwise Field Demos
//!
//! Headless driver: builds one preset scene, steps it once per frame and logs
//! what a renderer would draw.

mod demos;

use anyhow::Result;
use clap::Parser;
use demos::{Demo, SceneOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(about = "Run a pairwise field demo without a window")]
struct Args {
    /// Which demo to run
    #[arg(short, long, value_enum, default_value_t = Demo::Charges)]
    demo: Demo,

    /// Frames to simulate
    #[arg(short, long, default_value_t = 600)]
    steps: u64,

    /// Time step per frame
    #[arg(long, default_value_t = 1.0)]
    dt: f64,

    /// Bodies to spawn (skyrmions: >1 spawns a pair)
    #[arg(short, long, default_value_t = 8)]
    bodies: usize,

    /// Add downward gravity to the magnetic demo
    #[arg(long)]
    gravity: bool,

    /// Frames between summaries
    #[arg(long, default_value_t = 60)]
    report_every: u64,

    /// RNG seed for body placement
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting pairwise field demo {:?}...", args.demo);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let options = SceneOptions {
        bodies: args.bodies,
        gravity: args.gravity,
    };
    let mut scene = demos::build(args.demo, options, &mut rng)?;

    let report_every = args.report_every.max(1);
    scene.report(0)?;
    for frame in 1..=args.steps {
        scene.advance(args.dt)?;
        if frame % report_every == 0 {
            scene.report(frame)?;
        }
    }

    log::info!("✓ Finished {} frames of {}", args.steps, scene.name());
    Ok(())
}
