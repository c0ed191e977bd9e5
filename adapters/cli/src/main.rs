#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Waypoint Defence sessions headlessly.

mod driver;
mod logging;
mod text_backend;
mod tower_arg;

use std::{io, time::Duration};

use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use waypoint_defence_world::WorldConfig;

use crate::{driver::Driver, text_backend::TextBackend, tower_arg::TowerArg};

/// Headless tower defence along a fixed waypoint path
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for enemy speed jitter
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of frames simulated per session
    #[arg(long, default_value_t = 20_000)]
    frames: u64,
    /// Simulated duration of a frame in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Tower position as X,Y; may be repeated
    #[arg(long = "tower", value_name = "X,Y")]
    towers: Vec<TowerArg>,
    /// Print the HUD every N frames; 0 prints only the summary
    #[arg(long, default_value_t = 60)]
    report_every: u64,
    /// Number of sessions to play, restarting after each one
    #[arg(long, default_value_t = 1)]
    sessions: u32,
    /// Raise log detail; repeat for trace output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Entry point for the Waypoint Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    logging::install(args.verbose)?;

    let mut config = WorldConfig::default();
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut driver = Driver::new(config, Duration::from_millis(args.frame_ms));
    let stdout = io::stdout();
    let mut backend = TextBackend::new(stdout.lock(), args.report_every);

    for session in 1..=args.sessions.max(1) {
        if session > 1 {
            let _ = driver.restart();
        }

        for TowerArg(position) in &args.towers {
            match driver.place_tower(*position) {
                Some(Ok(tower)) => info!("tower {tower} placed at {position}"),
                Some(Err(error)) => warn!("tower at {position} rejected: {error}"),
                None => warn!("no verdict for tower at {position}"),
            }
        }

        let started = driver.frames();
        let outcome = driver.run(args.frames, &mut backend)?;
        let elapsed = driver.frames() - started;
        match outcome {
            Some(outcome) => info!(
                "session {session} ended after {elapsed} frames: {}",
                outcome.title()
            ),
            None => info!("session {session} ran {elapsed} frames without an outcome"),
        }
    }

    Ok(())
}
