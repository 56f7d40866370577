//! Command-line runner: load a JSON game configuration, play one round,
//! print the result as pretty JSON on stdout.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use sl_engine::{GameConfig, play_round};

#[derive(Debug, Parser)]
#[command(name = "sl-cli", about = "Evaluate one round of a scratch-card game")]
struct Args {
    /// Path to the JSON game configuration
    #[arg(long)]
    config: PathBuf,

    /// Amount bet on the round, must be greater than 0
    #[arg(long = "betting-amount")]
    betting_amount: f64,

    /// Seed for the random source; omit for an OS-seeded round
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    ensure!(
        args.betting_amount > 0.0,
        "please specify a betting amount greater than 0"
    );

    let json = fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file '{}'", args.config.display()))?;
    let config = GameConfig::from_json(&json)
        .with_context(|| format!("invalid game configuration '{}'", args.config.display()))?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    info!(
        "playing one {}x{} round, betting amount {}",
        config.rows(),
        config.columns(),
        args.betting_amount
    );
    let result = play_round(&config, args.betting_amount, &mut rng)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
