//! Random-game simulator.
//!
//! Plays games in which every power issues random legal orders and writes
//! one JSON summary line per game.
//!
//! Usage:
//!   cargo run --release --bin simulate -- --games 100 --seed 7 --output runs.jsonl

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use concordat::config::{GameConfig, SimulationConfig};
use concordat::simulate;

/// Run random Diplomacy games in parallel
#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Play random games and print one JSON summary per game")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Worker threads (0 = one per core)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Random seed, 0 for entropy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop games still running after this year
    #[arg(long, default_value_t = 1920)]
    max_year: u16,

    /// Game config as a JSON file
    #[arg(long)]
    config: Option<String>,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    output: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("concordat=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let game = match &args.config {
        Some(path) => GameConfig::from_json(&fs::read_to_string(path)?)?,
        None => GameConfig::default(),
    };
    let config = SimulationConfig {
        games: args.games,
        threads: args.threads,
        seed: args.seed,
        max_year: args.max_year,
        game,
    };

    let start = Instant::now();
    let summaries = simulate::run_simulation(&config)?;
    tracing::info!(elapsed_secs = start.elapsed().as_secs_f64(), "done");

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    simulate::write_jsonl(&summaries, &mut out)?;
    out.flush()?;
    Ok(())
}
