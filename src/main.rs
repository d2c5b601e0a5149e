//! Concordat -- a Diplomacy adjudicator driven over stdin.
//!
//! Reads one command per line and writes responses to stdout. Diagnostics
//! go through `tracing` on stderr; set `RUST_LOG` to change the level.

use std::fs;
use std::io::{self, BufRead, Write};

use concordat::board::ALL_POWERS;
use concordat::config::GameConfig;
use concordat::game::Game;
use concordat::protocol::dfen::encode_dfen;
use concordat::protocol::parser::{parse_command, Command, RollbackPoint};

/// Runs the command loop until `quit` or end of input.
fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("concordat=info")),
        )
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut game = Game::new(GameConfig::default());

    for line in stdin.lock().lines() {
        let Some(cmd) = parse_command(&line?) else {
            continue;
        };

        match cmd {
            Command::NewGame { config } => {
                let config = match config.as_deref().map(GameConfig::from_json).transpose() {
                    Ok(config) => config.unwrap_or_default(),
                    Err(e) => {
                        writeln!(out, "error {e}")?;
                        out.flush()?;
                        continue;
                    }
                };
                game = Game::new(config);
                writeln!(out, "game {} {}", game.game_id(), game.current_phase())?;
            }
            Command::Orders { power, orders } => {
                let texts: Vec<&str> = orders.iter().map(String::as_str).collect();
                for report in game.set_orders(power, &texts) {
                    match report.outcome {
                        Ok(order) => writeln!(out, "ok {order}")?,
                        Err(e) => writeln!(out, "rejected {} : {e}", report.text)?,
                    }
                }
            }
            Command::Process => match game.process() {
                Ok(()) => {
                    if let Some(phase) = game.previous_phase() {
                        for r in game.results(phase).unwrap_or_default() {
                            writeln!(out, "result {} {} : {}", r.power, r.order, r.result.as_str())?;
                        }
                    }
                    writeln!(out, "phase {}", game.current_phase())?;
                    if game.is_done() {
                        writeln!(out, "status {:?}", game.status())?;
                    }
                }
                Err(e) => writeln!(out, "error {e}")?,
            },
            Command::Phase => writeln!(out, "phase {}", game.current_phase())?,
            Command::State => writeln!(out, "state {}", encode_dfen(game.state()))?,
            Command::Possible { power } => {
                let powers = power.map_or(ALL_POWERS.to_vec(), |p| vec![p]);
                for power in powers {
                    for province in game.orderable_locations(power) {
                        let orders = concordat::movegen::possible_orders(province, game.state());
                        let list: Vec<String> = orders.iter().map(|o| o.to_string()).collect();
                        writeln!(out, "possible {power} {} : {}", province.abbr(), list.join(" ; "))?;
                    }
                }
            }
            Command::Rollback { point, phase, preserve } => {
                let rolled = match point {
                    RollbackPoint::Start => game.rolled_back_to_phase_start(phase, preserve),
                    RollbackPoint::End => game.rolled_back_to_phase_end(phase, preserve),
                };
                match rolled {
                    Ok(g) => {
                        game = g;
                        writeln!(out, "phase {}", game.current_phase())?;
                    }
                    Err(e) => writeln!(out, "error {e}")?,
                }
            }
            Command::Press { sender, recipient, body } => {
                let stamp = game.add_message(&sender, &recipient, &body, 0);
                writeln!(out, "press {stamp}")?;
            }
            Command::Log { body } => game.add_log(&body),
            Command::Save { path } => match game.to_json() {
                Ok(json) => match fs::write(&path, json) {
                    Ok(()) => writeln!(out, "saved {path}")?,
                    Err(e) => writeln!(out, "error {e}")?,
                },
                Err(e) => writeln!(out, "error {e}")?,
            },
            Command::Load { path } => {
                let loaded = fs::read_to_string(&path)
                    .map_err(|e| e.to_string())
                    .and_then(|json| Game::from_json(&json).map_err(|e| e.to_string()));
                match loaded {
                    Ok(g) => {
                        game = g;
                        writeln!(out, "game {} {}", game.game_id(), game.current_phase())?;
                    }
                    Err(e) => writeln!(out, "error {e}")?,
                }
            }
            Command::Quit => break,
        }
        out.flush()?;
    }
    Ok(())
}
