//! Command parser for the game loop.
//!
//! Parses incoming text commands into structured `Command` variants that the
//! `concordat` binary dispatches on.

use tracing::warn;

use crate::board::{PhaseId, Power};
use crate::game::Preserve;

/// Which end of a historical phase to roll back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackPoint {
    Start,
    End,
}

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a fresh game, optionally with a JSON `GameConfig`.
    NewGame { config: Option<String> },

    /// Stage orders for a power: `orders FRANCE A par - bur ; F bre - mao`.
    Orders { power: Power, orders: Vec<String> },

    /// Adjudicate the current phase.
    Process,

    /// Print the current phase name.
    Phase,

    /// Print the current board as DFEN.
    State,

    /// List legal orders, for one power or everyone.
    Possible { power: Option<Power> },

    /// `rollback start|end <phase> [orders] [messages] [logs]`
    Rollback { point: RollbackPoint, phase: PhaseId, preserve: Preserve },

    /// `press <sender> <recipient> <body>`
    Press { sender: String, recipient: String, body: String },

    /// Attach a free-text log line to the current phase.
    Log { body: String },

    /// Write the game snapshot to a file.
    Save { path: String },

    /// Replace the game with one loaded from a snapshot file.
    Load { path: String },

    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let (&head, _) = tokens.split_first()?;

    match head {
        "process" => Some(Command::Process),
        "phase" => Some(Command::Phase),
        "state" => Some(Command::State),
        "quit" => Some(Command::Quit),

        "newgame" => Some(Command::NewGame { config: rest_of(trimmed, head) }),
        "orders" => parse_orders(&tokens, trimmed),
        "possible" => parse_possible(&tokens),
        "rollback" => parse_rollback(&tokens),
        "press" => parse_press(&tokens),
        "log" => match rest_of(trimmed, head) {
            Some(body) => Some(Command::Log { body }),
            None => malformed("log", "log <text>"),
        },
        "save" => match tokens.get(1) {
            Some(path) => Some(Command::Save { path: path.to_string() }),
            None => malformed("save", "save <path>"),
        },
        "load" => match tokens.get(1) {
            Some(path) => Some(Command::Load { path: path.to_string() }),
            None => malformed("load", "load <path>"),
        },

        other => {
            warn!(command = other, "unknown command");
            None
        }
    }
}

fn malformed(command: &str, usage: &str) -> Option<Command> {
    warn!(command, usage, "malformed command");
    None
}

/// Everything after the leading keyword, if non-empty.
fn rest_of(line: &str, keyword: &str) -> Option<String> {
    let rest = line.strip_prefix(keyword)?.trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

fn parse_power(token: &str) -> Option<Power> {
    let power = Power::from_name(token);
    if power.is_none() {
        warn!(power = token, "unknown power");
    }
    power
}

/// Parses `orders <power> <order> [; <order>]*`. An empty list clears the
/// power's orders.
fn parse_orders(tokens: &[&str], line: &str) -> Option<Command> {
    let Some(name) = tokens.get(1) else {
        return malformed("orders", "orders <power> <order> [; <order>]*");
    };
    let power = parse_power(name)?;
    let body = line.strip_prefix("orders")?.trim_start().strip_prefix(*name)?;
    let orders = body
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    Some(Command::Orders { power, orders })
}

fn parse_possible(tokens: &[&str]) -> Option<Command> {
    match tokens.get(1) {
        None => Some(Command::Possible { power: None }),
        Some(name) => Some(Command::Possible { power: Some(parse_power(name)?) }),
    }
}

fn parse_rollback(tokens: &[&str]) -> Option<Command> {
    const USAGE: &str = "rollback start|end <phase> [orders] [messages] [logs]";
    if tokens.len() < 3 {
        return malformed("rollback", USAGE);
    }
    let point = match tokens[1] {
        "start" => RollbackPoint::Start,
        "end" => RollbackPoint::End,
        _ => return malformed("rollback", USAGE),
    };
    let Some(phase) = PhaseId::from_name(tokens[2]) else {
        warn!(phase = tokens[2], "unknown phase name");
        return None;
    };

    let mut preserve = Preserve::NOTHING;
    for &flag in &tokens[3..] {
        match flag {
            "orders" => preserve.orders = true,
            "messages" => preserve.messages = true,
            "logs" => preserve.logs = true,
            other => {
                warn!(flag = other, "unknown rollback flag");
                return None;
            }
        }
    }
    Some(Command::Rollback { point, phase, preserve })
}

fn parse_press(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 4 {
        return malformed("press", "press <sender> <recipient> <body>");
    }
    Some(Command::Press {
        sender: tokens[1].to_string(),
        recipient: tokens[2].to_string(),
        body: tokens[3..].join(" "),
    })
}
