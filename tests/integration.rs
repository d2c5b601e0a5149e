//! Integration tests for the concordat binary.
//!
//! Drives full sessions by spawning the process, sending commands on stdin
//! and checking the lines written to stdout.

use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

use concordat::protocol::dfen::INITIAL_DFEN;

/// Sends a sequence of commands and collects stdout lines.
fn run_session(commands: &[&str]) -> Vec<String> {
    let exe = env!("CARGO_BIN_EXE_concordat");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start concordat");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    for cmd in commands {
        writeln!(stdin, "{}", cmd).unwrap();
    }
    stdin.flush().unwrap();
    drop(stdin);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    assert!(status.success());
    lines
}

fn has(lines: &[String], expected: &str) -> bool {
    lines.iter().any(|l| l == expected)
}

#[test]
fn starts_in_spring_1901() {
    let lines = run_session(&["phase", "state", "quit"]);
    assert_eq!(lines, vec!["phase S1901M".to_string(), format!("state {INITIAL_DFEN}")]);
}

#[test]
fn unknown_and_empty_lines_are_ignored() {
    let lines = run_session(&["", "dui", "   ", "go depth 3", "phase", "quit"]);
    assert_eq!(lines, vec!["phase S1901M"]);
}

#[test]
fn eof_exits_cleanly() {
    let lines = run_session(&["phase"]);
    assert_eq!(lines.len(), 1);
}

#[test]
fn orders_are_acknowledged_or_rejected() {
    let lines = run_session(&["orders FRANCE A par - bur ; F bre - lon ; A mar - gas", "quit"]);
    assert!(has(&lines, "ok A par - bur"));
    assert!(has(&lines, "ok A mar - gas"));
    assert!(lines.iter().any(|l| l.starts_with("rejected F bre - lon : ")));
}

#[test]
fn process_reports_results_and_next_phase() {
    let lines = run_session(&[
        "orders FRANCE A par - bur",
        "orders GERMANY A mun - bur",
        "orders ENGLAND F lon - nth",
        "process",
        "quit",
    ]);
    assert!(has(&lines, "result FRANCE A par - bur : bounced"));
    assert!(has(&lines, "result GERMANY A mun - bur : bounced"));
    assert!(has(&lines, "result ENGLAND F lon - nth : succeeded"));
    assert!(has(&lines, "result ITALY A rom H : succeeded"));
    assert_eq!(lines.last().map(String::as_str), Some("phase F1901M"));
}

#[test]
fn possible_lists_each_orderable_province() {
    let lines = run_session(&["possible ITALY", "quit"]);
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().any(|l| l.starts_with("possible ITALY ven : ") && l.contains("A ven - tyr")));
    assert!(lines.iter().all(|l| l.starts_with("possible ITALY ")));

    let lines = run_session(&["possible", "quit"]);
    assert_eq!(lines.len(), 22);
}

#[test]
fn rollback_returns_to_an_earlier_phase() {
    let lines = run_session(&[
        "orders ENGLAND F lon - nth",
        "process",
        "process",
        "rollback start S1901M orders",
        "state",
        "rollback end S1901M",
        "quit",
    ]);
    let after_processing = lines.iter().position(|l| l == "phase S1902M").unwrap();
    assert_eq!(lines[after_processing + 1], "phase S1901M");
    assert_eq!(lines[after_processing + 2], format!("state {INITIAL_DFEN}"));
    // S1901M is the current phase again and has no end yet.
    assert!(lines[after_processing + 3].starts_with("error "));
}

#[test]
fn rollback_end_of_current_phase_is_an_error() {
    let lines = run_session(&["rollback end S1901M", "quit"]);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("error "));
}

#[test]
fn newgame_with_bad_config_keeps_running() {
    let lines = run_session(&["newgame {\"start_year\": \"soon\"}", "newgame {\"start_year\": 1950}", "quit"]);
    assert!(lines[0].starts_with("error "));
    assert!(lines[1].starts_with("game ") && lines[1].ends_with(" S1950M"));
}

#[test]
fn save_then_load_restores_the_game() {
    let path = std::env::temp_dir().join(format!("concordat-session-{}.json", std::process::id()));
    let path = path.to_string_lossy().to_string();
    let save = format!("save {path}");
    let load = format!("load {path}");

    let lines = run_session(&[
        "orders GERMANY A mun - ruh",
        "process",
        "press GERMANY FRANCE hello there",
        save.as_str(),
        "newgame",
        load.as_str(),
        "state",
        "quit",
    ]);
    let _ = std::fs::remove_file(&path);

    assert!(has(&lines, &format!("saved {path}")));
    let loaded = lines.iter().position(|l| l.starts_with("game ") && l.ends_with(" F1901M")).unwrap();
    assert!(lines[loaded + 1].contains("Garuh"));
}

#[test]
fn load_of_missing_file_reports_error() {
    let lines = run_session(&["load /nonexistent/concordat.json", "phase", "quit"]);
    assert!(lines[0].starts_with("error "));
    assert_eq!(lines[1], "phase S1901M");
}
