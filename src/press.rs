//! Press and log transcripts.
//!
//! Messages are stored per phase, keyed by a strictly increasing timestamp
//! in microseconds. Their content is never interpreted.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub recipient: String,
    pub body: String,
    pub time_sent: u64,
}

/// Messages and free-text logs recorded during one phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: BTreeMap<u64, Message>,
    logs: Vec<String>,
}

fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

impl Transcript {
    /// Stores a message and returns the timestamp it was filed under.
    ///
    /// `time_sent` 0 means now. A timestamp not later than the last message
    /// is bumped to one past it.
    pub fn add_message(&mut self, sender: &str, recipient: &str, body: &str, time_sent: u64) -> u64 {
        let requested = if time_sent == 0 { now_micros() } else { time_sent };
        let time_sent = match self.messages.last_key_value() {
            Some((&last, _)) if requested <= last => last + 1,
            _ => requested,
        };
        self.messages.insert(
            time_sent,
            Message { sender: sender.to_string(), recipient: recipient.to_string(), body: body.to_string(), time_sent },
        );
        time_sent
    }

    pub fn add_log(&mut self, body: &str) {
        self.logs.push(body.to_string());
    }

    /// Drops every message sent after `timestamp`.
    pub fn rollback_to_timestamp(&mut self, timestamp: u64) -> usize {
        let removed = self.messages.split_off(&(timestamp.saturating_add(1)));
        removed.len()
    }

    pub fn messages(&self) -> &BTreeMap<u64, Message> {
        &self.messages
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Keeps only the parts selected.
    pub fn retain(&self, messages: bool, logs: bool) -> Transcript {
        Transcript {
            messages: if messages { self.messages.clone() } else { BTreeMap::new() },
            logs: if logs { self.logs.clone() } else { Vec::new() },
        }
    }

    /// Rebuilds a transcript from stored messages, keeping their timestamps.
    pub fn from_parts(messages: Vec<Message>, logs: Vec<String>) -> Transcript {
        Transcript { messages: messages.into_iter().map(|m| (m.time_sent, m)).collect(), logs }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.logs.is_empty()
    }
}
