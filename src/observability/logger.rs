//! Structured JSON logger for shelfdb
//!
//! - One log line = one event, as a JSON object
//! - Keys in alphabetical order (deterministic output)
//! - Synchronous, no buffering
//! - Silent unless a minimum severity is configured

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Reads and other high-volume detail
    Trace = 0,
    /// Successful mutations
    Info = 1,
    /// Rejected operations
    Warn = 2,
    /// Failures outside a single operation (snapshot I/O)
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where log lines go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSink {
    #[default]
    Stderr,
    Stdout,
    /// Kept in memory, readable through [`Logger::captured`]
    Memory,
}

/// Structured logger owned by one database instance
#[derive(Debug, Clone, Default)]
pub struct Logger {
    level: Option<Severity>,
    sink: LogSink,
    captured: Arc<Mutex<Vec<String>>>,
}

impl Logger {
    /// Creates a logger emitting events at `level` and above.
    /// `None` disables logging.
    pub fn new(level: Option<Severity>, sink: LogSink) -> Self {
        Self {
            level,
            sink,
            captured: Arc::default(),
        }
    }

    /// A logger that never emits
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether an event at `severity` would be emitted
    pub fn enabled(&self, severity: Severity) -> bool {
        self.level.map_or(false, |min| severity >= min)
    }

    /// Log an event with the given severity and fields
    pub fn log(&self, severity: Severity, event: Event, fields: &[(&str, &str)]) {
        if !self.enabled(severity) {
            return;
        }

        let line = format_line(severity, event, fields);
        match self.sink {
            LogSink::Stderr => write_line(&mut io::stderr(), &line),
            LogSink::Stdout => write_line(&mut io::stdout(), &line),
            LogSink::Memory => {
                if let Ok(mut captured) = self.captured.lock() {
                    captured.push(line);
                }
            }
        }
    }

    pub fn trace(&self, event: Event, fields: &[(&str, &str)]) {
        self.log(Severity::Trace, event, fields);
    }

    pub fn info(&self, event: Event, fields: &[(&str, &str)]) {
        self.log(Severity::Info, event, fields);
    }

    pub fn warn(&self, event: Event, fields: &[(&str, &str)]) {
        self.log(Severity::Warn, event, fields);
    }

    pub fn error(&self, event: Event, fields: &[(&str, &str)]) {
        self.log(Severity::Error, event, fields);
    }

    /// Lines logged to the memory sink so far
    pub fn captured(&self) -> Vec<String> {
        self.captured
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

/// Formats one log line. `serde_json::Map` keeps keys sorted.
fn format_line(severity: Severity, event: Event, fields: &[(&str, &str)]) -> String {
    let mut line = Map::new();
    for (key, value) in fields {
        line.insert((*key).to_string(), JsonValue::from(*value));
    }
    line.insert("event".into(), JsonValue::from(event.as_str()));
    line.insert("severity".into(), JsonValue::from(severity.as_str()));
    JsonValue::Object(line).to_string()
}

fn write_line<W: Write>(writer: &mut W, line: &str) {
    // Logging must never fail an operation
    let _ = writeln!(writer, "{}", line);
    let _ = writer.flush();
}
