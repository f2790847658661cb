//! JSONL logger: append-only line-delimited JSON events.
//!
//! Each line is a self-contained JSON object, assembled in memory and
//! written with a single `write_all` so tailing processes never see a
//! partial line. Fallback chain:
//! 1. Configured file path
//! 2. stderr with `[RGRID-JSONL]` prefix
//! 3. Silent discard (rendering must never fail because logging did)

#![allow(missing_docs)]

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Event types matching the grid/booking activity model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    FeedParsed,
    FeedRejected,
    GridRendered,
    MergeCompleted,
    WeekNavigated,
    ProposalSent,
    ProposalReceived,
    SelectionSubmitted,
    Error,
}

/// A single JSONL entry — all fields optional except `ts`, `event`, `severity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    /// Displayed week number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    /// Timeslot row count of the rendered grid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    /// Surviving cell count after merging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cells: Option<usize>,
    /// Booking day under negotiation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    /// Booking time under negotiation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_time: Option<String>,
    /// Navigation or submission target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// RGD error code when the event records a failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Freeform details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// New entry stamped with the current UTC time.
    #[must_use]
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            event,
            severity,
            week: None,
            rows: None,
            cells: None,
            day: None,
            day_time: None,
            url: None,
            error_code: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_week(mut self, week: u32) -> Self {
        self.week = Some(week);
        self
    }

    #[must_use]
    pub fn with_grid_shape(mut self, rows: usize, cells: usize) -> Self {
        self.rows = Some(rows);
        self.cells = Some(cells);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[must_use]
    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }
}

/// Append-only JSONL writer. `None` path logs to stderr only.
#[derive(Debug, Clone)]
pub struct JsonlLogger {
    path: Option<PathBuf>,
}

impl JsonlLogger {
    #[must_use]
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
        }
    }

    /// Disabled logger that discards everything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { path: None }
    }

    /// Write one entry through the fallback chain. Never fails.
    pub fn log(&self, entry: &LogEntry) {
        let Ok(mut line) = serde_json::to_string(entry) else {
            return;
        };
        line.push('\n');

        if let Some(path) = &self.path {
            let written = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .and_then(|mut file| file.write_all(line.as_bytes()));
            if written.is_ok() {
                return;
            }
        }
        let _ = std::io::stderr().write_all(format!("[RGRID-JSONL] {line}").as_bytes());
    }
}
