//! Error log and the guarded-call wrapper.
//!
//! [`guard`] runs a fallible operation and, on failure, writes the error
//! trace to an [`ErrorLog`] instead of returning it. The caller only sees
//! `None`. [`FileErrorLog`] keeps one append-only file per operation per day:
//! `{dir}/{operation}_{MM_DD_YYYY}_error.log`.

use chrono::{Local, NaiveDate};
use std::error::Error;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, warn};

/// Sink for formatted failure traces.
pub trait ErrorLog {
    /// Append `trace` to the log for `operation`.
    fn record(&self, operation: &str, trace: &str) -> io::Result<()>;
}

/// Per-operation, per-day append-only log files in a directory.
#[derive(Debug, Clone)]
pub struct FileErrorLog {
    dir: PathBuf,
}

impl FileErrorLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `{dir}/{operation}_{MM_DD_YYYY}_error.log`
    pub fn path_for(&self, operation: &str, day: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{operation}_{}_error.log", day.format("%m_%d_%Y")))
    }

    /// Append to the file for `day` rather than today.
    pub fn record_on(&self, operation: &str, day: NaiveDate, trace: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(operation, day))?;
        file.write_all(trace.as_bytes())
    }
}

impl ErrorLog for FileErrorLog {
    fn record(&self, operation: &str, trace: &str) -> io::Result<()> {
        self.record_on(operation, Local::now().date_naive(), trace)
    }
}

/// In-memory log, mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryErrorLog {
    entries: Mutex<Vec<(String, String)>>,
}

impl MemoryErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded `(operation, trace)` pairs in arrival order.
    pub fn entries(&self) -> Vec<(String, String)> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorLog for MemoryErrorLog {
    fn record(&self, operation: &str, trace: &str) -> io::Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::other("memory error log poisoned"))?;
        entries.push((operation.to_string(), trace.to_string()));
        Ok(())
    }
}

/// Render an error and its full `source()` chain as plain text.
pub fn format_trace(operation: &str, err: &dyn Error) -> String {
    let mut out = String::new();
    let now = Local::now().format("%Y-%m-%d %H:%M:%S");
    let _ = writeln!(out, "[{now}] {operation} failed");
    let _ = writeln!(out, "Error: {err}");
    let mut cause = err.source();
    while let Some(e) = cause {
        let _ = writeln!(out, "Caused by: {e}");
        cause = e.source();
    }
    out.push('\n');
    out
}

/// Run `f`; on error, log the trace under `operation` and return `None`.
///
/// Success passes the value through untouched. A failure to write the log
/// itself is only reported through `tracing`.
pub fn guard<T, E, F>(log: &dyn ErrorLog, operation: &str, f: F) -> Option<T>
where
    E: Error,
    F: FnOnce() -> Result<T, E>,
{
    match f() {
        Ok(value) => Some(value),
        Err(err) => {
            error!("{operation} failed: {err}");
            let trace = format_trace(operation, &err);
            if let Err(e) = log.record(operation, &trace) {
                warn!("could not write error log for {operation}: {e}");
            }
            None
        }
    }
}
