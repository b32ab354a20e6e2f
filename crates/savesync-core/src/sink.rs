//! Log sinks
//!
//! A [`LogSink`] receives one human-readable status line per event. The
//! reconciler owns no display state: marshaling lines onto a UI thread, adding
//! timestamps or persisting them is the embedding application's job.

use std::sync::{Mutex, PoisonError};

/// Append-only receiver of status lines.
///
/// Implementations must be safe to call from the blocking worker a run
/// executes on, and must keep lines in the order they were received.
pub trait LogSink: Send + Sync {
    fn log(&self, line: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, line: &str) {
        self(line)
    }
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line received so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return every line received so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl LogSink for MemorySink {
    fn log(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}

/// Forwards lines to `tracing`, at error level for `[Error]` lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, line: &str) {
        if line.starts_with("[Error]") {
            tracing::error!(target: "savesync", "{line}");
        } else {
            tracing::info!(target: "savesync", "{line}");
        }
    }
}

/// Discards every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _line: &str) {}
}
