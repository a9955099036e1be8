//! User-facing diagnostic log
//!
//! The UI shell owns an output surface with a single `append_line`
//! operation. Timestamps are added by wrapping that surface in
//! [`TimestampedLog`] when it is constructed, so every caller writes plain
//! messages and every line that lands in the surface carries a
//! `[YYYY-MM-DD HH:MM:SS] ` prefix.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::time;

/// Output surface for diagnostic lines
pub trait LogSink: Send + Sync {
    /// Append one line
    fn append_line(&self, line: &str);

    /// Bring the log to the user's attention
    fn show(&self) {}
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn append_line(&self, line: &str) {
        (**self).append_line(line)
    }

    fn show(&self) {
        (**self).show()
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn append_line(&self, line: &str) {
        (**self).append_line(line)
    }

    fn show(&self) {
        (**self).show()
    }
}

/// Prefixes each line with the local time before handing it on.
///
/// Lines are mirrored to `tracing` so they also reach the process log.
pub struct TimestampedLog<S> {
    inner: S,
}

impl<S: LogSink> TimestampedLog<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: LogSink> LogSink for TimestampedLog<S> {
    fn append_line(&self, line: &str) {
        tracing::info!(target: "shellport::log", "{}", line);
        self.inner
            .append_line(&format!("[{}] {}", time::log_timestamp(), line));
    }

    fn show(&self) {
        self.inner.show()
    }
}

/// In-memory sink that records every line
#[derive(Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
    shown: Mutex<usize>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded lines
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Whether any recorded line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|l| l.contains(needle))
    }

    /// How many times `show` was requested
    pub fn shown(&self) -> usize {
        *self.shown.lock()
    }
}

impl LogSink for MemoryLog {
    fn append_line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }

    fn show(&self) {
        *self.shown.lock() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamped_log_prefixes_lines() {
        let memory = Arc::new(MemoryLog::new());
        let log = TimestampedLog::new(Arc::clone(&memory));

        log.append_line("hello");

        let lines = memory.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with('['));
        assert_eq!(&lines[0][20..22], "] ");
        assert!(lines[0].ends_with("] hello"));
    }

    #[test]
    fn test_show_passes_through() {
        let memory = Arc::new(MemoryLog::new());
        let log = TimestampedLog::new(Arc::clone(&memory));

        log.show();
        log.show();

        assert_eq!(memory.shown(), 2);
    }

    #[test]
    fn test_memory_log_contains() {
        let memory = MemoryLog::new();
        memory.append_line("Found ssh on your system.");
        assert!(memory.contains("Found ssh"));
        assert!(!memory.contains("Did not find"));
    }
}
