//! Bounded console output buffer.
//!
//! Newest lines sit at the front of a fixed-capacity ring. Printed lines
//! are timestamped and mirrored to [`bevy::log`] under the `"devcon"`
//! target, which the egui capture layer uses to avoid re-ingesting them.

use std::collections::VecDeque;
use std::time::SystemTime;

use bevy::prelude::*;

/// Ring capacity; the buffer holds at most `LOG_CAPACITY - 1` lines.
pub const LOG_CAPACITY: usize = 128;

/// Tracing target for mirrored console lines.
pub const LOG_TARGET: &str = "devcon";

/// Display category of a log line. Opaque to the core; the overlay maps
/// each to a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
    Success,
    System,
}

impl Severity {
    /// Map the `echo_mode` variable's index to a severity.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Severity::Info),
            1 => Some(Severity::Warning),
            2 => Some(Severity::Error),
            3 => Some(Severity::Success),
            4 => Some(Severity::System),
            _ => None,
        }
    }
}

/// One stored line of console output.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub text: String,
    pub severity: Severity,
}

/// The console's output ring. Front is newest.
#[derive(Resource, Default)]
pub struct ConsoleLog {
    lines: VecDeque<LogLine>,
}

impl ConsoleLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Print a message at the given severity.
    ///
    /// Embedded newlines split into separate entries so every stored line
    /// is single-line. Each line is timestamped and mirrored to the
    /// process log.
    pub fn print(&mut self, message: &str, severity: Severity) {
        let stamp = timestamp();
        for line in message.split('\n') {
            match severity {
                Severity::Error => error!(target: "devcon", "{}", line),
                Severity::Warning => warn!(target: "devcon", "{}", line),
                _ => info!(target: "devcon", "{}", line),
            }
            self.push(LogLine {
                text: format!("{stamp}{line}"),
                severity,
            });
        }
    }

    /// Insert a line verbatim: no timestamp, no mirroring.
    ///
    /// Used for the startup banner and for host log lines captured from
    /// tracing (which already went to the process log once).
    pub fn print_raw(&mut self, line: impl Into<String>, severity: Severity) {
        self.push(LogLine {
            text: line.into(),
            severity,
        });
    }

    fn push(&mut self, entry: LogLine) {
        if self.lines.len() == LOG_CAPACITY - 1 {
            self.lines.pop_back();
        }
        self.lines.push_front(entry);
    }

    /// Drop all stored lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Number of stored lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }
}

fn timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!(
        "[{:02}:{:02}:{:02}] ",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_and_order() {
        let mut log = ConsoleLog::new();
        log.print("first", Severity::Info);
        log.print("second", Severity::Error);

        let lines: Vec<_> = log.iter().collect();
        assert_eq!(lines.len(), 2);
        // Newest first
        assert!(lines[0].text.ends_with("second"));
        assert_eq!(lines[0].severity, Severity::Error);
        assert!(lines[1].text.ends_with("first"));
    }

    #[test]
    fn test_multiline_splits() {
        let mut log = ConsoleLog::new();
        log.print("a\nb\nc", Severity::Info);
        assert_eq!(log.len(), 3);
        assert!(log.iter().all(|l| !l.text.contains('\n')));
    }

    #[test]
    fn test_eviction_caps_at_capacity_minus_one() {
        let mut log = ConsoleLog::new();
        for i in 0..200 {
            log.print(&format!("line {i}"), Severity::Info);
        }
        assert_eq!(log.len(), LOG_CAPACITY - 1);
        // Oldest evicted: line 0 is gone, the newest survives
        assert!(log.iter().next().unwrap().text.ends_with("line 199"));
        assert!(!log.iter().any(|l| l.text.ends_with("line 0")));
    }

    #[test]
    fn test_print_raw_skips_timestamp() {
        let mut log = ConsoleLog::new();
        log.print_raw("banner", Severity::System);
        assert_eq!(log.iter().next().unwrap().text, "banner");
    }

    #[test]
    fn test_clear() {
        let mut log = ConsoleLog::new();
        log.print("x", Severity::Info);
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_severity_from_index() {
        assert_eq!(Severity::from_index(0), Some(Severity::Info));
        assert_eq!(Severity::from_index(3), Some(Severity::Success));
        assert_eq!(Severity::from_index(9), None);
    }
}
