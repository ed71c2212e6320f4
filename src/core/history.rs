//! Persistent command history.
//!
//! Submitted lines are prepended in memory (newest first) and appended to
//! a plain-text backing file, one line each, synchronously at submit time.
//! On load, each non-blank file line is inserted at the front in read
//! order. Navigation moves a cursor where `-1` means "not browsing".

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bevy::prelude::*;

/// Default backing file, relative to the working directory.
pub const DEFAULT_HISTORY_FILE: &str = "history.txt";

/// In-memory history plus its backing file.
#[derive(Resource)]
pub struct ConsoleHistory {
    entries: Vec<String>,
    cursor: isize,
    path: PathBuf,
}

impl Default for ConsoleHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_FILE)
    }
}

impl ConsoleHistory {
    /// Create an empty history backed by `path`. Nothing is read until
    /// [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            entries: Vec::new(),
            cursor: -1,
            path: path.into(),
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the backing file into memory. Blank lines are skipped; each
    /// line read is inserted at the front. A missing file is not an error.
    pub fn load(&mut self) -> io::Result<()> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };
        for line in contents.lines() {
            if !line.is_empty() {
                self.entries.insert(0, line.to_string());
            }
        }
        Ok(())
    }

    /// Record a submitted line: prepend in memory, append to disk.
    /// Empty lines are dropped.
    pub fn record(&mut self, line: &str) -> io::Result<()> {
        if line.is_empty() {
            return Ok(());
        }
        self.entries.insert(0, line.to_string());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }

    /// Step back in time. Returns the line to place in the edit buffer,
    /// or `None` when already at the oldest entry.
    pub fn navigate_up(&mut self) -> Option<&str> {
        if self.cursor < self.entries.len() as isize - 1 {
            self.cursor += 1;
            Some(&self.entries[self.cursor as usize])
        } else {
            None
        }
    }

    /// Step forward. Returns the new edit-buffer content; reaching `-1`
    /// yields an empty string (back to live editing). `None` when not
    /// browsing.
    pub fn navigate_down(&mut self) -> Option<String> {
        if self.cursor > -1 {
            self.cursor -= 1;
            if self.cursor == -1 {
                Some(String::new())
            } else {
                Some(self.entries[self.cursor as usize].clone())
            }
        } else {
            None
        }
    }

    /// Leave browsing mode. Called after a submit.
    pub fn reset_cursor(&mut self) {
        self.cursor = -1;
    }

    /// Drop all entries and truncate the backing file.
    pub fn clear(&mut self) -> io::Result<()> {
        self.entries.clear();
        self.cursor = -1;
        fs::write(&self.path, "")
    }

    /// Number of entries, newest first.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn history_in(dir: &tempfile::TempDir) -> ConsoleHistory {
        ConsoleHistory::new(dir.path().join("history.txt"))
    }

    #[test]
    fn test_record_prepends() {
        let dir = tempdir().unwrap();
        let mut history = history_in(&dir);
        history.record("first").unwrap();
        history.record("second").unwrap();

        let entries: Vec<_> = history.iter().collect();
        assert_eq!(entries, vec!["second", "first"]);
    }

    #[test]
    fn test_empty_lines_not_recorded() {
        let dir = tempdir().unwrap();
        let mut history = history_in(&dir);
        history.record("").unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_entries() {
        let dir = tempdir().unwrap();
        {
            let mut history = history_in(&dir);
            for line in ["a", "b", "c"] {
                history.record(line).unwrap();
            }
        }

        let mut reloaded = history_in(&dir);
        reloaded.load().unwrap();
        assert_eq!(reloaded.len(), 3);
        // Later file lines end up earlier in the list
        let entries: Vec<_> = reloaded.iter().collect();
        assert_eq!(entries, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_load_missing_file_is_ok() {
        let dir = tempdir().unwrap();
        let mut history = history_in(&dir);
        assert!(history.load().is_ok());
        assert!(history.is_empty());
    }

    #[test]
    fn test_navigation() {
        let dir = tempdir().unwrap();
        let mut history = history_in(&dir);
        history.record("old").unwrap();
        history.record("new").unwrap();

        assert_eq!(history.navigate_up(), Some("new"));
        assert_eq!(history.navigate_up(), Some("old"));
        // At the oldest entry: no further movement
        assert_eq!(history.navigate_up(), None);

        assert_eq!(history.navigate_down(), Some("new".to_string()));
        // Back to -1 clears the edit buffer
        assert_eq!(history.navigate_down(), Some(String::new()));
        assert_eq!(history.navigate_down(), None);
    }

    #[test]
    fn test_reset_cursor_after_submit() {
        let dir = tempdir().unwrap();
        let mut history = history_in(&dir);
        history.record("x").unwrap();
        history.navigate_up();
        history.reset_cursor();
        assert_eq!(history.navigate_up(), Some("x"));
    }

    #[test]
    fn test_clear_truncates_file() {
        let dir = tempdir().unwrap();
        let mut history = history_in(&dir);
        history.record("a").unwrap();
        history.clear().unwrap();

        assert!(history.is_empty());
        let mut reloaded = history_in(&dir);
        reloaded.load().unwrap();
        assert!(reloaded.is_empty());
    }
}
