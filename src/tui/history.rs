//! File-backed input history.
//!
//! The on-disk format is a flat UTF-8 file with one trimmed entry per line.
//! Saving always rewrites the whole file.

use crate::error::HistoryError;
use std::fs;
use std::io;
use std::path::Path;

/// Default cap on retained entries.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Ordered list of submitted lines, oldest first.
///
/// Only *adjacent* duplicates are suppressed: `a, b, a` is kept as-is.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: Vec<String>,
    max_entries: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }
}

impl HistoryStore {
    /// Empty store retaining at most `max_entries` (minimum 1).
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Append an entry, skipping blanks and repeats of the newest entry.
    pub fn add(&mut self, entry: &str) {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            return;
        }
        if self.entries.last().map(String::as_str) == Some(trimmed) {
            return;
        }

        self.entries.push(trimmed.to_string());
        if self.entries.len() > self.max_entries {
            let overflow = self.entries.len() - self.max_entries;
            self.entries.drain(0..overflow);
        }
    }

    /// Load entries from `path`, appending to what is already present.
    ///
    /// A missing file is not an error.
    pub fn load(&mut self, path: &Path) -> Result<(), HistoryError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(HistoryError::Load {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        for line in raw.lines() {
            self.add(line);
        }
        Ok(())
    }

    /// Overwrite `path` with the current entries, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        let wrap = |source| HistoryError::Save {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(wrap)?;
        }
        let mut body = String::new();
        for entry in &self.entries {
            // Multi-line submissions are flattened; the format is one entry per line.
            let line = entry.replace(['\n', '\r'], " ");
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            body.push_str(line);
            body.push('\n');
        }
        fs::write(path, body).map_err(wrap)
    }

    /// Move a legacy history file to `new` when `new` does not exist yet.
    ///
    /// Returns `true` when a migration happened.
    pub fn migrate_legacy(old: &Path, new: &Path) -> Result<bool, HistoryError> {
        if new.exists() || !old.exists() {
            return Ok(false);
        }
        let wrap = |source| HistoryError::Save {
            path: new.to_path_buf(),
            source,
        };
        if let Some(parent) = new.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(wrap)?;
        }
        if fs::rename(old, new).is_err() {
            // Cross-device moves fall back to copy + remove.
            fs::copy(old, new).map_err(wrap)?;
            let _ = fs::remove_file(old);
        }
        Ok(true)
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry `back` steps from the newest (`0` is the newest).
    pub fn from_newest(&self, back: usize) -> Option<&str> {
        let idx = self.entries.len().checked_sub(back + 1)?;
        self.entries.get(idx).map(String::as_str)
    }

    /// The newest `n` entries, oldest first.
    pub fn latest(&self, n: usize) -> &[String] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Entries containing `query`, compared case-insensitively.
    pub fn search(&self, query: &str) -> Vec<&str> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Most entries kept before the oldest is evicted.
    pub fn capacity(&self) -> usize {
        self.max_entries
    }
}
