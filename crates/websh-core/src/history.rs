//! Persistent command history.
//!
//! The file is plain text, one entry per line, oldest first. It is read
//! once when a session starts and rewritten in full when it ends; nothing
//! touches the disk in between. There is no file locking, so when two
//! sessions share a path the last one to exit wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::app::APP_NAME;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to read history file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write history file {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Summary of a [`HistoryStore::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    /// Lines dropped because they were not valid UTF-8.
    pub skipped: usize,
}

/// In-memory history buffer bound to a file path.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<String>,
    limit: usize,
}

impl HistoryStore {
    pub const DEFAULT_LIMIT: usize = 1000;

    pub fn new(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
            limit,
        }
    }

    /// `<temp dir>/websh-prompt-history.txt`
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join(format!("{}-history.txt", APP_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Reads the history file, placing its entries before any already in
    /// memory. A missing file loads nothing. Blank lines are ignored and
    /// lines that are not UTF-8 are skipped and counted.
    ///
    /// Loading and then flushing reproduces the file byte for byte only when
    /// it is already normalized, as every file written by [`flush`] is: no
    /// blank lines, valid UTF-8, and a trailing newline.
    ///
    /// [`flush`]: HistoryStore::flush
    pub fn load(&mut self) -> Result<LoadReport, HistoryError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No history file at {:?}", self.path);
                return Ok(LoadReport::default());
            }
            Err(source) => {
                return Err(HistoryError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let mut report = LoadReport::default();
        let mut loaded = Vec::new();
        for raw in bytes.split(|b| *b == b'\n') {
            if raw.is_empty() {
                continue;
            }
            match std::str::from_utf8(raw) {
                Ok(line) => loaded.push(line.to_string()),
                Err(_) => report.skipped += 1,
            }
        }
        report.loaded = loaded.len();

        loaded.append(&mut self.entries);
        self.entries = loaded;
        self.enforce_limit();

        tracing::debug!(
            "Loaded {} history entries from {:?} ({} skipped)",
            report.loaded,
            self.path,
            report.skipped
        );
        Ok(report)
    }

    /// Appends an entry in memory. Blank entries are refused.
    pub fn append(&mut self, entry: impl Into<String>) -> bool {
        let entry = entry.into();
        if entry.trim().is_empty() {
            return false;
        }
        self.entries.push(entry);
        self.enforce_limit();
        true
    }

    /// Replaces the file's contents with the whole buffer.
    pub fn flush(&self) -> Result<(), HistoryError> {
        let write_err = |source: std::io::Error| HistoryError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let content: String = self
            .entries
            .iter()
            .map(|entry| format!("{}\n", entry))
            .collect();
        fs::write(&self.path, content).map_err(write_err)?;

        tracing::debug!(
            "Wrote {} history entries to {:?}",
            self.entries.len(),
            self.path
        );
        Ok(())
    }

    fn enforce_limit(&mut self) {
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
    }
}
