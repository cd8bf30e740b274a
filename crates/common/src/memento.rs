//! Undo support for a text file
//!
//! `TextFile` is the originator, `Snapshot` the memento and `History` the
//! caretaker. Every mutation is persisted so the file on disk always mirrors
//! the in-memory content.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

/// A file whose content can be captured and restored
#[derive(Debug)]
pub struct TextFile {
    path: PathBuf,
    content: String,
}

/// Captured file content
#[derive(Debug, Clone)]
pub struct Snapshot {
    content: String,
    taken_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }
}

impl TextFile {
    /// Create (or truncate) the file at `path`
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let file = Self {
            path: path.into(),
            content: String::new(),
        };
        file.persist()?;
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Append text and persist
    pub fn write(&mut self, text: &str) -> Result<()> {
        self.content.push_str(text);
        self.persist()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            content: self.content.clone(),
            taken_at: Utc::now(),
        }
    }

    /// Replace the content with a snapshot and persist
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<()> {
        debug!(
            "Restoring {} to snapshot from {}",
            self.path.display(),
            snapshot.taken_at
        );
        self.content = snapshot.content;
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        std::fs::write(&self.path, &self.content)?;
        Ok(())
    }
}

/// Stack of snapshots, most recent last
#[derive(Debug, Default)]
pub struct History {
    snapshots: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backup(&mut self, file: &TextFile) {
        self.snapshots.push(file.snapshot());
    }

    /// Restore the most recent snapshot. Returns false if there was none.
    pub fn undo(&mut self, file: &mut TextFile) -> Result<bool> {
        match self.snapshots.pop() {
            Some(snapshot) => {
                file.restore(snapshot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_restores_disk_and_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut file = TextFile::create(&path).unwrap();
        let mut history = History::new();

        file.write("first line\n").unwrap();
        history.backup(&file);
        file.write("second line\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first line\nsecond line\n");

        assert!(history.undo(&mut file).unwrap());
        assert_eq!(file.content(), "first line\n");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first line\n");
    }

    #[test]
    fn test_undo_is_lifo() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = TextFile::create(dir.path().join("log.txt")).unwrap();
        let mut history = History::new();

        history.backup(&file);
        file.write("a").unwrap();
        history.backup(&file);
        file.write("b").unwrap();
        assert_eq!(history.len(), 2);

        history.undo(&mut file).unwrap();
        assert_eq!(file.content(), "a");
        history.undo(&mut file).unwrap();
        assert_eq!(file.content(), "");
        assert!(history.is_empty());
    }

    #[test]
    fn test_undo_without_backup() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = TextFile::create(dir.path().join("empty.txt")).unwrap();
        file.write("kept").unwrap();

        assert!(!History::new().undo(&mut file).unwrap());
        assert_eq!(file.content(), "kept");
    }
}
