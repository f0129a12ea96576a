//! Aggregation of per-path watchers behind one event stream.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::directory::DirectoryWatcher;
use super::error::WatchError;
use super::single_file::SingleFileWatcher;
use super::{EventSink, FileEvent};

/// Owns every registered watcher and republishes their events through one
/// shared sink.
///
/// The registries hold at most one watcher per absolute path; the unified
/// stream does not identify which watcher produced an event.
pub struct CombinedWatcher {
    sink: EventSink,
    files: DashMap<PathBuf, SingleFileWatcher>,
    directories: DashMap<PathBuf, DirectoryWatcher>,
    disposed: AtomicBool,
}

impl CombinedWatcher {
    pub fn new(sink: EventSink) -> Self {
        Self {
            sink,
            files: DashMap::new(),
            directories: DashMap::new(),
            disposed: AtomicBool::new(false),
        }
    }

    /// Register a watch on a single file. Idempotent by absolute path: a
    /// second registration is a silent no-op, never a duplicate watcher.
    ///
    /// First registration emits [`FileEvent::Detected`] for the file — the
    /// leaf watcher itself only ever reports Changed, and Detected on
    /// registration is how already-on-disk content enters the index.
    pub fn add_file(&self, path: &Path) -> Result<(), WatchError> {
        self.ensure_open()?;
        match self.files.entry(path.to_path_buf()) {
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                let watcher = SingleFileWatcher::new(path, Arc::clone(&self.sink))?;
                slot.insert(watcher);
                (self.sink)(FileEvent::Detected(path.to_path_buf()));
                crate::debug_event!("watcher", "watching file", "{}", path.display());
                Ok(())
            }
        }
    }

    /// Register a recursive watch on a directory tree. Idempotent by
    /// absolute path.
    ///
    /// The new watcher's initial scan runs inside its constructor: every
    /// file present at registration time has Detected delivered before
    /// this returns, strictly before any later live event for the tree is
    /// observable.
    pub fn add_directory(&self, path: &Path) -> Result<(), WatchError> {
        self.ensure_open()?;
        match self.directories.entry(path.to_path_buf()) {
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                let watcher = DirectoryWatcher::new(path, Arc::clone(&self.sink))?;
                slot.insert(watcher);
                Ok(())
            }
        }
    }

    pub fn watched_files(&self) -> usize {
        self.files.len()
    }

    pub fn watched_directories(&self) -> usize {
        self.directories.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Dispose every owned watcher exactly once.
    ///
    /// Each watcher stops its event delivery before its OS handle is
    /// released; callbacks already in flight may still complete.
    pub fn close(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.files.clear();
        self.directories.clear();
    }

    fn ensure_open(&self) -> Result<(), WatchError> {
        if self.is_disposed() {
            Err(WatchError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl Drop for CombinedWatcher {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crossbeam_channel::{Receiver, unbounded};
    use tempfile::TempDir;

    fn combined() -> (CombinedWatcher, Receiver<FileEvent>) {
        let (tx, rx) = unbounded();
        let sink: EventSink = Arc::new(move |event| {
            let _ = tx.send(event);
        });
        (CombinedWatcher::new(sink), rx)
    }

    #[test]
    fn file_registration_is_idempotent_and_detects_once() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "hello").unwrap();
        let (watcher, rx) = combined();

        watcher.add_file(&file).unwrap();
        watcher.add_file(&file).unwrap();

        let events: Vec<FileEvent> = rx.try_iter().collect();
        assert_eq!(events, vec![FileEvent::Detected(file)]);
        assert_eq!(watcher.watched_files(), 1);
    }

    #[test]
    fn missing_targets_are_rejected_without_partial_registration() {
        let dir = TempDir::new().unwrap();
        let (watcher, _rx) = combined();

        let missing = dir.path().join("nope");
        assert!(matches!(
            watcher.add_file(&missing),
            Err(WatchError::NotFound { .. })
        ));
        assert!(matches!(
            watcher.add_directory(&missing),
            Err(WatchError::NotFound { .. })
        ));
        assert_eq!(watcher.watched_files(), 0);
        assert_eq!(watcher.watched_directories(), 0);
    }

    #[test]
    fn registration_after_close_is_disposed() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "hello").unwrap();
        let (watcher, _rx) = combined();

        watcher.close();
        watcher.close(); // second close is a no-op

        assert!(matches!(
            watcher.add_file(&file),
            Err(WatchError::Disposed)
        ));
        assert!(matches!(
            watcher.add_directory(dir.path()),
            Err(WatchError::Disposed)
        ));
    }
}
