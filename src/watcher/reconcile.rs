//! Reconciliation of raw notifications into lifecycle events.
//!
//! A delete or rename notification carries only a path; the entity is
//! already gone, so its prior type cannot be inspected. The reconciler
//! resolves that ambiguity from [`TrackedFiles`]: an exact tracked-file
//! match wins over the directory-prefix interpretation, since a tracked
//! file can never be a path-prefix ancestor of itself.

use std::path::Path;

use walkdir::WalkDir;

use super::tracked::TrackedFiles;
use super::{EventSink, FileEvent};

/// Converts raw notifications for one directory tree into
/// Detected / Changed / Gone events.
///
/// All handlers run synchronously on the caller's thread and in raw
/// delivery order for the tree; a path deleted and recreated in quick
/// succession simply yields Gone followed by Detected, uncoalesced.
pub(crate) struct Reconciler {
    tracked: TrackedFiles,
    sink: EventSink,
}

impl Reconciler {
    pub(crate) fn new(sink: EventSink) -> Self {
        Self {
            tracked: TrackedFiles::new(),
            sink,
        }
    }

    pub(crate) fn tracked_len(&self) -> usize {
        self.tracked.len()
    }

    /// Recursively scan `dir`, emitting Detected for every file not yet
    /// tracked. Idempotent: already-tracked paths are neither re-added nor
    /// re-emitted.
    ///
    /// Unreadable entries are logged and skipped; one bad subtree must not
    /// halt detection of the rest.
    pub(crate) fn scan_tree(&self, dir: &Path) {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(
                        "[reconcile] skipping unreadable entry under {}: {e}",
                        dir.display()
                    );
                    continue;
                }
            };
            if entry.file_type().is_file() {
                self.detect_file(entry.path());
            }
        }
    }

    /// Raw Created(path).
    pub(crate) fn handle_created(&self, path: &Path) {
        if path.is_dir() {
            self.scan_tree(path);
        } else if path.is_file() {
            self.detect_file(path);
        }
        // Neither: the entry vanished again before classification. The
        // Deleted notification that follows resolves it from tracked state.
    }

    /// Raw Changed(path).
    ///
    /// Only surfaced for a path that currently resolves to a file:
    /// directory metadata changes are not interesting, and a change for an
    /// already-vanished path is dropped.
    pub(crate) fn handle_changed(&self, path: &Path) {
        if path.is_file() {
            self.emit(FileEvent::Changed(path.to_path_buf()));
        }
    }

    /// Raw Deleted(path).
    ///
    /// The single-file interpretation wins when `path` is an exact tracked
    /// member; otherwise the path is treated as a deleted directory and
    /// every tracked file under it goes. Either way each file is reported
    /// Gone exactly once, because removal from the tracked set is atomic.
    pub(crate) fn handle_deleted(&self, path: &Path) {
        if self.tracked.remove(path) {
            self.emit(FileEvent::Gone(path.to_path_buf()));
            return;
        }
        for doomed in self.tracked.remove_descendants(path) {
            self.emit(FileEvent::Gone(doomed));
        }
    }

    /// Raw Renamed(old -> new).
    ///
    /// The new path still exists, so its type picks the rule pair: a
    /// directory rename expands to Gone for everything tracked under the
    /// old path plus a rescan of the new one; a file rename is a single
    /// deletion plus a single detection.
    pub(crate) fn handle_renamed(&self, old: &Path, new: &Path) {
        if new.is_dir() {
            for doomed in self.tracked.remove_descendants(old) {
                self.emit(FileEvent::Gone(doomed));
            }
            self.scan_tree(new);
        } else if new.is_file() {
            if self.tracked.remove(old) {
                self.emit(FileEvent::Gone(old.to_path_buf()));
            }
            self.detect_file(new);
        } else {
            // The new path vanished before we could classify it. Apply the
            // Deleted rule to the old path; whatever raw event follows for
            // the new path settles the rest.
            self.handle_deleted(old);
        }
    }

    fn detect_file(&self, path: &Path) {
        if self.tracked.insert(path.to_path_buf()) {
            self.emit(FileEvent::Detected(path.to_path_buf()));
        }
    }

    fn emit(&self, event: FileEvent) {
        (self.sink)(event);
    }
}
