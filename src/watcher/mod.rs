//! File system watching and event reconciliation.
//!
//! Raw notifications are ambiguous: a delete or rename reports only a
//! path, with no way to tell whether it was a file or a directory. This
//! module normalizes them into three lifecycle events a consumer can act
//! on directly.
//!
//! # Architecture
//!
//! ```text
//! CombinedWatcher
//!   - registry of per-path watchers, deduplicated by absolute path
//!   - one shared EventSink for the unified stream
//!         |
//!    +---------------+----------------+
//!    |                                |
//! SingleFileWatcher         DirectoryWatcher
//!  (Changed only)            - notify backend, recursive
//!                            - Reconciler + TrackedFiles
//!                              (Detected / Changed / Gone)
//! ```

mod combined;
mod directory;
mod error;
mod reconcile;
mod single_file;
mod tracked;

pub use combined::CombinedWatcher;
pub use directory::DirectoryWatcher;
pub use error::WatchError;
pub use single_file::SingleFileWatcher;
pub use tracked::TrackedFiles;

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Normalized file lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileEvent {
    /// A file now exists and should be indexed.
    Detected(PathBuf),
    /// An existing file's content may have changed.
    Changed(PathBuf),
    /// A file no longer exists and should be de-indexed.
    Gone(PathBuf),
}

impl FileEvent {
    /// The file the event refers to.
    pub fn path(&self) -> &Path {
        match self {
            FileEvent::Detected(path) | FileEvent::Changed(path) | FileEvent::Gone(path) => path,
        }
    }
}

/// Callback through which watchers deliver [`FileEvent`]s.
///
/// Invoked synchronously on the delivering thread, one thread per watched
/// root. A slow sink blocks further notification processing for that root;
/// this is the system's only backpressure point.
pub type EventSink = Arc<dyn Fn(FileEvent) + Send + Sync>;
