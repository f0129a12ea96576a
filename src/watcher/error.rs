//! Error types for the watcher layer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced synchronously from watcher registration. A failed
/// registration leaves no partial watcher behind.
#[derive(Error, Debug)]
pub enum WatchError {
    /// The watch target did not exist at registration time.
    #[error("watch target not found: {path}")]
    NotFound { path: PathBuf },

    /// Operation attempted on a disposed watcher.
    #[error("watcher already disposed")]
    Disposed,

    /// The notification backend could not be initialized.
    #[error("failed to initialize notification backend: {0}")]
    Backend(#[from] notify::Error),

    /// The backend refused to watch a specific path.
    #[error("cannot watch {path}: {source}")]
    Watch {
        path: PathBuf,
        source: notify::Error,
    },
}
