//! Watcher for exactly one file path.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::error::WatchError;
use super::{EventSink, FileEvent};

/// Watches one file for content modifications.
///
/// Emits [`FileEvent::Changed`] on every modification notification. Bursts
/// are not de-duplicated: a single logical save may legitimately surface
/// more than once, and consumers needing debouncing implement it
/// themselves.
pub struct SingleFileWatcher {
    path: PathBuf,
    alive: Arc<AtomicBool>,
    _backend: RecommendedWatcher,
}

impl SingleFileWatcher {
    /// Start watching `path`. Fails with [`WatchError::NotFound`] if the
    /// target does not exist at setup time.
    pub fn new(path: impl Into<PathBuf>, sink: EventSink) -> Result<Self, WatchError> {
        let path = path.into();
        if !path.is_file() {
            return Err(WatchError::NotFound { path });
        }

        let alive = Arc::new(AtomicBool::new(true));
        let mut backend = {
            let alive = Arc::clone(&alive);
            let watched = path.clone();
            notify::recommended_watcher(move |res: notify::Result<Event>| {
                if !alive.load(Ordering::Acquire) {
                    return;
                }
                match res {
                    Ok(event) => {
                        if !is_content_change(&event.kind) {
                            return;
                        }
                        for changed in event.paths {
                            if changed == watched {
                                sink(FileEvent::Changed(changed));
                            }
                        }
                    }
                    Err(e) => tracing::error!(
                        "[watcher] notification error for {}: {e}",
                        watched.display()
                    ),
                }
            })?
        };
        backend
            .watch(&path, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Watch {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            alive,
            _backend: backend,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SingleFileWatcher {
    fn drop(&mut self) {
        // Delivery stops before the backend handle goes away; a callback
        // already running may still complete.
        self.alive.store(false, Ordering::Release);
    }
}

/// Content modifications only; metadata touches and rename halves are not
/// content changes.
fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Modify(ModifyKind::Name(_)) | EventKind::Modify(ModifyKind::Metadata(_)) => {
            false
        }
        EventKind::Modify(_) => true,
        _ => false,
    }
}
