//! Recursive watcher for one directory tree.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::EventSink;
use super::error::WatchError;
use super::reconcile::Reconciler;

/// Watches one directory tree and reconciles its raw notifications into
/// Detected / Changed / Gone events.
///
/// Construction performs a full recursive scan of the root, emitting
/// Detected for every pre-existing file before `new` returns: by the time
/// the watcher exists, its tracked state is fully populated. Live
/// notifications are then processed synchronously on the backend's
/// delivery thread, in arrival order for this root; ordering across
/// distinct roots is not guaranteed.
pub struct DirectoryWatcher {
    root: PathBuf,
    reconciler: Arc<Reconciler>,
    alive: Arc<AtomicBool>,
    _backend: RecommendedWatcher,
}

impl DirectoryWatcher {
    /// Start watching `root`. Fails with [`WatchError::NotFound`] if the
    /// target is not a directory at setup time.
    pub fn new(root: impl Into<PathBuf>, sink: EventSink) -> Result<Self, WatchError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(WatchError::NotFound { path: root });
        }

        let reconciler = Arc::new(Reconciler::new(sink));
        let alive = Arc::new(AtomicBool::new(true));

        let mut backend = {
            let reconciler = Arc::clone(&reconciler);
            let alive = Arc::clone(&alive);
            notify::recommended_watcher(move |res: notify::Result<Event>| {
                if !alive.load(Ordering::Acquire) {
                    return;
                }
                match res {
                    Ok(event) => route_raw_event(&reconciler, event),
                    Err(e) => tracing::error!("[watcher] notification error: {e}"),
                }
            })?
        };
        backend
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|source| WatchError::Watch {
                path: root.clone(),
                source,
            })?;

        // Initial state: every file already on disk is tracked and reported
        // before the constructor returns. Notifications racing the scan are
        // de-duplicated by the tracked set.
        reconciler.scan_tree(&root);
        crate::debug_event!(
            "watcher",
            "watching tree",
            "{} ({} files)",
            root.display(),
            reconciler.tracked_len()
        );

        Ok(Self {
            root,
            reconciler,
            alive,
            _backend: backend,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of files currently believed to exist under the root.
    pub fn tracked_files(&self) -> usize {
        self.reconciler.tracked_len()
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        // Delivery stops before the backend handle goes away; a callback
        // already running may still complete.
        self.alive.store(false, Ordering::Release);
    }
}

/// Translate a backend event into the raw vocabulary the reconciler
/// speaks: Created, Changed, Deleted, Renamed.
///
/// Rename halves (`From`/`To`) are handled independently; when the backend
/// pairs them into one `Both` event instead, the tracked-set membership
/// test keeps the outcome identical and exactly-once either way.
fn route_raw_event(reconciler: &Reconciler, event: Event) {
    match event.kind {
        EventKind::Create(_) => {
            for path in &event.paths {
                reconciler.handle_created(path);
            }
        }
        EventKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::Both => {
                if let [old, new] = event.paths.as_slice() {
                    reconciler.handle_renamed(old, new);
                }
            }
            RenameMode::From => {
                for path in &event.paths {
                    reconciler.handle_deleted(path);
                }
            }
            RenameMode::To => {
                for path in &event.paths {
                    reconciler.handle_created(path);
                }
            }
            // A lone ambiguous rename path: what is on disk now decides.
            _ => {
                for path in &event.paths {
                    if path.exists() {
                        reconciler.handle_created(path);
                    } else {
                        reconciler.handle_deleted(path);
                    }
                }
            }
        },
        EventKind::Modify(_) => {
            for path in &event.paths {
                reconciler.handle_changed(path);
            }
        }
        EventKind::Remove(_) => {
            for path in &event.paths {
                reconciler.handle_deleted(path);
            }
        }
        _ => {}
    }
}
