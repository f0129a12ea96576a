//! Thread-safe set of files a directory watcher believes exist.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

/// Set of absolute file paths currently tracked under one watched root.
///
/// Every read and write, including the ancestor prefix scan used to expand
/// a directory deletion, runs under the same mutex: a notification being
/// processed on one thread can never observe a half-updated set from
/// another, and no path can be reported twice by racing notifications.
#[derive(Debug, Default)]
pub struct TrackedFiles {
    inner: Mutex<BTreeSet<PathBuf>>,
}

impl TrackedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `path`. Returns true if it was not already tracked.
    pub fn insert(&self, path: PathBuf) -> bool {
        self.inner.lock().insert(path)
    }

    /// Stop tracking `path`. Returns true if it was tracked.
    pub fn remove(&self, path: &Path) -> bool {
        self.inner.lock().remove(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.inner.lock().contains(path)
    }

    /// Atomically remove every tracked path that has `dir` as a path-prefix
    /// ancestor, returning the removed paths.
    ///
    /// Ancestry is component-wise: `/a/b` covers `/a/b/c.txt` but not
    /// `/a/bc.txt`.
    pub fn remove_descendants(&self, dir: &Path) -> Vec<PathBuf> {
        let mut set = self.inner.lock();
        let mut removed = Vec::new();
        set.retain(|path| {
            if path.starts_with(dir) {
                removed.push(path.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Owned copy of the current membership, in path order.
    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.inner.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
