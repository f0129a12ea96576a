//! Binds watcher events to index mutations.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::index::{IndexConfig, IndexError, WordIndex};
use crate::watcher::{CombinedWatcher, EventSink, FileEvent, WatchError};

/// Reads a file's text content. Pluggable so tests can substitute
/// failures; defaults to [`std::fs::read_to_string`].
pub type ContentReader = Arc<dyn Fn(&Path) -> io::Result<String> + Send + Sync>;

/// Configuration for [`TextFinder`].
#[derive(Clone)]
pub struct FinderConfig {
    /// Index configuration; the tokenizer is required.
    pub index: IndexConfig,
    /// Content source used when a file is detected or changed.
    pub reader: ContentReader,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            index: IndexConfig::default(),
            reader: Arc::new(|path| std::fs::read_to_string(path)),
        }
    }
}

/// Live word search over watched files and directories.
///
/// Each watched path moves through one lifecycle: untracked -> Detected ->
/// indexed -> (Changed -> indexed)* -> Gone -> untracked. Content enters
/// the index exclusively through Detected and Changed events — there is no
/// separate bulk-indexing path — while queries read the index directly and
/// bypass the watchers entirely.
pub struct TextFinder {
    index: Arc<WordIndex>,
    watcher: CombinedWatcher,
}

impl TextFinder {
    /// Build a finder. Fails with [`IndexError::MissingTokenizer`] when
    /// the configuration carries no tokenizer.
    pub fn new(config: FinderConfig) -> Result<Self, IndexError> {
        let index = Arc::new(WordIndex::new(config.index)?);
        let sink = event_sink(Arc::clone(&index), config.reader);
        Ok(Self {
            index,
            watcher: CombinedWatcher::new(sink),
        })
    }

    /// Watch a single file; its current content is indexed via the
    /// Detected event the registration produces.
    pub fn add_file(&self, path: &Path) -> Result<(), WatchError> {
        let path = absolute(path)?;
        self.watcher.add_file(&path)
    }

    /// Watch a directory tree recursively.
    ///
    /// Returns only after every file already under the tree has had its
    /// Detected event delivered and its content indexed.
    pub fn add_directory(&self, path: &Path) -> Result<(), WatchError> {
        let path = absolute(path)?;
        self.watcher.add_directory(&path)
    }

    /// Files whose indexed content contains `word`, sorted.
    pub fn find_files_containing_word(&self, word: &str) -> Vec<PathBuf> {
        self.index.find_files(word)
    }

    /// Number of distinct tokens currently indexed.
    pub fn token_count(&self) -> usize {
        self.index.token_count()
    }

    /// Stop watching. Queries keep answering from the now-frozen index;
    /// further registrations fail with [`WatchError::Disposed`].
    pub fn close(&self) {
        self.watcher.close();
    }
}

/// The index mutation for each lifecycle event, run synchronously on the
/// delivering thread.
///
/// Unreadable content is absorbed and logged, never propagated: no caller
/// waits on asynchronous filesystem events, and a Gone event typically
/// follows to clean up. One unreadable file must not halt the watcher or
/// corrupt index state for other files.
fn event_sink(index: Arc<WordIndex>, reader: ContentReader) -> EventSink {
    Arc::new(move |event| match event {
        FileEvent::Detected(path) => match reader(&path) {
            Ok(text) => {
                index.add_text(&text, &path);
                crate::debug_event!("index", "added", "{}", path.display());
            }
            Err(e) => {
                tracing::warn!("[index] cannot read detected file {}: {e}", path.display());
            }
        },
        FileEvent::Changed(path) => {
            // Stale tokens from the previous content are purged before the
            // re-add, never merged with the old set.
            index.remove_file(&path);
            match reader(&path) {
                Ok(text) => {
                    index.add_text(&text, &path);
                    crate::debug_event!("index", "reindexed", "{}", path.display());
                }
                Err(e) => {
                    tracing::warn!("[index] cannot read changed file {}: {e}", path.display());
                }
            }
        }
        FileEvent::Gone(path) => {
            index.remove_file(&path);
            crate::debug_event!("index", "removed", "{}", path.display());
        }
    })
}

/// Resolve a user-supplied path to the absolute form watchers and the
/// index key on. An unresolvable target reports as not found.
fn absolute(path: &Path) -> Result<PathBuf, WatchError> {
    std::fs::canonicalize(path).map_err(|_| WatchError::NotFound {
        path: path.to_path_buf(),
    })
}
