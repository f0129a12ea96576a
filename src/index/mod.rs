//! Concurrent inverted word index.
//!
//! Maps each token to the set of files whose content contains it. One
//! reader-writer lock guards the whole map: `remove_file` has to sweep
//! every token, which a per-token lock could not serve. Lookups take the
//! read lock and return an owned snapshot, so a caller's result never
//! changes retroactively under concurrent mutation.

mod tokenizer;

pub use tokenizer::Tokenizer;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use thiserror::Error;

/// Errors from index construction.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The configuration carried no tokenizer. Rejected at construction,
    /// not at first use.
    #[error("no tokenizer configured")]
    MissingTokenizer,
}

/// Configuration for [`WordIndex`].
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Required. Splits file content into tokens.
    pub tokenizer: Option<Tokenizer>,
    /// Lowercase tokens and queries before matching. Defaults to true.
    pub case_insensitive: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            tokenizer: None,
            case_insensitive: true,
        }
    }
}

/// Inverted index: token -> set of absolute file paths.
///
/// A token key exists only while its file set is non-empty; drained
/// entries are pruned in the same pass that empties them.
pub struct WordIndex {
    entries: RwLock<HashMap<String, HashSet<PathBuf>>>,
    tokenizer: Tokenizer,
    case_insensitive: bool,
}

impl WordIndex {
    /// Build an index. Fails with [`IndexError::MissingTokenizer`] when
    /// `config.tokenizer` is absent.
    pub fn new(config: IndexConfig) -> Result<Self, IndexError> {
        let tokenizer = config.tokenizer.ok_or(IndexError::MissingTokenizer)?;
        Ok(Self {
            entries: RwLock::new(HashMap::new()),
            tokenizer,
            case_insensitive: config.case_insensitive,
        })
    }

    /// Index `text` under `path`.
    ///
    /// Tokens are deduplicated before insertion, so re-adding identical
    /// content for the same path changes nothing. Empty text adds no
    /// tokens. Lock hold time is proportional to the distinct tokens in
    /// `text`.
    pub fn add_text(&self, text: &str, path: &Path) {
        let tokens: HashSet<String> = self
            .tokenizer
            .split(text)
            .into_iter()
            .filter(|token| !token.is_empty())
            .map(|token| self.normalize(&token))
            .collect();
        if tokens.is_empty() {
            return;
        }

        let mut entries = self.entries.write();
        for token in tokens {
            entries.entry(token).or_default().insert(path.to_path_buf());
        }
    }

    /// Remove `path` from every token's file set, pruning tokens whose set
    /// drains to empty.
    ///
    /// Cost is proportional to the number of distinct tokens currently
    /// indexed; removal is rarer than lookup, so the full sweep buys O(1)
    /// lookups. Idempotent.
    pub fn remove_file(&self, path: &Path) {
        let mut entries = self.entries.write();
        entries.retain(|_, files| {
            files.remove(path);
            !files.is_empty()
        });
    }

    /// Files whose indexed content contains `word`, sorted.
    ///
    /// An unknown word yields an empty vec, not an error. The result is an
    /// owned snapshot and never aliases live index state.
    pub fn find_files(&self, word: &str) -> Vec<PathBuf> {
        let needle = self.normalize(word);
        let entries = self.entries.read();
        let Some(files) = entries.get(&needle) else {
            return Vec::new();
        };
        let mut found: Vec<PathBuf> = files.iter().cloned().collect();
        found.sort();
        found
    }

    /// Number of distinct tokens currently indexed.
    pub fn token_count(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn normalize(&self, word: &str) -> String {
        if self.case_insensitive {
            word.to_lowercase()
        } else {
            word.to_owned()
        }
    }
}
