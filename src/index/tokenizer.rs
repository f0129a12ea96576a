//! Pluggable word splitting.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

/// Splits text into the tokens the index stores.
///
/// Cheap to clone; the split function is shared behind an `Arc` so one
/// tokenizer can serve concurrent indexing callbacks.
#[derive(Clone)]
pub struct Tokenizer {
    split: Arc<dyn Fn(&str) -> Vec<String> + Send + Sync>,
}

impl Tokenizer {
    /// Wrap a custom split function.
    pub fn new(split: impl Fn(&str) -> Vec<String> + Send + Sync + 'static) -> Self {
        Self {
            split: Arc::new(split),
        }
    }

    /// Default splitter: tokens are the runs of word characters between
    /// runs of non-word characters (`\W+`).
    pub fn non_word() -> Self {
        let pattern = Regex::new(r"\W+").expect("hard-coded pattern");
        Self::new(move |text| {
            pattern
                .split(text)
                .filter(|token| !token.is_empty())
                .map(str::to_owned)
                .collect()
        })
    }

    /// Split `text` into tokens. May return duplicates and empty strings;
    /// the index filters both.
    pub fn split(&self, text: &str) -> Vec<String> {
        (self.split)(text)
    }
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Tokenizer(..)")
    }
}
