//! Live, searchable inverted word index over watched files and directories.
//!
//! The crate pairs two things: a concurrent inverted index
//! ([`WordIndex`]: token -> set of file paths) and a reconciliation layer
//! that converts raw, type-ambiguous filesystem notifications
//! (create/change/delete/rename, at file and directory granularity) into
//! three reliable lifecycle events: Detected, Changed, Gone. The
//! reconciliation is the interesting part: the notification source reports
//! only a path at delete/rename time, not whether that path was a file or
//! a directory, because the entity no longer exists to inspect.
//!
//! [`TextFinder`] ties the two together: register paths, and the index
//! stays in sync with the filesystem without re-scanning from scratch.
//!
//! ```no_run
//! use wordwatch::{FinderConfig, TextFinder, Tokenizer};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut config = FinderConfig::default();
//! config.index.tokenizer = Some(Tokenizer::non_word());
//!
//! let finder = TextFinder::new(config)?;
//! finder.add_directory("notes".as_ref())?;
//!
//! for path in finder.find_files_containing_word("hello") {
//!     println!("{}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod index;
pub mod logging;
pub mod watcher;

mod finder;

pub use config::Settings;
pub use finder::{ContentReader, FinderConfig, TextFinder};
pub use index::{IndexConfig, IndexError, Tokenizer, WordIndex};
pub use watcher::{
    CombinedWatcher, DirectoryWatcher, EventSink, FileEvent, SingleFileWatcher, TrackedFiles,
    WatchError,
};
