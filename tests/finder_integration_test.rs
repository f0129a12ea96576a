//! End-to-end tests: watched filesystem changes flowing into query results.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use wordwatch::{FinderConfig, IndexError, TextFinder, Tokenizer, WatchError};

fn finder() -> TextFinder {
    let mut config = FinderConfig::default();
    config.index.tokenizer = Some(Tokenizer::non_word());
    TextFinder::new(config).unwrap()
}

/// Poll until `condition` holds; live indexing runs on notify's delivery
/// thread, so post-registration assertions need to wait.
fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if condition() {
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
    panic!("timed out waiting for {what}");
}

#[test]
fn missing_tokenizer_is_a_construction_error() {
    let result = TextFinder::new(FinderConfig::default());
    assert!(matches!(result, Err(IndexError::MissingTokenizer)));
}

#[test]
fn watched_files_answer_word_queries() {
    let dir = TempDir::new().unwrap();
    let f1 = dir.path().join("f1.txt");
    let f2 = dir.path().join("f2.txt");
    fs::write(&f1, "hello world").unwrap();
    fs::write(&f2, "hello universe").unwrap();
    let finder = finder();

    finder.add_file(&f1).unwrap();
    finder.add_file(&f2).unwrap();

    // Registration indexes synchronously, so no waiting here.
    let f1 = f1.canonicalize().unwrap();
    let f2 = f2.canonicalize().unwrap();
    assert_eq!(
        finder.find_files_containing_word("hello"),
        sorted(vec![f1.clone(), f2.clone()])
    );
    assert_eq!(finder.find_files_containing_word("world"), vec![f1]);
    assert_eq!(finder.find_files_containing_word("universe"), vec![f2]);
    assert!(finder.find_files_containing_word("absent").is_empty());
}

#[test]
fn add_directory_indexes_existing_files_before_returning() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("a.txt"), "alpha common").unwrap();
    fs::write(dir.path().join("nested/b.txt"), "beta common").unwrap();
    let finder = finder();

    finder.add_directory(dir.path()).unwrap();

    let root = dir.path().canonicalize().unwrap();
    assert_eq!(
        finder.find_files_containing_word("common"),
        sorted(vec![root.join("a.txt"), root.join("nested/b.txt")])
    );
}

#[test]
fn queries_are_case_insensitive_by_default() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("greeting.txt");
    fs::write(&file, "Hello").unwrap();
    let finder = finder();

    finder.add_file(&file).unwrap();

    let file = file.canonicalize().unwrap();
    assert_eq!(finder.find_files_containing_word("hello"), vec![file]);
}

#[test]
fn created_file_becomes_searchable() {
    let dir = TempDir::new().unwrap();
    let finder = finder();
    finder.add_directory(dir.path()).unwrap();

    let root = dir.path().canonicalize().unwrap();
    fs::write(root.join("new.txt"), "nightingale").unwrap();

    wait_until("new file to be indexed", || {
        finder.find_files_containing_word("nightingale") == vec![root.join("new.txt")]
    });
}

#[test]
fn changed_content_replaces_stale_tokens() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("draft.txt");
    fs::write(&file, "obsolete words").unwrap();
    let finder = finder();
    finder.add_directory(dir.path()).unwrap();

    let indexed = file.canonicalize().unwrap();
    assert_eq!(
        finder.find_files_containing_word("obsolete"),
        vec![indexed.clone()]
    );

    fs::write(&file, "replacement words").unwrap();

    wait_until("changed content to be reindexed", || {
        finder.find_files_containing_word("replacement") == vec![indexed.clone()]
    });
    // Stale tokens are purged, never merged with the new content.
    wait_until("stale tokens to be purged", || {
        finder.find_files_containing_word("obsolete").is_empty()
    });
    assert_eq!(finder.find_files_containing_word("words"), vec![indexed]);
}

#[test]
fn deleted_file_leaves_the_index() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("doomed.txt");
    fs::write(&file, "ephemeral").unwrap();
    let finder = finder();
    finder.add_directory(dir.path()).unwrap();
    assert_eq!(finder.token_count(), 1);

    fs::remove_file(&file).unwrap();

    wait_until("deleted file to leave the index", || {
        finder.find_files_containing_word("ephemeral").is_empty()
    });
    // Drained tokens are pruned with their last file.
    wait_until("token count to drop", || finder.token_count() == 0);
}

#[test]
fn renamed_file_is_reindexed_under_its_new_path() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("old.txt");
    fs::write(&old, "migratory").unwrap();
    let finder = finder();
    finder.add_directory(dir.path()).unwrap();

    let root = dir.path().canonicalize().unwrap();
    fs::rename(&old, root.join("new.txt")).unwrap();

    wait_until("rename to settle in the index", || {
        finder.find_files_containing_word("migratory") == vec![root.join("new.txt")]
    });
}

#[test]
fn registration_of_missing_paths_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let finder = finder();

    let missing = dir.path().join("absent");
    assert!(matches!(
        finder.add_file(&missing),
        Err(WatchError::NotFound { .. })
    ));
    assert!(matches!(
        finder.add_directory(&missing),
        Err(WatchError::NotFound { .. })
    ));
}

#[test]
fn closed_finder_rejects_registration_but_still_answers() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.txt");
    fs::write(&file, "persistent").unwrap();
    let finder = finder();
    finder.add_file(&file).unwrap();

    finder.close();

    assert!(matches!(
        finder.add_file(&file),
        Err(WatchError::Disposed)
    ));
    // The frozen index keeps serving queries.
    let file = file.canonicalize().unwrap();
    assert_eq!(finder.find_files_containing_word("persistent"), vec![file]);
}

#[test]
fn unreadable_content_is_absorbed_not_propagated() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("good.txt"), "readable").unwrap();
    fs::write(dir.path().join("bad.txt"), "unreachable").unwrap();

    let mut config = FinderConfig::default();
    config.index.tokenizer = Some(Tokenizer::non_word());
    config.reader = Arc::new(|path: &Path| {
        if path.ends_with("bad.txt") {
            Err(io::Error::other("simulated read failure"))
        } else {
            std::fs::read_to_string(path)
        }
    });
    let finder = TextFinder::new(config).unwrap();

    // Registration succeeds; the unreadable file is simply left out.
    finder.add_directory(dir.path()).unwrap();

    let root = dir.path().canonicalize().unwrap();
    assert_eq!(
        finder.find_files_containing_word("readable"),
        vec![root.join("good.txt")]
    );
    assert!(finder.find_files_containing_word("unreachable").is_empty());
}

fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.sort();
    paths
}
