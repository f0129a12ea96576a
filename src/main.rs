use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use wordwatch::{FinderConfig, Settings, TextFinder, Tokenizer};

/// Live word search over watched files and directories.
#[derive(Parser)]
#[command(name = "wordwatch")]
#[command(about = "Watch files and directories, answer word queries live")]
struct Cli {
    /// Files to watch and index.
    #[arg(short, long)]
    file: Vec<PathBuf>,

    /// Directory trees to watch and index recursively.
    #[arg(short, long)]
    dir: Vec<PathBuf>,

    /// Match words exactly instead of case-insensitively.
    #[arg(long)]
    case_sensitive: bool,

    /// Configuration file (defaults to wordwatch.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;

    wordwatch::logging::init_with_config(&settings.logging);

    let mut config = FinderConfig::default();
    config.index.tokenizer = Some(Tokenizer::non_word());
    config.index.case_insensitive = settings.case_insensitive && !cli.case_sensitive;

    let finder = TextFinder::new(config)?;

    for path in settings.watch.files.iter().chain(&cli.file) {
        finder
            .add_file(path)
            .with_context(|| format!("cannot watch file {}", path.display()))?;
    }
    for path in settings.watch.directories.iter().chain(&cli.dir) {
        finder
            .add_directory(path)
            .with_context(|| format!("cannot watch directory {}", path.display()))?;
    }

    println!(
        "{} distinct words indexed. Enter a word to search (Ctrl+D to exit):",
        finder.token_count()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let word = line.trim();
        if word.is_empty() {
            continue;
        }

        let matches = finder.find_files_containing_word(word);
        if matches.is_empty() {
            println!("no matches");
        } else {
            for path in matches {
                println!("{}", path.display());
            }
        }
    }

    finder.close();
    Ok(())
}
