use anyhow::{bail, ensure, Result};
use booksearch_core::build::build_index;
use booksearch_core::index::TextIndex;
use booksearch_core::persist::{load_index, save_index, IndexPaths};
use booksearch_core::search::rank_documents;
use booksearch_core::tokenizer::{tokenize, QUERY_SEPARATORS};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::thread;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

const RESULTS_PER_QUERY: usize = 5;
const QUIT_COMMAND: &str = "!q";

#[derive(Parser)]
#[command(name = "booksearch")]
#[command(about = "Build a TF-IDF index over a text folder and search it interactively", long_about = None)]
struct Cli {
    /// Number of indexing workers; defaults to the available CPU parallelism
    workers: Option<usize>,
    /// Folder holding the text files to index
    #[arg(long, default_value = "./texts")]
    source: PathBuf,
    /// Folder the index artifacts are written to
    #[arg(long, default_value = "./results")]
    index: PathBuf,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let workers = match cli.workers {
        Some(0) => bail!("worker count must be at least 1"),
        Some(count) => count,
        None => thread::available_parallelism().map(|count| count.get()).unwrap_or(1),
    };

    let documents = list_text_files(&cli.source)?;
    let index = build_index(&cli.source, documents, workers)?;
    let paths = IndexPaths::new(&cli.index);
    save_index(&paths, &index)?;
    tracing::info!(index_dir = %cli.index.display(), "index persisted");

    // Serve queries from the persisted copy, not the in-memory build.
    let index = load_index(&paths)?;
    query_loop(&index)
}

/// Names of the files directly inside `dir`, sorted for a stable row order.
fn list_text_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    ensure!(!names.is_empty(), "no text files found in {}", dir.display());
    Ok(names)
}

fn query_loop(index: &TextIndex) -> Result<()> {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("\nWhat do you want to search ({QUIT_COMMAND} for quit): ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let input = line.trim();
        if input == QUIT_COMMAND {
            return Ok(());
        }
        let words = tokenize(input, QUERY_SEPARATORS);
        let ranked = rank_documents(index, &words);
        for (rank, name) in ranked.iter().take(RESULTS_PER_QUERY).enumerate() {
            println!("{}) {}", rank + 1, name);
        }
    }
}
