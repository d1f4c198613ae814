use crate::index::{FrequencyMatrix, TextIndex, WordIndex};
use crate::tokenizer::{tokenize, INDEX_SEPARATORS};
use anyhow::{ensure, Context, Result};
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::thread;
use std::time::Instant;

/// Build the TF-IDF index for `documents` (file names inside `folder`),
/// spreading the work over `workers` threads.
///
/// Runs as three fork-join phases with a full barrier between them. Each
/// phase cuts its domain (document rows, then word columns, then document
/// rows again) into contiguous per-worker ranges.
pub fn build_index(folder: &Path, documents: Vec<String>, workers: usize) -> Result<TextIndex> {
    ensure!(workers >= 1, "worker count must be at least 1");
    ensure!(!documents.is_empty(), "nothing to index: the document list is empty");
    let workers = workers.min(documents.len());

    let start = Instant::now();
    let words = WordIndex::new();
    let matrix = FrequencyMatrix::new(documents.len());

    compute_term_frequencies(folder, &documents, &words, &matrix, workers)?;
    tracing::debug!(words = words.len(), "term frequencies accumulated");

    let idfs = compute_inverse_document_frequencies(&matrix, documents.len(), workers);
    tracing::debug!("inverse document frequencies computed");

    combine(&matrix, &idfs, workers);
    tracing::info!(
        workers,
        documents = documents.len(),
        words = words.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "index built"
    );

    Ok(TextIndex { words, matrix, documents })
}

/// Phase 1: each worker tokenizes its own rows' documents, counts term
/// occurrences into the shared matrix, and normalizes each finished row by
/// the document's token count.
fn compute_term_frequencies(
    folder: &Path,
    documents: &[String],
    words: &WordIndex,
    matrix: &FrequencyMatrix,
    workers: usize,
) -> Result<()> {
    thread::scope(|scope| {
        let handles: Vec<_> = split_ranges(documents.len(), workers)
            .into_iter()
            .map(|range| {
                scope.spawn(move || -> Result<()> {
                    for row in range {
                        let name = &documents[row];
                        let path = folder.join(name);
                        let text = fs::read_to_string(&path)
                            .with_context(|| format!("reading {}", path.display()))?;
                        index_document(&text, row, words, matrix)
                            .with_context(|| format!("indexing {name}"))?;
                    }
                    Ok(())
                })
            })
            .collect();
        join_workers(handles)
    })
}

fn index_document(
    text: &str,
    row: usize,
    words: &WordIndex,
    matrix: &FrequencyMatrix,
) -> Result<()> {
    let tokens = tokenize(text, INDEX_SEPARATORS);
    ensure!(!tokens.is_empty(), "document produced no tokens");
    for token in &tokens {
        let id = match words.lookup(token) {
            Some(id) => id,
            None => {
                let id = words.insert_if_absent(token);
                matrix.ensure_column(id);
                id
            }
        };
        matrix.increment(row, id);
    }
    matrix.scale_row(row, 1.0 / tokens.len() as f64);
    Ok(())
}

/// Phase 2: `idf = log10(appearing / documents) + 1` per word. Each worker
/// writes a disjoint chunk of the output, so the only coordination is the
/// scope join; the matrix is read-only here.
fn compute_inverse_document_frequencies(
    matrix: &FrequencyMatrix,
    document_count: usize,
    workers: usize,
) -> Vec<f64> {
    let word_count = matrix.cols_used();
    let mut idfs = vec![0.0; word_count];
    let documents = document_count as f64;
    thread::scope(|scope| {
        let mut rest = idfs.as_mut_slice();
        for range in split_ranges(word_count, workers) {
            let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            rest = tail;
            scope.spawn(move || {
                for (offset, idf) in chunk.iter_mut().enumerate() {
                    let appearing = matrix.count_nonzero_in_column(range.start + offset);
                    *idf = (appearing as f64 / documents).log10() + 1.0;
                }
            });
        }
    });
    idfs
}

/// Phase 3: scale every used cell by its own word's inverse document
/// frequency, `cell[row][col] *= idfs[col]`.
fn combine(matrix: &FrequencyMatrix, idfs: &[f64], workers: usize) {
    thread::scope(|scope| {
        for range in split_ranges(matrix.rows(), workers) {
            scope.spawn(move || {
                for row in range {
                    matrix.apply_column_weights(row, idfs);
                }
            });
        }
    });
}

/// Cut `0..len` into `parts` contiguous ranges of `len / parts` items, the
/// last range absorbing the remainder.
fn split_ranges(len: usize, parts: usize) -> Vec<Range<usize>> {
    let chunk = len / parts;
    (0..parts)
        .map(|part| {
            let start = part * chunk;
            let end = if part + 1 == parts { len } else { start + chunk };
            start..end
        })
        .collect()
}

fn join_workers(handles: Vec<thread::ScopedJoinHandle<'_, Result<()>>>) -> Result<()> {
    for handle in handles {
        match handle.join() {
            Ok(outcome) => outcome?,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
    Ok(())
}
