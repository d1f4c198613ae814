use crate::index::{FrequencyMatrix, TextIndex, WordIndex};
use anyhow::{bail, ensure, Context, Result};
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Word/id pairs, one per line.
pub const WORD_INDEX_FILE: &str = "indexMap";
/// Row/column header line followed by one row of scores per line.
pub const MATRIX_FILE: &str = "frequencyMatrix";
/// Document count followed by index/name pairs, one per line.
pub const DOCUMENTS_FILE: &str = "textFiles";

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn word_index(&self) -> PathBuf { self.root.join(WORD_INDEX_FILE) }
    fn matrix(&self) -> PathBuf { self.root.join(MATRIX_FILE) }
    fn documents(&self) -> PathBuf { self.root.join(DOCUMENTS_FILE) }
}

/// Write all three index artifacts into the target directory, creating it
/// if absent.
pub fn save_index(paths: &IndexPaths, index: &TextIndex) -> Result<()> {
    create_dir_all(&paths.root)
        .with_context(|| format!("creating {}", paths.root.display()))?;
    save_word_index(&paths.word_index(), &index.words)?;
    save_matrix(&paths.matrix(), &index.matrix)?;
    save_documents(&paths.documents(), &index.documents)?;
    Ok(())
}

/// Read all three artifacts back. A header count that disagrees with the
/// data actually present is an error; a truncated index is never silently
/// accepted.
pub fn load_index(paths: &IndexPaths) -> Result<TextIndex> {
    let words = load_word_index(&paths.word_index())?;
    let matrix = load_matrix(&paths.matrix())?;
    let documents = load_documents(&paths.documents())?;
    ensure!(
        matrix.rows() == documents.len(),
        "index at {} is inconsistent: matrix holds {} documents, document table {}",
        paths.root.display(),
        matrix.rows(),
        documents.len()
    );
    ensure!(
        matrix.cols_used() == words.len(),
        "index at {} is inconsistent: matrix holds {} words, word map {}",
        paths.root.display(),
        matrix.cols_used(),
        words.len()
    );
    Ok(TextIndex { words, matrix, documents })
}

fn save_word_index(path: &Path, words: &WordIndex) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for (word, id) in words.entries() {
        writeln!(out, "{word}\t{id}")?;
    }
    out.flush()?;
    Ok(())
}

fn save_matrix(path: &Path, matrix: &FrequencyMatrix) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let rows = matrix.used_rows();
    writeln!(out, "{}\t{}", rows.len(), matrix.cols_used())?;
    for row in rows {
        let line = row.iter().map(f64::to_string).collect::<Vec<_>>().join("\t");
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

fn save_documents(path: &Path, documents: &[String]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", documents.len())?;
    for (index, name) in documents.iter().enumerate() {
        writeln!(out, "{index}\t{name}")?;
    }
    out.flush()?;
    Ok(())
}

fn load_word_index(path: &Path) -> Result<WordIndex> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut pairs = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (word, id) = match (fields.next(), fields.next()) {
            (Some(word), Some(id)) => (word, id),
            _ => bail!("malformed word entry in {}: {line:?}", path.display()),
        };
        let id = id
            .parse()
            .with_context(|| format!("bad word id in {}: {line:?}", path.display()))?;
        pairs.push((word.to_string(), id));
    }
    Ok(WordIndex::from_entries(pairs))
}

fn load_matrix(path: &Path) -> Result<FrequencyMatrix> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut lines = BufReader::new(file).lines();
    let header = match lines.next() {
        Some(line) => line?,
        None => bail!("{} is empty", path.display()),
    };
    let mut counts = header.split_whitespace();
    let (document_count, word_count) = match (counts.next(), counts.next()) {
        (Some(documents), Some(words)) => (
            documents.parse::<usize>(),
            words.parse::<usize>(),
        ),
        _ => bail!("malformed matrix header in {}: {header:?}", path.display()),
    };
    let document_count =
        document_count.with_context(|| format!("bad document count in {}", path.display()))?;
    let word_count =
        word_count.with_context(|| format!("bad word count in {}", path.display()))?;

    let mut rows = Vec::with_capacity(document_count);
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|field| {
                field
                    .parse::<f64>()
                    .with_context(|| format!("bad score in {}: {field:?}", path.display()))
            })
            .collect::<Result<Vec<f64>>>()?;
        ensure!(
            row.len() == word_count,
            "row {} of {} holds {} scores, header promises {word_count}",
            rows.len(),
            path.display(),
            row.len()
        );
        rows.push(row);
    }
    ensure!(
        rows.len() == document_count,
        "{} holds {} score rows, header promises {document_count}",
        path.display(),
        rows.len()
    );
    Ok(FrequencyMatrix::from_rows(rows))
}

fn load_documents(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut lines = BufReader::new(file).lines();
    let header = match lines.next() {
        Some(line) => line?,
        None => bail!("{} is empty", path.display()),
    };
    let document_count: usize = header
        .trim()
        .parse()
        .with_context(|| format!("bad document count in {}: {header:?}", path.display()))?;

    let mut documents = vec![String::new(); document_count];
    let mut seen = 0;
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (index, name) = match line.split_once('\t') {
            Some(pair) => pair,
            None => bail!("malformed document entry in {}: {line:?}", path.display()),
        };
        let index: usize = index
            .parse()
            .with_context(|| format!("bad document index in {}: {line:?}", path.display()))?;
        ensure!(
            index < document_count,
            "document index {index} out of range in {}",
            path.display()
        );
        documents[index] = name.to_string();
        seen += 1;
    }
    ensure!(
        seen == document_count,
        "{} holds {seen} documents, header promises {document_count}",
        path.display()
    );
    Ok(documents)
}
