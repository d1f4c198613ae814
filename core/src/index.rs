use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;

/// Dense identifier a word receives when first seen.
pub type WordId = usize;

/// Columns allocated before the first growth.
const INITIAL_CAPACITY: usize = 4;

/// Word-to-id map shared across indexing workers.
///
/// Ids are assigned in first-seen order, densely from 0, and never
/// reassigned. `lookup` takes only the shared lock, so the hot path for
/// repeated words stays off the exclusive lock.
#[derive(Default, Debug)]
pub struct WordIndex {
    inner: RwLock<WordMap>,
}

#[derive(Default, Debug)]
struct WordMap {
    ids: HashMap<String, WordId>,
    next_id: WordId,
}

impl WordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, word: &str) -> Option<WordId> {
        self.inner.read().ids.get(word).copied()
    }

    /// Id of `word`, assigning the next free one on first sight.
    /// Re-checks under the write lock so two racing inserts of the same
    /// new word agree on a single id.
    pub fn insert_if_absent(&self, word: &str) -> WordId {
        if let Some(id) = self.lookup(word) {
            return id;
        }
        let mut map = self.inner.write();
        if let Some(&id) = map.ids.get(word) {
            return id;
        }
        let id = map.next_id;
        map.ids.insert(word.to_string(), id);
        map.next_id += 1;
        id
    }

    /// Number of distinct words seen so far.
    pub fn len(&self) -> usize {
        self.inner.read().next_id
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every (word, id) pair, in arbitrary order.
    pub fn entries(&self) -> Vec<(String, WordId)> {
        self.inner
            .read()
            .ids
            .iter()
            .map(|(word, &id)| (word.clone(), id))
            .collect()
    }

    pub fn from_entries(pairs: impl IntoIterator<Item = (String, WordId)>) -> Self {
        let mut ids = HashMap::new();
        let mut next_id = 0;
        for (word, id) in pairs {
            next_id = next_id.max(id + 1);
            ids.insert(word, id);
        }
        Self {
            inner: RwLock::new(WordMap { ids, next_id }),
        }
    }
}

/// Document-by-word score table. The row count is fixed at construction;
/// the column space doubles as new word ids appear.
///
/// All storage access goes through the outer lock: growth holds it
/// exclusively, cell reads and writes hold it shared plus the row's own
/// mutex. A worker incrementing an existing word therefore never observes
/// a row mid-replacement.
#[derive(Debug)]
pub struct FrequencyMatrix {
    inner: RwLock<Columns>,
}

#[derive(Debug)]
struct Columns {
    rows: Vec<Mutex<Vec<f64>>>,
    cols_used: usize,
    capacity: usize,
}

impl Columns {
    fn grow(&mut self) {
        let capacity = (self.capacity * 2).max(INITIAL_CAPACITY);
        for row in &mut self.rows {
            row.get_mut().resize(capacity, 0.0);
        }
        self.capacity = capacity;
    }
}

impl FrequencyMatrix {
    pub fn new(rows: usize) -> Self {
        let rows = (0..rows)
            .map(|_| Mutex::new(vec![0.0; INITIAL_CAPACITY]))
            .collect();
        Self {
            inner: RwLock::new(Columns {
                rows,
                cols_used: 0,
                capacity: INITIAL_CAPACITY,
            }),
        }
    }

    pub fn rows(&self) -> usize {
        self.inner.read().rows.len()
    }

    /// Number of columns actually populated (the word count).
    pub fn cols_used(&self) -> usize {
        self.inner.read().cols_used
    }

    /// Make room for `col`, doubling capacity while fewer than one slack
    /// column would remain. Existing cell values survive growth unchanged.
    pub fn ensure_column(&self, col: usize) {
        let mut columns = self.inner.write();
        if col + 1 > columns.cols_used {
            columns.cols_used = col + 1;
        }
        while columns.cols_used + 1 >= columns.capacity {
            columns.grow();
        }
    }

    /// Add 1 to a cell. Workers own disjoint rows, so the row mutex is
    /// uncontended; growth is still coordinated through the outer lock.
    /// A word id can be published before the growth that makes room for
    /// it, so an out-of-range column grows the matrix here and retries.
    pub fn increment(&self, row: usize, col: usize) {
        loop {
            {
                let columns = self.inner.read();
                let mut cells = columns.rows[row].lock();
                if col < cells.len() {
                    cells[col] += 1.0;
                    return;
                }
            }
            self.ensure_column(col);
        }
    }

    /// Number of rows with a nonzero cell in `col`.
    pub fn count_nonzero_in_column(&self, col: usize) -> usize {
        let columns = self.inner.read();
        columns.rows.iter().filter(|row| row.lock()[col] > 0.0).count()
    }

    /// Multiply every used cell of one row by `factor`.
    pub fn scale_row(&self, row: usize, factor: f64) {
        let columns = self.inner.read();
        let mut cells = columns.rows[row].lock();
        for cell in &mut cells[..columns.cols_used] {
            *cell *= factor;
        }
    }

    /// Multiply each used cell of one row by the weight of its column.
    pub fn apply_column_weights(&self, row: usize, weights: &[f64]) {
        let columns = self.inner.read();
        let mut cells = columns.rows[row].lock();
        for (cell, weight) in cells[..columns.cols_used].iter_mut().zip(weights) {
            *cell *= weight;
        }
    }

    pub fn score(&self, row: usize, col: usize) -> f64 {
        let columns = self.inner.read();
        let cells = columns.rows[row].lock();
        cells.get(col).copied().unwrap_or(0.0)
    }

    /// Row-major copy of the used cells, for persistence.
    pub fn used_rows(&self) -> Vec<Vec<f64>> {
        let columns = self.inner.read();
        columns
            .rows
            .iter()
            .map(|row| row.lock()[..columns.cols_used].to_vec())
            .collect()
    }

    /// Rebuild a matrix from loaded rows, which must all share one width;
    /// capacity equals that width.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let cols_used = rows.first().map_or(0, Vec::len);
        let rows = rows.into_iter().map(Mutex::new).collect();
        Self {
            inner: RwLock::new(Columns {
                rows,
                cols_used,
                capacity: cols_used,
            }),
        }
    }
}

/// A fully built index: the word map, the score matrix, and the document
/// names aligned with matrix rows.
#[derive(Debug)]
pub struct TextIndex {
    pub words: WordIndex,
    pub matrix: FrequencyMatrix,
    pub documents: Vec<String>,
}
