use crate::index::{FrequencyMatrix, TextIndex, WordId};
use std::cmp::Ordering;

struct SearchResult {
    document: usize,
    matched_terms: usize,
    score_sum: f64,
}

/// Rank every document against the query words, most relevant first.
///
/// Words the index has never seen contribute nothing. Documents are ordered
/// by how many distinct query terms they contain, then by the sum of their
/// scores for those terms; remaining ties keep document order. The caller
/// truncates to however many results it wants to show.
pub fn rank_documents<'a>(index: &'a TextIndex, query_words: &[String]) -> Vec<&'a str> {
    let mut ids: Vec<WordId> = query_words
        .iter()
        .filter_map(|word| index.words.lookup(word))
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let mut results: Vec<SearchResult> = (0..index.documents.len())
        .map(|document| score_document(&index.matrix, document, &ids))
        .collect();
    results.sort_by(|a, b| {
        b.matched_terms
            .cmp(&a.matched_terms)
            .then_with(|| b.score_sum.partial_cmp(&a.score_sum).unwrap_or(Ordering::Equal))
    });

    results
        .into_iter()
        .map(|result| index.documents[result.document].as_str())
        .collect()
}

fn score_document(matrix: &FrequencyMatrix, document: usize, ids: &[WordId]) -> SearchResult {
    let mut matched_terms = 0;
    let mut score_sum = 0.0;
    for &id in ids {
        let score = matrix.score(document, id);
        if score > 0.0 {
            matched_terms += 1;
        }
        score_sum += score;
    }
    SearchResult { document, matched_terms, score_sum }
}
