use booksearch_core::build::build_index;
use booksearch_core::search::rank_documents;
use booksearch_core::tokenizer::{tokenize, QUERY_SEPARATORS};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_corpus(dir: &Path, docs: &[(&str, &str)]) -> Vec<String> {
    for (name, text) in docs {
        fs::write(dir.join(name), text).unwrap();
    }
    docs.iter().map(|(name, _)| name.to_string()).collect()
}

#[test]
fn documents_matching_more_query_terms_rank_first() {
    let dir = tempdir().unwrap();
    let documents = write_corpus(
        dir.path(),
        &[
            ("doc0", "the cat sat"),
            ("doc1", "the dog sat"),
            ("doc2", "a cat and a dog"),
        ],
    );
    let index = build_index(dir.path(), documents, 2).unwrap();

    let query = tokenize("cat dog", QUERY_SEPARATORS);
    let ranked = rank_documents(&index, &query);
    // doc2 carries both terms; doc0 and doc1 each carry one with equal
    // scores, so input order decides between them.
    assert_eq!(ranked, vec!["doc2", "doc0", "doc1"]);
}

#[test]
fn unknown_query_words_are_dropped_not_fatal() {
    let dir = tempdir().unwrap();
    let documents = write_corpus(
        dir.path(),
        &[("doc0", "the cat sat"), ("doc1", "the dog sat")],
    );
    let index = build_index(dir.path(), documents, 1).unwrap();

    let query = tokenize("zeppelin quux", QUERY_SEPARATORS);
    let ranked = rank_documents(&index, &query);
    assert_eq!(ranked, vec!["doc0", "doc1"]);

    // A known word mixed with unknowns still scores normally.
    let query = tokenize("zeppelin dog", QUERY_SEPARATORS);
    let ranked = rank_documents(&index, &query);
    assert_eq!(ranked[0], "doc1");
}

#[test]
fn asking_for_more_results_than_documents_returns_them_all() {
    let dir = tempdir().unwrap();
    let documents = write_corpus(dir.path(), &[("doc0", "alpha"), ("doc1", "beta")]);
    let index = build_index(dir.path(), documents, 1).unwrap();

    let query = tokenize("alpha", QUERY_SEPARATORS);
    let ranked: Vec<_> = rank_documents(&index, &query).into_iter().take(10).collect();
    assert_eq!(ranked.len(), 2);
}

#[test]
fn a_document_with_no_tokens_fails_the_build() {
    let dir = tempdir().unwrap();
    let documents = write_corpus(
        dir.path(),
        &[("doc0", "actual words here"), ("punct-only", ".,;!?")],
    );
    let err = build_index(dir.path(), documents, 1).unwrap_err();
    assert!(err.to_string().contains("punct-only"));
}

#[test]
fn a_zero_worker_count_is_rejected() {
    let dir = tempdir().unwrap();
    let documents = write_corpus(dir.path(), &[("doc0", "alpha")]);
    assert!(build_index(dir.path(), documents, 0).is_err());
}

#[test]
fn an_empty_document_list_is_rejected() {
    let dir = tempdir().unwrap();
    assert!(build_index(dir.path(), Vec::new(), 2).is_err());
}

#[test]
fn a_missing_document_fails_the_build() {
    let dir = tempdir().unwrap();
    let mut documents = write_corpus(dir.path(), &[("doc0", "alpha")]);
    documents.push("not-there".to_string());
    assert!(build_index(dir.path(), documents, 2).is_err());
}

#[test]
fn worker_count_does_not_change_scores() {
    let dir = tempdir().unwrap();
    let documents = write_corpus(
        dir.path(),
        &[
            ("doc0", "ships sail the grey sea"),
            ("doc1", "the sea takes the ships"),
            ("doc2", "grey harbors hold no ships"),
            ("doc3", "sail away sail away"),
        ],
    );
    let serial = build_index(dir.path(), documents.clone(), 1).unwrap();
    let parallel = build_index(dir.path(), documents, 4).unwrap();

    assert_eq!(serial.words.len(), parallel.words.len());
    for (word, serial_id) in serial.words.entries() {
        let parallel_id = parallel.words.lookup(&word).unwrap();
        for row in 0..serial.documents.len() {
            assert_eq!(
                serial.matrix.score(row, serial_id),
                parallel.matrix.score(row, parallel_id),
                "score for {word:?} in row {row} differs"
            );
        }
    }
}
