use booksearch_core::tokenizer::{tokenize, INDEX_SEPARATORS, QUERY_SEPARATORS};

#[test]
fn it_lowercases_and_splits() {
    let tokens = tokenize("The Cat SAT.", INDEX_SEPARATORS);
    assert_eq!(tokens, vec!["the", "cat", "sat"]);
}

#[test]
fn it_treats_every_separator_as_a_space() {
    let tokens = tokenize("one,two;three(four)five[six]seven\"eight!nine?ten", INDEX_SEPARATORS);
    assert_eq!(
        tokens,
        vec!["one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten"]
    );
}

#[test]
fn index_and_query_sets_agree_on_plain_text() {
    let text = "Call me Ishmael, some years ago.";
    assert_eq!(
        tokenize(text, INDEX_SEPARATORS),
        tokenize(text, QUERY_SEPARATORS)
    );
}
