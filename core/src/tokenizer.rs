/// Separator substrings stripped from document text while indexing.
pub const INDEX_SEPARATORS: &[&str] = &[",", ".", ";", ")", "(", "]", "[", "\"", "!", "?"];

/// Separator substrings stripped from query text. Queries additionally shed
/// the sentence-ending quote pair, which never survives indexing as part of
/// a word. Both phases must otherwise strip the same set, or query scores
/// stop lining up with indexed scores.
pub const QUERY_SEPARATORS: &[&str] = &[",", ".", ";", ")", "(", "]", "[", "\"", "!", "?", "''"];

/// Split raw text into lowercase word tokens, treating every occurrence of
/// each separator as whitespace.
pub fn tokenize(text: &str, separators: &[&str]) -> Vec<String> {
    let mut text = text.to_lowercase();
    for separator in separators {
        text = text.replace(separator, " ");
    }
    text.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_separators() {
        let tokens = tokenize("The cat, the (hungry) cat!", INDEX_SEPARATORS);
        assert_eq!(tokens, vec!["the", "cat", "the", "hungry", "cat"]);
    }

    #[test]
    fn query_set_also_strips_quote_pairs() {
        let tokens = tokenize("''wuthering heights''", QUERY_SEPARATORS);
        assert_eq!(tokens, vec!["wuthering", "heights"]);
    }

    #[test]
    fn blank_text_yields_no_tokens() {
        assert!(tokenize("", INDEX_SEPARATORS).is_empty());
        assert!(tokenize(" \t\n", INDEX_SEPARATORS).is_empty());
        assert!(tokenize(".,!?", INDEX_SEPARATORS).is_empty());
    }
}
