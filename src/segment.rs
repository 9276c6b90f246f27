use charabia::Tokenize;

/// The backend rejects oversized keys, so longer terms are dropped at
/// segmentation time.
const MAX_TERM_LENGTH: usize = 250;

/// Segments a text field into index terms.
///
/// Tokens arrive normalized (lowercased) from the tokenizer, so neither the
/// indexing side nor the query side case-folds free text again.
pub fn segment(text: &str) -> Vec<String> {
    text.tokenize()
        .filter(|token| token.is_word())
        .filter_map(|token| {
            let lemma = token.lemma().trim();
            if lemma.is_empty() || lemma.len() > MAX_TERM_LENGTH {
                None
            } else {
                Some(lemma.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_normalized() {
        let terms = segment("Golang is Fun");
        assert_eq!(terms, vec!["golang", "is", "fun"]);
    }

    #[test]
    fn separators_are_dropped() {
        let terms = segment("hello, world!");
        assert_eq!(terms, vec!["hello", "world"]);
    }

    #[test]
    fn mixed_scripts_keep_the_latin_terms() {
        let terms = segment("Golang——json数据处理");
        assert!(terms.contains(&"golang".to_string()));
        assert!(terms.contains(&"json".to_string()));
    }

    #[test]
    fn empty_text_yields_no_terms() {
        assert!(segment("").is_empty());
    }
}
