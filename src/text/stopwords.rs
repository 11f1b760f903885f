// Fixed English stopword set.
//
// Backed by the `stop-words` crate's NLTK English list (the `nltk` feature),
// built once per process and shared read-only afterwards.

use std::collections::HashSet;
use std::sync::OnceLock;

use stop_words::{get, LANGUAGE};

static STOPWORDS: OnceLock<HashSet<String>> = OnceLock::new();

/// The English stopword set, lowercased.
pub fn stopwords() -> &'static HashSet<String> {
    STOPWORDS.get_or_init(|| {
        let words: Vec<String> = get(LANGUAGE::English);
        words.into_iter().map(|w| w.to_lowercase()).collect()
    })
}

/// True if `word` (already lowercased) is in the stopword set.
pub fn is_stopword(word: &str) -> bool {
    stopwords().contains(word)
}
