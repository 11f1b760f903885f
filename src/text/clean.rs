// The text cleaning routine.
//
// Step order is part of the feature contract: the vectorizer vocabulary and
// the classifier weights were learned on text cleaned exactly this way.
//
//   lowercase -> strip URLs -> strip ASCII punctuation -> strip digits
//   -> re-strip exposed URL prefixes -> split on whitespace
//   -> drop stopwords and tokens of <= 2 chars -> lemmatize -> join

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::lemmatize::lemmatize;
use super::stopwords::is_stopword;

/// Tokens with this many characters or fewer are dropped.
pub const MIN_TOKEN_CHARS: usize = 2;

static URL_PATTERN: OnceLock<Regex> = OnceLock::new();
static DIGIT_PATTERN: OnceLock<Regex> = OnceLock::new();

// `\S` is Unicode-aware, so a URL ends at any Unicode whitespace (NBSP,
// ideographic space), not only at ASCII whitespace.
fn url_pattern() -> &'static Regex {
    URL_PATTERN.get_or_init(|| {
        Regex::new(r"http\S+|www\S+|https\S+").expect("URL pattern is a valid regex")
    })
}

// Decimal digits (Unicode Nd) only; other numerics like "½" or "Ⅻ" stay.
fn digit_pattern() -> &'static Regex {
    DIGIT_PATTERN.get_or_init(|| Regex::new(r"\d+").expect("digit pattern is a valid regex"))
}

/// Clean a piece of news text into the normalized form the model was trained on.
///
/// Never fails: empty input, punctuation-only input and stopword-only input
/// all produce an empty string.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_urls = url_pattern().replace_all(&lowered, "");

    let no_punctuation: String = without_urls
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    let stripped = digit_pattern().replace_all(&no_punctuation, "");

    // Removing punctuation or digits can glue a URL prefix back together
    // ("h.t.t.p.x" -> "httpx"); strip those too so a second pass is a no-op.
    let stripped = url_pattern().replace_all(&stripped, "");

    let tokens: Vec<String> = stripped
        .split_whitespace()
        .filter(|token| keep_token(token))
        .map(|token| {
            let lemma = lemmatize(token);
            if keep_token(&lemma) {
                lemma.into_owned()
            } else {
                token.to_string()
            }
        })
        .collect();

    tokens.join(" ")
}

/// Clean an arbitrary JSON value. Anything that is not a string (including an
/// absent value, `null`, numbers, arrays) cleans to the empty string.
pub fn clean_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => clean_text(text),
        _ => String::new(),
    }
}

fn keep_token(token: &str) -> bool {
    token.chars().count() > MIN_TOKEN_CHARS && !is_stopword(token)
}
