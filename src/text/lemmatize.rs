// Rule-based noun lemmatizer.
//
// Reduces plural nouns to their singular base form using three layers,
// checked in order:
//   1. an irregular-plural table (children -> child, crises -> crisis)
//   2. a set of nouns that end in "s" but are already singular (news, series)
//   3. suffix rules (-ies -> -y, -ches/-shes/-xes/-sses drop "es", -s drop "s")
//
// Words are treated as nouns only; verbs and adjectives pass through untouched
// unless they happen to look like plural nouns ("runs" -> "run").

use std::borrow::Cow;

/// Irregular plurals and their singular forms.
const IRREGULAR: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("thieves", "thief"),
    ("selves", "self"),
    ("loaves", "loaf"),
    ("calves", "calf"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("theses", "thesis"),
    ("hypotheses", "hypothesis"),
    ("diagnoses", "diagnosis"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("data", "datum"),
    ("media", "medium"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("appendices", "appendix"),
    ("policemen", "policeman"),
    ("firemen", "fireman"),
    ("chairmen", "chairman"),
    ("gentlemen", "gentleman"),
    ("fishermen", "fisherman"),
    ("servicemen", "serviceman"),
];

/// Nouns ending in "s" that are already in base form.
const INVARIANT: &[&str] = &[
    "news",
    "series",
    "species",
    "means",
    "politics",
    "economics",
    "physics",
    "mathematics",
    "ethics",
    "athletics",
    "chaos",
    "bias",
    "gas",
    "atlas",
    "canvas",
    "alias",
    "christmas",
    "texas",
    "kansas",
    "arkansas",
    "lens",
    "logistics",
    "diabetes",
    "measles",
    "headquarters",
];

/// Reduce `word` to its base form.
///
/// Returns the lemma only when the lemma is itself stable under another
/// application of the rules; otherwise the word is returned unchanged. This
/// keeps `lemmatize(lemmatize(w)) == lemmatize(w)` for every input.
pub fn lemmatize(word: &str) -> Cow<'_, str> {
    match reduce(word) {
        Some(lemma) if reduce(&lemma).is_none() => Cow::Owned(lemma),
        _ => Cow::Borrowed(word),
    }
}

/// Apply one round of lemmatization. `None` means the word is already a base form.
fn reduce(word: &str) -> Option<String> {
    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == word) {
        return Some((*singular).to_string());
    }

    if word.chars().count() <= 3 || INVARIANT.contains(&word) {
        return None;
    }

    if word.ends_with("smen") {
        return Some(format!("{}man", &word[..word.len() - 3]));
    }

    if !word.ends_with('s') || word.ends_with("ss") || word.ends_with("us") || word.ends_with("is")
    {
        return None;
    }

    if word.ends_with("ies") && word.chars().count() > 4 {
        return Some(format!("{}y", &word[..word.len() - 3]));
    }

    if word.ends_with("sses")
        || word.ends_with("ches")
        || word.ends_with("shes")
        || word.ends_with("xes")
    {
        return Some(word[..word.len() - 2].to_string());
    }

    Some(word[..word.len() - 1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        assert_eq!(lemmatize("cats"), "cat");
        assert_eq!(lemmatize("policies"), "policy");
        assert_eq!(lemmatize("studies"), "study");
        assert_eq!(lemmatize("boxes"), "box");
        assert_eq!(lemmatize("churches"), "church");
        assert_eq!(lemmatize("classes"), "class");
        assert_eq!(lemmatize("sizes"), "size");
    }

    #[test]
    fn test_irregular_plurals() {
        assert_eq!(lemmatize("children"), "child");
        assert_eq!(lemmatize("women"), "woman");
        assert_eq!(lemmatize("crises"), "crisis");
        assert_eq!(lemmatize("congressmen"), "congressman");
    }

    #[test]
    fn test_singular_nouns_unchanged() {
        for word in ["news", "glass", "analysis", "virus", "government", "series", "bus"] {
            assert_eq!(lemmatize(word), word, "{word} should be unchanged");
        }
    }

    #[test]
    fn test_lemmatize_is_idempotent() {
        let words = [
            "cats", "policies", "boxes", "children", "datas", "news", "classes", "congressmen",
            "glasses", "buses", "lies", "series", "statesmen", "passes", "wolves",
        ];
        for word in words {
            let once = lemmatize(word).into_owned();
            let twice = lemmatize(&once).into_owned();
            assert_eq!(once, twice, "lemmatize not stable for {word}");
        }
    }

    #[test]
    fn test_non_ascii_words_do_not_panic() {
        assert_eq!(lemmatize("café"), "café");
        assert_eq!(lemmatize("niños"), "niño");
        assert_eq!(lemmatize("ünïcödés"), "ünïcödé");
    }
}
