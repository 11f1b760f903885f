// TF-IDF vectorizer with unigram + bigram features.
//
// Weighting:
//   tf  = raw count of the term in the document
//   idf = ln((1 + n_documents) / (1 + df)) + 1
//   each row is L2-normalized
//
// The vocabulary keeps the `max_features` terms with the highest total count
// across the training corpus (ties broken alphabetically), then assigns
// feature indices in alphabetical order. Both orderings are independent of
// hash-map iteration order, so fitting is fully deterministic.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::traits::FeatureExtractor;
use super::vector::FeatureVector;

/// Version tag written into serialized vectorizers.
pub const VECTORIZER_FORMAT_VERSION: u32 = 1;

/// Vectorizer hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfParams {
    /// Keep at most this many terms (None = unlimited)
    pub max_features: Option<usize>,
    /// Smallest n-gram length
    pub ngram_min: usize,
    /// Largest n-gram length
    pub ngram_max: usize,
}

impl Default for TfIdfParams {
    fn default() -> Self {
        Self {
            max_features: Some(5000),
            ngram_min: 1,
            ngram_max: 2,
        }
    }
}

impl TfIdfParams {
    pub fn validate(&self) -> Result<()> {
        if self.ngram_min == 0 || self.ngram_min > self.ngram_max {
            anyhow::bail!(
                "Invalid n-gram range ({}, {}): need 1 <= min <= max",
                self.ngram_min,
                self.ngram_max
            );
        }
        if self.max_features == Some(0) {
            anyhow::bail!("max_features must be at least 1");
        }
        Ok(())
    }

    /// The n-gram range as "min-max", the form logged to experiment tracking.
    pub fn ngram_label(&self) -> String {
        format!("{}-{}", self.ngram_min, self.ngram_max)
    }
}

/// A fitted TF-IDF vectorizer. Construct with [`TfIdfVectorizer::fit`] or by
/// deserializing an artifact; there is no way to refit an existing instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "VectorizerArtifact", into = "VectorizerArtifact")]
pub struct TfIdfVectorizer {
    params: TfIdfParams,
    n_documents: usize,
    terms: Vec<String>,
    idf: Vec<f64>,
    index: HashMap<String, usize>,
}

/// On-disk shape of a fitted vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VectorizerArtifact {
    format_version: u32,
    params: TfIdfParams,
    n_documents: usize,
    terms: Vec<String>,
    idf: Vec<f64>,
}

impl TfIdfVectorizer {
    /// Learn the vocabulary and IDF weights from training documents.
    ///
    /// Fails if no document contains a single usable token, since an empty
    /// vocabulary cannot support a classifier.
    pub fn fit(documents: &[String], params: TfIdfParams) -> Result<Self> {
        params.validate()?;

        let mut total_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = extract_terms(doc, &params);
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            for term in terms {
                *total_counts.entry(term).or_insert(0) += 1;
            }
        }

        if total_counts.is_empty() {
            anyhow::bail!(
                "Empty vocabulary: none of the {} training documents contain usable tokens",
                documents.len()
            );
        }

        let mut ranked: Vec<(String, usize)> = total_counts.into_iter().collect();
        if let Some(limit) = params.max_features {
            if ranked.len() > limit {
                ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                ranked.truncate(limit);
            }
        }

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let n = documents.len() as f64;
        let idf: Vec<f64> = terms
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        info!(
            documents = documents.len(),
            vocabulary = terms.len(),
            ngram_range = %params.ngram_label(),
            "Fitted TF-IDF vectorizer"
        );

        Ok(Self::from_parts(params, documents.len(), terms, idf))
    }

    fn from_parts(params: TfIdfParams, n_documents: usize, terms: Vec<String>, idf: Vec<f64>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        Self {
            params,
            n_documents,
            terms,
            idf,
            index,
        }
    }

    pub fn params(&self) -> &TfIdfParams {
        &self.params
    }

    /// Number of documents the vectorizer was fitted on.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Vocabulary terms, in feature-index order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn vocabulary_len(&self) -> usize {
        self.terms.len()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }
}

impl FeatureExtractor for TfIdfVectorizer {
    fn dimension(&self) -> usize {
        self.terms.len()
    }

    fn transform(&self, text: &str) -> FeatureVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in extract_terms(text, &self.params) {
            if let Some(&i) = self.index.get(&term) {
                *counts.entry(i).or_insert(0.0) += 1.0;
            }
        }

        let entries = counts
            .into_iter()
            .map(|(i, tf)| (i, tf * self.idf[i]))
            .collect();
        let mut vector = FeatureVector::from_entries(self.terms.len(), entries);
        vector.l2_normalize();
        vector
    }
}

impl TryFrom<VectorizerArtifact> for TfIdfVectorizer {
    type Error = String;

    fn try_from(artifact: VectorizerArtifact) -> Result<Self, Self::Error> {
        if artifact.format_version != VECTORIZER_FORMAT_VERSION {
            return Err(format!(
                "unsupported vectorizer format version {} (expected {})",
                artifact.format_version, VECTORIZER_FORMAT_VERSION
            ));
        }
        artifact.params.validate().map_err(|e| e.to_string())?;
        if artifact.terms.is_empty() {
            return Err("vectorizer has an empty vocabulary".to_string());
        }
        if artifact.terms.len() != artifact.idf.len() {
            return Err(format!(
                "vectorizer has {} terms but {} idf weights",
                artifact.terms.len(),
                artifact.idf.len()
            ));
        }
        if artifact.idf.iter().any(|w| !w.is_finite() || *w < 1.0) {
            return Err("vectorizer idf weights must be finite and >= 1".to_string());
        }
        let unique: HashSet<&String> = artifact.terms.iter().collect();
        if unique.len() != artifact.terms.len() {
            return Err("vectorizer vocabulary contains duplicate terms".to_string());
        }

        Ok(Self::from_parts(
            artifact.params,
            artifact.n_documents,
            artifact.terms,
            artifact.idf,
        ))
    }
}

impl From<TfIdfVectorizer> for VectorizerArtifact {
    fn from(v: TfIdfVectorizer) -> Self {
        Self {
            format_version: VECTORIZER_FORMAT_VERSION,
            params: v.params,
            n_documents: v.n_documents,
            terms: v.terms,
            idf: v.idf,
        }
    }
}

/// Split cleaned text into word tokens of two or more characters.
///
/// A token is a run of alphanumeric characters or underscores, so any
/// non-ASCII punctuation the cleaner left behind still acts as a separator.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .collect()
}

/// All n-grams of the configured lengths, in document order.
fn extract_terms(text: &str, params: &TfIdfParams) -> Vec<String> {
    let tokens = tokenize(text);
    let mut terms = Vec::new();
    for n in params.ngram_min..=params.ngram_max {
        if tokens.len() < n {
            break;
        }
        for window in tokens.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "senator vote budget".to_string(),
            "senator vote tax".to_string(),
            "alien moon landing hoax".to_string(),
        ]
    }

    #[test]
    fn test_vocabulary_includes_bigrams_sorted() {
        let v = TfIdfVectorizer::fit(&corpus(), TfIdfParams::default()).unwrap();
        assert!(v.index_of("senator vote").is_some());
        assert!(v.index_of("moon landing").is_some());
        let mut sorted = v.terms().to_vec();
        sorted.sort();
        assert_eq!(v.terms(), sorted.as_slice());
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let params = TfIdfParams {
            max_features: Some(2),
            ..TfIdfParams::default()
        };
        let v = TfIdfVectorizer::fit(&corpus(), params).unwrap();
        // "senator", "vote" and "senator vote" all occur twice; ties go alphabetical
        assert_eq!(v.terms(), &["senator".to_string(), "senator vote".to_string()]);
    }

    #[test]
    fn test_idf_smoothing() {
        let v = TfIdfVectorizer::fit(&corpus(), TfIdfParams::default()).unwrap();
        let senator = v.index_of("senator").unwrap();
        let alien = v.index_of("alien").unwrap();
        // df=2 of n=3 -> ln(4/3)+1 ; df=1 -> ln(4/2)+1
        assert!((v.idf()[senator] - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert!((v.idf()[alien] - (2.0f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_transform_is_unit_length() {
        let v = TfIdfVectorizer::fit(&corpus(), TfIdfParams::default()).unwrap();
        let x = v.transform("senator vote budget");
        assert_eq!(x.dim(), v.vocabulary_len());
        assert!((x.norm_squared() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let v = TfIdfVectorizer::fit(&corpus(), TfIdfParams::default()).unwrap();
        let x = v.transform("");
        assert!(x.is_zero());
        assert_eq!(x.dim(), v.vocabulary_len());
    }

    #[test]
    fn test_unknown_terms_ignored() {
        let v = TfIdfVectorizer::fit(&corpus(), TfIdfParams::default()).unwrap();
        assert!(v.transform("quantum entanglement").is_zero());
    }

    #[test]
    fn test_fit_on_empty_documents_fails() {
        let docs = vec![String::new(), "a".to_string()];
        assert!(TfIdfVectorizer::fit(&docs, TfIdfParams::default()).is_err());
    }

    #[test]
    fn test_serde_rejects_mismatched_idf() {
        let json = r#"{"format_version":1,"params":{"max_features":5000,"ngram_min":1,"ngram_max":2},
            "n_documents":2,"terms":["alpha","beta"],"idf":[1.0]}"#;
        let parsed: Result<TfIdfVectorizer, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_serde_preserves_feature_indices() {
        let v = TfIdfVectorizer::fit(&corpus(), TfIdfParams::default()).unwrap();
        let json = serde_json::to_string(&v).unwrap();
        let loaded: TfIdfVectorizer = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.terms(), v.terms());
        assert_eq!(loaded.transform("senator tax"), v.transform("senator tax"));
    }

    #[test]
    fn test_tokenize_splits_on_non_word_chars() {
        assert_eq!(tokenize("hello—world x “quoted”"), vec!["hello", "world", "quoted"]);
    }
}
