// Feature extraction: TF-IDF vectors over a vocabulary frozen at train time.

pub mod tfidf;
pub mod traits;
pub mod vector;
