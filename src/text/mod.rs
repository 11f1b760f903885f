// Text normalization: the cleaning routine shared by training, evaluation
// and serving. Any change here changes the feature space, so persisted
// artifacts must be retrained after editing these modules.

pub mod clean;
pub mod lemmatize;
pub mod stopwords;

pub use clean::{clean_text, clean_value};
