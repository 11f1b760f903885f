// fakenews: TF-IDF + logistic regression fake-news classifier
//
// This is the library root. Each module corresponds to a stage of the
// clean -> vectorize -> classify -> decide pipeline, plus the training,
// evaluation and serving surfaces around it.

pub mod config;
pub mod data;
pub mod features;
pub mod metrics;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod status;
pub mod text;
pub mod tracking;

#[cfg(feature = "web")]
pub mod web;
