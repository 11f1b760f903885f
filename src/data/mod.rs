// Labeled news data: models, CSV loading, and seeded splitting.

pub mod loader;
pub mod models;
pub mod split;
