// Sparse feature vector.

/// A sparse vector of `(feature index, value)` pairs sorted by index.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// The all-zero vector of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build from arbitrary-order entries. Zero values are dropped and
    /// indices outside `dim` are ignored.
    pub fn from_entries(dim: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(i, v)| i < dim && v != 0.0);
        entries.sort_by_key(|&(i, _)| i);
        Self { dim, entries }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn norm_squared(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum()
    }

    /// Dot product with a dense weight vector of the same dimension.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(i, v)| weights.get(i).copied().unwrap_or(0.0) * v)
            .sum()
    }

    /// Scale so the Euclidean norm is 1. Zero vectors stay zero.
    pub fn l2_normalize(&mut self) {
        let norm = self.norm_squared().sqrt();
        if norm > 0.0 {
            for (_, v) in &mut self.entries {
                *v /= norm;
            }
        }
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for &(i, v) in &self.entries {
            dense[i] = v;
        }
        dense
    }
}
