// Confusion matrix over the FAKE/REAL classes.
//
// Rows are the true class, columns the predicted class, both in class-index
// order (FAKE, REAL):
//
//              pred FAKE   pred REAL
//   true FAKE     TN*         FP*
//   true REAL     FN*         TP*
//
// (*with REAL as the positive class)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::models::Label;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// counts[true][predicted]
    pub counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    /// Tally predictions against ground truth.
    pub fn from_predictions(truth: &[Label], predicted: &[Label]) -> Result<Self> {
        if truth.len() != predicted.len() {
            anyhow::bail!(
                "Prediction and ground truth lengths differ ({} vs {})",
                predicted.len(),
                truth.len()
            );
        }
        let mut matrix = Self::default();
        for (t, p) in truth.iter().zip(predicted) {
            matrix.counts[t.index()][p.index()] += 1;
        }
        Ok(matrix)
    }

    pub fn get(&self, truth: Label, predicted: Label) -> usize {
        self.counts[truth.index()][predicted.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        Label::ALL.iter().map(|&l| self.get(l, l)).sum()
    }

    /// Number of examples whose true class is `label`.
    pub fn support(&self, label: Label) -> usize {
        self.counts[label.index()].iter().sum()
    }

    /// Number of examples predicted as `label`.
    pub fn predicted_count(&self, label: Label) -> usize {
        Label::ALL.iter().map(|&t| self.get(t, label)).sum()
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    pub fn precision(&self, label: Label) -> f64 {
        ratio(self.get(label, label), self.predicted_count(label))
    }

    pub fn recall(&self, label: Label) -> f64 {
        ratio(self.get(label, label), self.support(label))
    }

    pub fn f1(&self, label: Label) -> f64 {
        let p = self.precision(label);
        let r = self.recall(label);
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// Render as a small labeled table.
    pub fn format(&self) -> String {
        let mut out = format!("{:>12} {:>10} {:>10}\n", "", "pred FAKE", "pred REAL");
        for truth in Label::ALL {
            out.push_str(&format!(
                "{:>12} {:>10} {:>10}\n",
                format!("true {truth}"),
                self.get(truth, Label::Fake),
                self.get(truth, Label::Real)
            ));
        }
        out
    }
}

/// Division that treats an empty denominator as 0.0.
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
