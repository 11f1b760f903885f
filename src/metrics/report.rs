// Per-class precision / recall / F1 report with macro and weighted averages.

use serde::{Deserialize, Serialize};

use super::confusion::ConfusionMatrix;
use crate::data::models::Label;

/// Precision, recall and F1 for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: Label,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Averaged precision, recall and F1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    /// Unweighted mean over classes
    pub macro_avg: AverageMetrics,
    /// Mean over classes weighted by support
    pub weighted_avg: AverageMetrics,
    pub total: usize,
}

impl ClassificationReport {
    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let classes: Vec<ClassMetrics> = Label::ALL
            .iter()
            .map(|&label| ClassMetrics {
                label,
                precision: cm.precision(label),
                recall: cm.recall(label),
                f1: cm.f1(label),
                support: cm.support(label),
            })
            .collect();

        let k = classes.len() as f64;
        let macro_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / k,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / k,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / k,
        };

        let total = cm.total();
        let weighted = |f: fn(&ClassMetrics) -> f64| -> f64 {
            if total == 0 {
                return 0.0;
            }
            classes.iter().map(|c| f(c) * c.support as f64).sum::<f64>() / total as f64
        };
        let weighted_avg = AverageMetrics {
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1: weighted(|c| c.f1),
        };

        Self {
            accuracy: cm.accuracy(),
            classes,
            macro_avg,
            weighted_avg,
            total,
        }
    }

    /// Render as a fixed-width text table:
    ///
    /// ```text
    ///               precision    recall  f1-score   support
    ///
    ///         FAKE       0.99      0.98      0.99      4696
    ///         REAL       0.98      0.99      0.98      4284
    ///
    ///     accuracy                           0.99      8980
    ///    macro avg       0.99      0.99      0.99      8980
    /// weighted avg       0.99      0.99      0.99      8980
    /// ```
    pub fn format(&self) -> String {
        let mut out = format!(
            "{:>12} {:>10} {:>9} {:>9} {:>9}\n\n",
            "", "precision", "recall", "f1-score", "support"
        );
        for c in &self.classes {
            out.push_str(&format!(
                "{:>12} {:>10.2} {:>9.2} {:>9.2} {:>9}\n",
                c.label.as_str(),
                c.precision,
                c.recall,
                c.f1,
                c.support
            ));
        }
        out.push('\n');
        out.push_str(&format!(
            "{:>12} {:>10} {:>9} {:>9.2} {:>9}\n",
            "accuracy", "", "", self.accuracy, self.total
        ));
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            out.push_str(&format!(
                "{:>12} {:>10.2} {:>9.2} {:>9.2} {:>9}\n",
                name, avg.precision, avg.recall, avg.f1, self.total
            ));
        }
        out
    }
}
