// L2-regularized binary logistic regression.
//
// Objective (mean form, intercept not penalized):
//
//   f(w, b) = 1/n * sum_i log(1 + exp(-s_i * (w.x_i + b))) + ||w||^2 / (2 * C * n)
//
// minimized with Nesterov-accelerated gradient descent. The step size is
// 1/L for the gradient's Lipschitz bound L = 0.25 * (max ||x_i||^2 + 1) +
// 1/(C * n), so no line search is needed. The solver stops when the largest
// gradient component drops below `tol` or after `max_iter` iterations.
//
// Samples are visited in input order and sparse entries in index order, so a
// fit on the same data always produces bit-identical weights.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::traits::Classifier;
use crate::data::models::Label;
use crate::features::vector::FeatureVector;

/// Version tag written into serialized models.
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Name recorded in artifacts and experiment tracking.
pub const MODEL_TYPE: &str = "LogisticRegression";

/// Solver hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    /// Inverse regularization strength (default 1.0)
    pub c: f64,
    /// Iteration cap for the solver (default 1000)
    pub max_iter: usize,
    /// Convergence tolerance on the max-abs gradient (default 1e-4)
    pub tol: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tol: 1e-4,
        }
    }
}

impl LogisticParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            anyhow::bail!("C must be a positive finite number, got {}", self.c);
        }
        if self.max_iter == 0 {
            anyhow::bail!("max_iter must be at least 1");
        }
        if !(self.tol.is_finite() && self.tol >= 0.0) {
            anyhow::bail!("tol must be a non-negative finite number, got {}", self.tol);
        }
        Ok(())
    }
}

/// A fitted logistic regression model. P(REAL) = sigmoid(w.x + b).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModelArtifact", into = "ModelArtifact")]
pub struct LogisticRegression {
    params: LogisticParams,
    weights: Vec<f64>,
    intercept: f64,
    n_iter: usize,
    converged: bool,
}

/// On-disk shape of a fitted model.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    model_type: String,
    classes: Vec<Label>,
    params: LogisticParams,
    weights: Vec<f64>,
    intercept: f64,
    n_iter: usize,
    converged: bool,
}

impl LogisticRegression {
    /// Fit on feature vectors and their labels.
    ///
    /// Both classes must be present and every vector must share one dimension.
    pub fn fit(features: &[FeatureVector], labels: &[Label], params: LogisticParams) -> Result<Self> {
        params.validate()?;

        if features.len() != labels.len() {
            anyhow::bail!(
                "Got {} feature vectors but {} labels",
                features.len(),
                labels.len()
            );
        }
        let Some(first) = features.first() else {
            anyhow::bail!("Cannot fit a classifier on zero examples");
        };
        let dim = first.dim();
        if features.iter().any(|x| x.dim() != dim) {
            anyhow::bail!("Feature vectors have inconsistent dimensions");
        }
        for class in Label::ALL {
            if !labels.contains(&class) {
                anyhow::bail!("Training labels contain no {class} examples");
            }
        }

        let targets: Vec<f64> = labels.iter().map(|l| l.index() as f64).collect();
        let n = features.len() as f64;
        let lambda = 1.0 / (params.c * n);
        let max_norm_sq = features
            .iter()
            .map(FeatureVector::norm_squared)
            .fold(0.0, f64::max);
        let step = 1.0 / (0.25 * (max_norm_sq + 1.0) + lambda);

        let mut w = vec![0.0; dim];
        let mut b = 0.0;
        let mut w_prev = w.clone();
        let mut b_prev = b;
        let mut t = 1.0f64;
        let mut n_iter = 0;
        let mut converged = false;

        for iter in 1..=params.max_iter {
            n_iter = iter;

            // Look-ahead point
            let t_next = (1.0 + (1.0 + 4.0 * t * t).sqrt()) / 2.0;
            let momentum = (t - 1.0) / t_next;
            let y_w: Vec<f64> = w
                .iter()
                .zip(&w_prev)
                .map(|(cur, prev)| cur + momentum * (cur - prev))
                .collect();
            let y_b = b + momentum * (b - b_prev);

            let (grad_w, grad_b) = gradient(features, &targets, &y_w, y_b, lambda);
            let max_grad = grad_w.iter().fold(grad_b.abs(), |m, g| m.max(g.abs()));
            if max_grad <= params.tol {
                w = y_w;
                b = y_b;
                converged = true;
                break;
            }

            w_prev = std::mem::replace(
                &mut w,
                y_w.iter().zip(&grad_w).map(|(y, g)| y - step * g).collect(),
            );
            b_prev = b;
            b = y_b - step * grad_b;
            t = t_next;
        }

        let model = Self {
            params,
            weights: w,
            intercept: b,
            n_iter,
            converged,
        };

        if converged {
            info!(iterations = n_iter, features = dim, "Logistic regression converged");
        } else {
            warn!(
                iterations = n_iter,
                "Logistic regression hit max_iter before converging"
            );
        }

        Ok(model)
    }

    pub fn params(&self) -> &LogisticParams {
        &self.params
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Solver iterations used during fitting.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Raw score w.x + b; positive means REAL.
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        features.dot(&self.weights) + self.intercept
    }

    /// Mean cross-entropy of the model on labeled data.
    pub fn log_loss(&self, features: &[FeatureVector], labels: &[Label]) -> f64 {
        if features.is_empty() {
            return 0.0;
        }
        let total: f64 = features
            .iter()
            .zip(labels)
            .map(|(x, label)| {
                let z = self.decision_function(x);
                match label {
                    Label::Real => softplus(-z),
                    Label::Fake => softplus(z),
                }
            })
            .sum();
        total / features.len() as f64
    }
}

impl Classifier for LogisticRegression {
    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn predict_proba(&self, features: &FeatureVector) -> [f64; 2] {
        let real = sigmoid(self.decision_function(features));
        [1.0 - real, real]
    }
}

/// Gradient of the mean regularized log-loss at (w, b).
fn gradient(
    features: &[FeatureVector],
    targets: &[f64],
    w: &[f64],
    b: f64,
    lambda: f64,
) -> (Vec<f64>, f64) {
    let n = features.len() as f64;
    let mut grad_w = vec![0.0; w.len()];
    let mut grad_b = 0.0;

    for (x, y) in features.iter().zip(targets) {
        let residual = sigmoid(x.dot(w) + b) - y;
        for &(i, v) in x.entries() {
            grad_w[i] += residual * v;
        }
        grad_b += residual;
    }

    for (g, wi) in grad_w.iter_mut().zip(w) {
        *g = *g / n + lambda * wi;
    }
    (grad_w, grad_b / n)
}

/// Numerically stable logistic function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// ln(1 + e^z) without overflow.
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

impl TryFrom<ModelArtifact> for LogisticRegression {
    type Error = String;

    fn try_from(artifact: ModelArtifact) -> Result<Self, Self::Error> {
        if artifact.format_version != MODEL_FORMAT_VERSION {
            return Err(format!(
                "unsupported model format version {} (expected {})",
                artifact.format_version, MODEL_FORMAT_VERSION
            ));
        }
        if artifact.model_type != MODEL_TYPE {
            return Err(format!("unsupported model type {}", artifact.model_type));
        }
        if artifact.classes != Label::ALL {
            return Err(format!(
                "model classes must be [FAKE, REAL], found {:?}",
                artifact.classes
            ));
        }
        artifact.params.validate().map_err(|e| e.to_string())?;
        if artifact.weights.is_empty() {
            return Err("model has no weights".to_string());
        }
        if !artifact.intercept.is_finite() || artifact.weights.iter().any(|w| !w.is_finite()) {
            return Err("model weights must be finite".to_string());
        }

        Ok(Self {
            params: artifact.params,
            weights: artifact.weights,
            intercept: artifact.intercept,
            n_iter: artifact.n_iter,
            converged: artifact.converged,
        })
    }
}

impl From<LogisticRegression> for ModelArtifact {
    fn from(model: LogisticRegression) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            model_type: MODEL_TYPE.to_string(),
            classes: Label::ALL.to_vec(),
            params: model.params,
            weights: model.weights,
            intercept: model.intercept,
            n_iter: model.n_iter,
            converged: model.converged,
        }
    }
}
