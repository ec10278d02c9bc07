//! Softmax linear classification head over encoder features

use serde::{Deserialize, Serialize};

use super::error::{Result, TrainError};

/// Linear head with softmax cross-entropy loss.
///
/// Parameters are one flat vector: row-major weights `[num_classes x dim]`
/// followed by `num_classes` biases. Gradients use the same layout, so the
/// optimizer sees a single parameter slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxHead {
    dim: usize,
    num_classes: usize,
    params: Vec<f32>,
}

impl SoftmaxHead {
    /// Create a zero-initialized head (uniform class probabilities)
    #[must_use]
    pub fn new(dim: usize, num_classes: usize) -> Self {
        Self {
            dim,
            num_classes,
            params: vec![0.0; num_classes * dim + num_classes],
        }
    }

    /// Rebuild a head from saved parameters.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::InvalidConfig`] if the parameter count does not
    /// match the declared shape.
    pub fn from_params(dim: usize, num_classes: usize, params: Vec<f32>) -> Result<Self> {
        let expected = num_classes * dim + num_classes;
        if params.len() != expected {
            return Err(TrainError::InvalidConfig(format!(
                "head expects {expected} parameters for {num_classes}x{dim}, got {}",
                params.len()
            )));
        }
        Ok(Self {
            dim,
            num_classes,
            params,
        })
    }

    /// Feature dimensionality
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of output classes
    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Flat parameter view
    #[must_use]
    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// Mutable flat parameter view for the optimizer
    pub(crate) fn params_mut(&mut self) -> &mut [f32] {
        &mut self.params
    }

    /// Class logits for one feature vector
    #[must_use]
    pub fn logits(&self, features: &[f32]) -> Vec<f32> {
        let bias_offset = self.num_classes * self.dim;
        (0..self.num_classes)
            .map(|c| {
                let row = &self.params[c * self.dim..(c + 1) * self.dim];
                let dot: f32 = row.iter().zip(features).map(|(w, x)| w * x).sum();
                dot + self.params[bias_offset + c]
            })
            .collect()
    }

    /// Predicted class for one feature vector (argmax over logits)
    #[must_use]
    pub fn predict(&self, features: &[f32]) -> usize {
        let logits = self.logits(features);
        let mut best = 0;
        for (c, &logit) in logits.iter().enumerate() {
            if logit > logits[best] {
                best = c;
            }
        }
        best
    }

    /// Mean cross-entropy loss over a batch, without touching parameters.
    ///
    /// # Panics
    ///
    /// Panics if a label is `>= num_classes`; callers validate labels first.
    #[must_use]
    pub fn batch_loss(&self, features: &[Vec<f32>], labels: &[usize]) -> f32 {
        if features.is_empty() {
            return 0.0;
        }
        let total: f32 = features
            .iter()
            .zip(labels)
            .map(|(x, &y)| {
                let probs = softmax(&self.logits(x));
                -probs[y].max(f32::MIN_POSITIVE).ln()
            })
            .sum();
        total / features.len() as f32
    }

    /// Forward and backward over one mini-batch.
    ///
    /// Returns the mean loss and the mean gradient in parameter layout.
    ///
    /// # Panics
    ///
    /// Panics if a label is `>= num_classes`; callers validate labels first.
    #[must_use]
    pub fn batch_gradient(&self, features: &[Vec<f32>], labels: &[usize]) -> (f32, Vec<f32>) {
        let bias_offset = self.num_classes * self.dim;
        let mut grad = vec![0.0f32; self.params.len()];
        let mut total_loss = 0.0f32;

        for (x, &y) in features.iter().zip(labels) {
            let probs = softmax(&self.logits(x));
            total_loss += -probs[y].max(f32::MIN_POSITIVE).ln();

            for c in 0..self.num_classes {
                // dL/dlogit_c = p_c - [c == y]
                let delta = probs[c] - f32::from(u8::from(c == y));
                let row = &mut grad[c * self.dim..(c + 1) * self.dim];
                for (g, &xi) in row.iter_mut().zip(x) {
                    *g += delta * xi;
                }
                grad[bias_offset + c] += delta;
            }
        }

        let n = features.len() as f32;
        for g in &mut grad {
            *g /= n;
        }
        (total_loss / n, grad)
    }
}

/// Numerically stable softmax
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
