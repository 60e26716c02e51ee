//! Layered feedforward inference.

use std::sync::Arc;

use super::params::NetworkParameters;
use crate::error::ValidationError;

/// Applies [`NetworkParameters`] to a flattened input vector.
///
/// Parameters are shared behind an `Arc` and never mutated, so a classifier is
/// cheap to clone and safe to hand to other threads.
#[derive(Debug, Clone)]
pub struct NeuralClassifier {
    params: Arc<NetworkParameters>,
}

impl NeuralClassifier {
    pub fn new(params: Arc<NetworkParameters>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &NetworkParameters {
        &self.params
    }

    /// Raw output-layer activations for `input`.
    ///
    /// Hidden layers apply `max(v, 0)`; the output layer is returned as-is.
    pub fn scores(&self, input: &[f32]) -> Result<Vec<f32>, ValidationError> {
        let expected = self.params.input_len();
        if input.len() != expected {
            return Err(ValidationError::InputLength {
                expected,
                actual: input.len(),
            });
        }

        let mut current = input.to_vec();
        let mut next = Vec::new();
        for layer in self.params.layers() {
            layer.affine_into(&current, &mut next);
            if layer.is_output() {
                return Ok(next);
            }
            for v in next.iter_mut() {
                *v = v.max(0.0);
            }
            std::mem::swap(&mut current, &mut next);
        }

        // Loading guarantees the last layer is the output layer
        Ok(current)
    }

    /// Predict the class index for `input`. Ties go to the lowest index.
    pub fn predict(&self, input: &[f32]) -> Result<usize, ValidationError> {
        let scores = self.scores(input)?;
        Ok(argmax(&scores))
    }
}

/// Index of the largest value, lowest index on ties.
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
