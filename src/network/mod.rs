//! Pretrained feedforward network: parameter loading and inference.
//!
//! - Parameter files are loaded once via [`NetworkParameters::load`]
//! - Inference runs through [`NeuralClassifier`]

mod classifier;
mod params;

pub use classifier::{argmax, NeuralClassifier};
pub use params::{Layer, NetworkParameters, DEFAULT_INPUT_SCALE, DEFAULT_INPUT_SIDE, DEFAULT_LABELS};
