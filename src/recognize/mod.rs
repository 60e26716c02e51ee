//! Recognition pipeline: board -> normalized image -> class -> character.
//!
//! 1. **Normalization** - center-of-mass crop and area resize ([`DigitNormalizer`])
//! 2. **Inference** - layered matrix products ([`NeuralClassifier`])
//! 3. **Labeling** - class index to character via the parameter file's labels

mod normalize;

pub use normalize::{crop_center_of_mass, resize_area, Bounds, Crop, DigitNormalizer, NormalizedImage};

use std::sync::Arc;

use crate::error::ValidationError;
use crate::network::{NetworkParameters, NeuralClassifier};
use crate::raster::RasterBoard;

/// Something that turns a finished stroke board into a character.
pub trait Recognize {
    fn recognize(&self, board: &RasterBoard) -> Result<char, ValidationError>;
}

/// Result of running the full pipeline with scores kept for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub label: char,
    pub class: usize,
    pub scores: Vec<f32>,
}

/// Normalizer and classifier configured from one parameter set.
#[derive(Debug, Clone)]
pub struct Recognizer {
    normalizer: DigitNormalizer,
    classifier: NeuralClassifier,
}

impl Recognizer {
    pub fn new(params: Arc<NetworkParameters>) -> Self {
        Self {
            normalizer: DigitNormalizer::new(params.input_side()),
            classifier: NeuralClassifier::new(params),
        }
    }

    pub fn normalizer(&self) -> &DigitNormalizer {
        &self.normalizer
    }

    pub fn classifier(&self) -> &NeuralClassifier {
        &self.classifier
    }

    /// Run every stage and keep the raw output scores.
    pub fn analyze(&self, board: &RasterBoard) -> Result<Recognition, ValidationError> {
        let params = self.classifier.params();
        let scale = params.input_scale();

        let mut input = self.normalizer.normalize(board)?.into_vec();
        for v in input.iter_mut() {
            *v *= scale;
        }

        let scores = self.classifier.scores(&input)?;
        let class = crate::network::argmax(&scores);
        Ok(Recognition {
            label: params.labels()[class],
            class,
            scores,
        })
    }
}

impl Recognize for Recognizer {
    fn recognize(&self, board: &RasterBoard) -> Result<char, ValidationError> {
        self.analyze(board).map(|r| r.label)
    }
}
