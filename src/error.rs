//! Error types for configuration loading and recognition.
//!
//! `ConfigError` covers everything that must stop the process before capture
//! starts: unreadable or malformed files and networks whose layer shapes do not
//! chain. `ValidationError` covers caller mistakes inside the recognition
//! pipeline, such as normalizing an empty board.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading configuration or network parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config file is not valid TOML for our schema
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Parameter file is not valid JSON for our schema
    #[error("Failed to parse network parameters '{}': {source}", path.display())]
    Params {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Parameter file contains no layers
    #[error("Network has no layers")]
    NoLayers,
    /// A layer's weight matrix has no rows or no columns
    #[error("Layer '{layer}' has an empty weight matrix")]
    EmptyWeights { layer: String },
    /// A weight row has a different width than the first row
    #[error("Layer '{layer}' weight row {row} has {actual} columns, expected {expected}")]
    RaggedWeights {
        layer: String,
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// Bias length does not match the weight output dimension
    #[error("Layer '{layer}' bias has {actual} entries, expected {expected}")]
    BiasMismatch {
        layer: String,
        expected: usize,
        actual: usize,
    },
    /// Adjacent layers do not chain
    #[error("Layer '{layer}' expects {actual} inputs but '{previous}' produces {expected}")]
    LayerMismatch {
        layer: String,
        previous: String,
        expected: usize,
        actual: usize,
    },
    /// First layer does not accept a flattened input image
    #[error("First layer expects {actual} inputs, but a {side}x{side} image has {expected}")]
    InputMismatch {
        side: usize,
        expected: usize,
        actual: usize,
    },
    /// The output layer is not the last layer
    #[error("Output layer '{layer}' must be the last layer")]
    MisplacedOutput { layer: String },
    /// A weight or bias is NaN or infinite
    #[error("Layer '{layer}' contains non-finite values")]
    NonFinite { layer: String },
    /// Label alphabet does not match the output width
    #[error("Network has {expected} output classes but {actual} labels")]
    LabelMismatch { expected: usize, actual: usize },
    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Precondition failures inside the recognition pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Normalization was asked to crop a board with no marked cells
    #[error("Cannot normalize an empty raster ({rows}x{cols}, no marked cells)")]
    EmptyRaster { rows: usize, cols: usize },
    /// Classifier input has the wrong length
    #[error("Classifier expects {expected} inputs, got {actual}")]
    InputLength { expected: usize, actual: usize },
}
