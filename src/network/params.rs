//! Loading and validating network parameter files.

use std::path::Path;

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::ConfigError;

/// Default side length of the classifier's square input image.
pub const DEFAULT_INPUT_SIDE: usize = 24;

/// Default multiplier applied to normalized pixels before inference.
pub const DEFAULT_INPUT_SCALE: f32 = 255.0;

/// Default class labels.
pub const DEFAULT_LABELS: &str = "0123456789";

/// One affine layer: `v * w + b`, followed by ReLU unless it is the output layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    name: String,
    /// Row-major `[inputs][outputs]`
    weights: Vec<f32>,
    bias: Vec<f32>,
    inputs: usize,
    outputs: usize,
    is_output: bool,
}

impl Layer {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn outputs(&self) -> usize {
        self.outputs
    }

    pub fn is_output(&self) -> bool {
        self.is_output
    }

    pub fn bias(&self) -> &[f32] {
        &self.bias
    }

    /// Weight from input `i` to output `j`.
    pub fn weight(&self, i: usize, j: usize) -> f32 {
        self.weights[i * self.outputs + j]
    }

    /// Compute `input * W + b` into `out`.
    pub(crate) fn affine_into(&self, input: &[f32], out: &mut Vec<f32>) {
        out.clear();
        out.extend_from_slice(&self.bias);
        for (i, &x) in input.iter().enumerate() {
            if x == 0.0 {
                continue;
            }
            let row = &self.weights[i * self.outputs..(i + 1) * self.outputs];
            for (acc, &w) in out.iter_mut().zip(row) {
                *acc += x * w;
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct LayerFile {
    name: String,
    w: Vec<Vec<f32>>,
    b: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ParamsFile {
    #[serde(default = "default_input_side")]
    input_side: usize,
    #[serde(default = "default_input_scale")]
    input_scale: f32,
    #[serde(default = "default_labels")]
    labels: String,
    layers: Vec<LayerFile>,
}

fn default_input_side() -> usize {
    DEFAULT_INPUT_SIDE
}

fn default_input_scale() -> f32 {
    DEFAULT_INPUT_SCALE
}

fn default_labels() -> String {
    DEFAULT_LABELS.to_string()
}

fn is_output_name(name: &str) -> bool {
    name.eq_ignore_ascii_case("out")
}

/// Ordered, validated collection of layers. Read-only after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkParameters {
    layers: Vec<Layer>,
    input_side: usize,
    input_scale: f32,
    labels: Vec<char>,
    fingerprint: String,
}

impl NetworkParameters {
    /// Load and validate a JSON parameter file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file: ParamsFile = serde_json::from_slice(&bytes).map_err(|e| ConfigError::Params {
            path: path.to_path_buf(),
            source: e,
        })?;
        let fingerprint = hex::encode(Sha256::digest(&bytes));

        let params = Self::from_file(file, fingerprint)?;
        log::info!(
            "Loaded network '{}': {} layers, {}x{} input, sha256 {}",
            path.display(),
            params.layers.len(),
            params.input_side,
            params.input_side,
            params.short_fingerprint()
        );
        Ok(params)
    }

    /// Parse and validate parameters from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: ParamsFile = serde_json::from_str(json).map_err(|e| ConfigError::Params {
            path: "<inline>".into(),
            source: e,
        })?;
        let fingerprint = hex::encode(Sha256::digest(json.as_bytes()));
        Self::from_file(file, fingerprint)
    }

    fn from_file(file: ParamsFile, fingerprint: String) -> Result<Self, ConfigError> {
        if file.layers.is_empty() {
            return Err(ConfigError::NoLayers);
        }
        if file.input_side == 0 {
            return Err(ConfigError::Invalid("input_side must be at least 1".to_string()));
        }
        let input_len = file
            .input_side
            .checked_mul(file.input_side)
            .ok_or_else(|| {
                ConfigError::Invalid(format!("input_side {} is too large", file.input_side))
            })?;
        if !file.input_scale.is_finite() {
            return Err(ConfigError::Invalid("input_scale must be finite".to_string()));
        }

        let last = file.layers.len() - 1;
        let mut layers: Vec<Layer> = Vec::with_capacity(file.layers.len());

        for (index, raw) in file.layers.into_iter().enumerate() {
            if index != last && is_output_name(&raw.name) {
                return Err(ConfigError::MisplacedOutput { layer: raw.name });
            }
            let layer = build_layer(raw, index == last)?;

            match layers.last() {
                Some(prev) if prev.outputs != layer.inputs => {
                    return Err(ConfigError::LayerMismatch {
                        layer: layer.name,
                        previous: prev.name.clone(),
                        expected: prev.outputs,
                        actual: layer.inputs,
                    });
                }
                None if layer.inputs != input_len => {
                    return Err(ConfigError::InputMismatch {
                        side: file.input_side,
                        expected: input_len,
                        actual: layer.inputs,
                    });
                }
                _ => {}
            }
            layers.push(layer);
        }

        let labels: Vec<char> = file.labels.chars().collect();
        let classes = layers[last].outputs;
        if labels.len() != classes {
            return Err(ConfigError::LabelMismatch {
                expected: classes,
                actual: labels.len(),
            });
        }

        Ok(Self {
            layers,
            input_side: file.input_side,
            input_scale: file.input_scale,
            labels,
            fingerprint,
        })
    }

    /// Layers in load order. The last one is the output layer.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn input_side(&self) -> usize {
        self.input_side
    }

    /// Length of the flattened input vector.
    pub fn input_len(&self) -> usize {
        self.input_side * self.input_side
    }

    pub fn input_scale(&self) -> f32 {
        self.input_scale
    }

    pub fn labels(&self) -> &[char] {
        &self.labels
    }

    /// Number of output classes.
    pub fn classes(&self) -> usize {
        self.labels.len()
    }

    /// SHA-256 of the source bytes, hex encoded.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn short_fingerprint(&self) -> &str {
        &self.fingerprint[..12.min(self.fingerprint.len())]
    }
}

fn build_layer(raw: LayerFile, is_output: bool) -> Result<Layer, ConfigError> {
    let inputs = raw.w.len();
    let outputs = raw.w.first().map(Vec::len).unwrap_or(0);
    if inputs == 0 || outputs == 0 {
        return Err(ConfigError::EmptyWeights { layer: raw.name });
    }

    let mut weights = Vec::with_capacity(inputs * outputs);
    for (row, values) in raw.w.iter().enumerate() {
        if values.len() != outputs {
            return Err(ConfigError::RaggedWeights {
                layer: raw.name,
                row,
                expected: outputs,
                actual: values.len(),
            });
        }
        weights.extend_from_slice(values);
    }

    if raw.b.len() != outputs {
        return Err(ConfigError::BiasMismatch {
            layer: raw.name,
            expected: outputs,
            actual: raw.b.len(),
        });
    }
    if !weights.iter().chain(&raw.b).all(|v| v.is_finite()) {
        return Err(ConfigError::NonFinite { layer: raw.name });
    }

    Ok(Layer {
        name: raw.name,
        weights,
        bias: raw.b,
        inputs,
        outputs,
        is_output,
    })
}
