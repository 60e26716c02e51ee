//! Configuration file handling for air-digits.
//!
//! Loads configuration from `~/.config/air-digits/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::capture::{
    CaptureSettings, WritingSurface, DEFAULT_ACTIVITY_THRESHOLD, DEFAULT_COOLDOWN_FRAMES,
    DEFAULT_ENTER_THRESHOLD, DEFAULT_EXIT_THRESHOLD, DEFAULT_PEN_RADIUS, DEFAULT_SURFACE_SIZE,
    DEFAULT_V_SHIFT, MAX_SURFACE_SIZE,
};
use crate::error::ConfigError;

/// Configuration file structure for air-digits.
/// Loaded from ~/.config/air-digits/config.toml (or custom path via --config).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub pointer: PointerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// File this config was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub enter_threshold: f32,
    pub exit_threshold: f32,
    pub activity_threshold: usize,
    pub cooldown_frames: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enter_threshold: DEFAULT_ENTER_THRESHOLD,
            exit_threshold: DEFAULT_EXIT_THRESHOLD,
            activity_threshold: DEFAULT_ACTIVITY_THRESHOLD,
            cooldown_frames: DEFAULT_COOLDOWN_FRAMES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub size: u32,
    pub pen_radius: u32,
    pub v_shift: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SURFACE_SIZE,
            pen_radius: DEFAULT_PEN_RADIUS,
            v_shift: DEFAULT_V_SHIFT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub params: PathBuf,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            params: PathBuf::from("nn_params.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Millimetres of writing surface per screen pixel
    pub scale: f32,
    pub frame_rate: u32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            scale: 0.5,
            frame_rate: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub preview: bool,
    pub preview_cols: usize,
    pub preview_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            preview: true,
            preview_cols: 40,
            preview_rows: 20,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed or holds invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if !path.exists() {
            log::debug!("No config file at '{}', using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            source: e,
        })?;
        config.validate()?;
        config.source = Some(path);
        Ok(config)
    }

    /// Check value ranges that the types alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.capture;
        if !(c.enter_threshold.is_finite() && c.enter_threshold > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "capture.enter_threshold must be positive, got {}",
                c.enter_threshold
            )));
        }
        if !c.exit_threshold.is_finite() || c.exit_threshold < c.enter_threshold {
            return Err(ConfigError::Invalid(format!(
                "capture.exit_threshold ({}) must be at least capture.enter_threshold ({})",
                c.exit_threshold, c.enter_threshold
            )));
        }
        if !(1..=MAX_SURFACE_SIZE).contains(&self.surface.size) {
            return Err(ConfigError::Invalid(format!(
                "surface.size must be between 1 and {}, got {}",
                MAX_SURFACE_SIZE, self.surface.size
            )));
        }
        if self.surface.pen_radius >= self.surface.size {
            return Err(ConfigError::Invalid(format!(
                "surface.pen_radius ({}) must be smaller than surface.size ({})",
                self.surface.pen_radius, self.surface.size
            )));
        }
        if !self.surface.v_shift.is_finite() {
            return Err(ConfigError::Invalid("surface.v_shift must be finite".to_string()));
        }
        if !(self.pointer.scale.is_finite() && self.pointer.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "pointer.scale must be positive, got {}",
                self.pointer.scale
            )));
        }
        if !(1..=240).contains(&self.pointer.frame_rate) {
            return Err(ConfigError::Invalid(format!(
                "pointer.frame_rate must be between 1 and 240, got {}",
                self.pointer.frame_rate
            )));
        }
        Ok(())
    }

    /// Settings for the capture state machine.
    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            enter_threshold: self.capture.enter_threshold,
            exit_threshold: self.capture.exit_threshold,
            activity_threshold: self.capture.activity_threshold,
            cooldown_frames: self.capture.cooldown_frames,
            surface: WritingSurface::new(
                self.surface.size,
                self.surface.pen_radius,
                self.surface.v_shift,
            ),
        }
    }

    /// Parameter file path; relative paths resolve against the config file's directory.
    pub fn params_path(&self) -> PathBuf {
        let params = &self.network.params;
        match self.source.as_deref().and_then(Path::parent) {
            Some(dir) if params.is_relative() => dir.join(params),
            _ => params.clone(),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("air-digits").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/air-digits/config.toml")
        })
}
