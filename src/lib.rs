//! air-digits library crate.
//!
//! Turns fingertip tracking frames into strokes on a raster board, recognizes
//! each finished stroke with a small feed-forward network and keeps the
//! recognized characters in a text buffer.

pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod network;
pub mod raster;
pub mod recognize;
pub mod render;
pub mod sensor;
pub mod shutdown;
pub mod text;

pub use capture::{CaptureEvent, CaptureSettings, StrokeCaptureStateMachine};
pub use error::{ConfigError, ValidationError};
pub use raster::{BoardPoint, RasterBoard};
pub use recognize::{Recognize, Recognizer};
pub use text::TextBuffer;
