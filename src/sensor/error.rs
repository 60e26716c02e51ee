//! Sensor source error types

use thiserror::Error;

/// Error type for sensor sources
#[derive(Debug, Error)]
pub enum SensorError {
    /// Reading a recording failed
    #[error("Sensor I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Could not query the screen size for pointer mapping
    #[error("Failed to query display size: {0}")]
    DisplaySize(String),
    /// The global input listener could not be started
    #[error("Failed to start input listener: {0}")]
    Listen(String),
}
