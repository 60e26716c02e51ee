//! Sensor plumbing around the capture core.
//!
//! Sources deliver [`SensorFrame`]s to a [`SensorListener`], one hook per event kind:
//! - [`ReplaySource`] plays back a JSON-lines recording
//! - [`PointerSource`] samples the global mouse pointer via rdev
//!
//! [`DigitWriter`] is the listener that drives recognition.

mod error;
mod pointer;
mod replay;
mod writer;

pub use error::SensorError;
pub use pointer::{PointerMapping, PointerSource, PointerState, PEN_UP_SEPARATION};
pub use replay::{ReplaySource, ReplayStats};
pub use writer::{DigitWriter, SessionStats};

use crate::capture::SensorFrame;

/// Receives sensor lifecycle events. Only `on_frame` is required.
pub trait SensorListener {
    fn on_init(&mut self) {}
    fn on_connect(&mut self) {}
    fn on_disconnect(&mut self) {}
    fn on_frame(&mut self, frame: &SensorFrame);
    fn on_exit(&mut self) {}
}
