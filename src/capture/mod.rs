//! Stroke capture from fingertip tracking.
//!
//! - Sensor data model via [`SensorFrame`] and [`HandSample`]
//! - Writing-area geometry via [`WritingSurface`]
//! - Stroke and erase handling via [`StrokeCaptureStateMachine`]

mod sample;
mod state;
mod surface;

pub use sample::{Finger, FingerKind, GestureKind, Hand, HandSample, SensorFrame, Vec3};
pub use state::{
    CaptureEvent, CaptureSettings, CaptureState, StrokeCaptureStateMachine, SwipeCooldown,
    DEFAULT_ACTIVITY_THRESHOLD, DEFAULT_COOLDOWN_FRAMES, DEFAULT_ENTER_THRESHOLD,
    DEFAULT_EXIT_THRESHOLD,
};
pub use surface::{
    WritingSurface, DEFAULT_PEN_RADIUS, DEFAULT_SURFACE_SIZE, DEFAULT_V_SHIFT, MAX_SURFACE_SIZE,
};
