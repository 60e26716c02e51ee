//! Mouse-driven stand-in for a hand tracker.
//!
//! Uses rdev for global input listening. The pointer position becomes the index
//! fingertip on the writing surface; holding the left button brings the middle
//! fingertip onto it (pen down) and Backspace reports a swipe.

use rdev::{listen, Button, Event, EventType, Key};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use super::{SensorError, SensorListener};
use crate::capture::{Finger, FingerKind, GestureKind, Hand, SensorFrame, Vec3, WritingSurface};

/// Middle fingertip offset (mm) while the pen is up, well above any exit threshold.
pub const PEN_UP_SEPARATION: f32 = 60.0;

/// Latest pointer input seen by the listener thread.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: f64,
    pub y: f64,
    pub pen_down: bool,
    /// Swipes reported since the last frame
    pub pending_swipes: u32,
}

impl PointerState {
    /// Apply one input event.
    pub fn apply(&mut self, event: &EventType) {
        match event {
            EventType::MouseMove { x, y } => {
                self.x = *x;
                self.y = *y;
            }
            EventType::ButtonPress(Button::Left) => self.pen_down = true,
            EventType::ButtonRelease(Button::Left) => self.pen_down = false,
            EventType::KeyPress(Key::Backspace) => self.pending_swipes += 1,
            _ => {}
        }
    }
}

/// Maps screen pixels onto the writing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMapping {
    pub screen_width: f64,
    pub screen_height: f64,
    /// Millimetres per pixel
    pub scale: f32,
    pub surface: WritingSurface,
}

impl PointerMapping {
    /// Screen centre maps to the centre of the writing surface; screen y grows downward.
    pub fn to_surface(&self, x: f64, y: f64) -> Vec3 {
        let scale = self.scale as f64;
        let center_y = self.surface.v_shift() as f64 + self.surface.size() as f64 / 2.0;
        Vec3::new(
            ((x - self.screen_width / 2.0) * scale) as f32,
            (center_y + (self.screen_height / 2.0 - y) * scale) as f32,
            0.0,
        )
    }

    /// Build the sensor frame for the current pointer state.
    pub fn frame(&self, id: u64, state: &PointerState) -> SensorFrame {
        let index = self.to_surface(state.x, state.y);
        let offset = if state.pen_down { 0.0 } else { PEN_UP_SEPARATION };
        let middle = Vec3::new(index.x + offset, index.y, index.z);

        SensorFrame {
            id,
            hands: vec![Hand {
                fingers: vec![
                    Finger { kind: FingerKind::Index, tip: index },
                    Finger { kind: FingerKind::Middle, tip: middle },
                ],
            }],
            gestures: vec![GestureKind::Swipe; state.pending_swipes as usize],
        }
    }
}

/// Samples global pointer input at a fixed frame rate.
pub struct PointerSource {
    mapping: PointerMapping,
    frame_interval: Duration,
}

impl PointerSource {
    /// Query the primary display size and set up the mapping.
    pub fn new(scale: f32, frame_rate: u32, surface: WritingSurface) -> Result<Self, SensorError> {
        let (width, height) =
            rdev::display_size().map_err(|e| SensorError::DisplaySize(format!("{:?}", e)))?;
        log::info!("Pointer source on {}x{} display", width, height);
        Ok(Self {
            mapping: PointerMapping {
                screen_width: width as f64,
                screen_height: height as f64,
                scale,
                surface,
            },
            frame_interval: Duration::from_secs_f64(1.0 / frame_rate.max(1) as f64),
        })
    }

    pub fn mapping(&self) -> &PointerMapping {
        &self.mapping
    }

    /// Deliver frames until `stop` returns true. Returns the number of frames delivered.
    pub fn run<L, F>(&self, listener: &mut L, stop: F) -> Result<u64, SensorError>
    where
        L: SensorListener + ?Sized,
        F: Fn() -> bool,
    {
        let state = Arc::new(Mutex::new(PointerState {
            x: self.mapping.screen_width / 2.0,
            y: self.mapping.screen_height / 2.0,
            ..PointerState::default()
        }));

        let shared = state.clone();
        // rdev's listen() blocks for the life of the process, so the thread is never joined
        thread::Builder::new()
            .name("pointer-listener".to_string())
            .spawn(move || {
                let callback = move |event: Event| {
                    lock(&shared).apply(&event.event_type);
                };
                // Note: On macOS, this requires Accessibility permissions
                if let Err(e) = listen(callback) {
                    log::error!("Pointer listener error: {:?}", e);
                }
            })
            .map_err(|e| SensorError::Listen(e.to_string()))?;

        listener.on_init();
        listener.on_connect();

        let mut id = 0u64;
        while !stop() {
            thread::sleep(self.frame_interval);
            id += 1;
            let snapshot = {
                let mut guard = lock(&state);
                let snapshot = *guard;
                guard.pending_swipes = 0;
                snapshot
            };
            listener.on_frame(&self.mapping.frame(id, &snapshot));
        }

        listener.on_disconnect();
        listener.on_exit();
        Ok(id)
    }
}

fn lock(state: &Mutex<PointerState>) -> MutexGuard<'_, PointerState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> PointerMapping {
        PointerMapping {
            screen_width: 1920.0,
            screen_height: 1080.0,
            scale: 0.5,
            surface: WritingSurface::default(),
        }
    }

    #[test]
    fn test_screen_center_maps_to_surface_center() {
        let tip = mapping().to_surface(960.0, 540.0);
        assert_eq!(tip, Vec3::new(0.0, 250.0, 0.0));
    }

    #[test]
    fn test_screen_up_is_surface_up() {
        let m = mapping();
        let top = m.to_surface(960.0, 140.0);
        assert_eq!(top.y, 450.0);
        let right = m.to_surface(1260.0, 540.0);
        assert_eq!(right.x, 150.0);
    }

    #[test]
    fn test_pen_state_controls_separation() {
        let m = mapping();
        let mut state = PointerState { x: 960.0, y: 540.0, ..PointerState::default() };
        let up = m.frame(1, &state).sample().unwrap();
        assert_eq!(up.separation(), PEN_UP_SEPARATION);

        state.apply(&EventType::ButtonPress(Button::Left));
        let down = m.frame(2, &state).sample().unwrap();
        assert_eq!(down.separation(), 0.0);

        state.apply(&EventType::ButtonRelease(Button::Left));
        assert!(!state.pen_down);
    }

    #[test]
    fn test_backspace_queues_swipes() {
        let mut state = PointerState::default();
        state.apply(&EventType::KeyPress(Key::Backspace));
        state.apply(&EventType::KeyPress(Key::Backspace));
        state.apply(&EventType::KeyPress(Key::KeyA));
        let frame = mapping().frame(3, &state);
        assert_eq!(frame.gestures, vec![GestureKind::Swipe, GestureKind::Swipe]);
    }

    #[test]
    fn test_mouse_move_updates_position() {
        let mut state = PointerState::default();
        state.apply(&EventType::MouseMove { x: 10.0, y: 20.0 });
        assert_eq!((state.x, state.y), (10.0, 20.0));
    }
}
