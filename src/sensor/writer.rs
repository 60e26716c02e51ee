//! The listener that turns sensor frames into recognized text.

use super::SensorListener;
use crate::capture::{CaptureEvent, CaptureSettings, SensorFrame, StrokeCaptureStateMachine};
use crate::recognize::Recognize;
use crate::render::Renderer;

/// Counters kept across a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: u64,
    pub strokes: u64,
    pub recognized: u64,
    pub discarded: u64,
    pub erased: u64,
}

/// Owns the capture state machine and forwards every frame to it.
pub struct DigitWriter<R, D> {
    machine: StrokeCaptureStateMachine,
    recognizer: R,
    renderer: D,
    stats: SessionStats,
}

impl<R: Recognize, D: Renderer> DigitWriter<R, D> {
    pub fn new(settings: CaptureSettings, recognizer: R, renderer: D) -> Self {
        Self {
            machine: StrokeCaptureStateMachine::new(settings),
            recognizer,
            renderer,
            stats: SessionStats::default(),
        }
    }

    pub fn machine(&self) -> &StrokeCaptureStateMachine {
        &self.machine
    }

    pub fn renderer(&self) -> &D {
        &self.renderer
    }

    /// Consume the writer and return the renderer.
    pub fn into_renderer(self) -> D {
        self.renderer
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Current recognized text.
    pub fn text(&self) -> String {
        self.machine.text().as_string()
    }

    fn record(&mut self, events: &[CaptureEvent]) {
        for event in events {
            match event {
                CaptureEvent::StrokeStarted => self.stats.strokes += 1,
                CaptureEvent::Recognized(_) => self.stats.recognized += 1,
                CaptureEvent::Discarded { .. } | CaptureEvent::RecognitionFailed(_) => {
                    self.stats.discarded += 1
                }
                CaptureEvent::Erased(_) => self.stats.erased += 1,
                CaptureEvent::Marked(_) | CaptureEvent::EraseIgnored => {}
            }
        }
    }
}

impl<R: Recognize, D: Renderer> SensorListener for DigitWriter<R, D> {
    fn on_init(&mut self) {
        log::info!("Initialized");
        self.renderer.write("");
    }

    fn on_connect(&mut self) {
        log::info!("Connected");
    }

    fn on_disconnect(&mut self) {
        log::info!("Disconnected");
    }

    fn on_frame(&mut self, frame: &SensorFrame) {
        self.stats.frames += 1;
        let events = self
            .machine
            .on_frame(frame, &self.recognizer, &mut self.renderer);
        self.record(&events);
    }

    fn on_exit(&mut self) {
        let s = self.stats;
        log::info!(
            "Exited after {} frames: {} strokes, {} recognized, {} discarded, {} erased",
            s.frames,
            s.strokes,
            s.recognized,
            s.discarded,
            s.erased
        );
    }
}
