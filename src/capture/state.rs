//! Stroke capture state machine.
//!
//! Bringing the index and middle fingertips together starts a stroke; spreading
//! them apart ends it. The enter threshold is lower than the exit threshold so
//! a separation hovering near one value cannot flip the state every frame.
//!
//! ```text
//!          separation < enter            separation > exit
//!   Idle ----------------------> Writing -------------------> Idle
//!          (board cleared)        (marks)   (recognize if active)
//! ```

use super::sample::{GestureKind, HandSample, SensorFrame};
use super::surface::WritingSurface;
use crate::error::ValidationError;
use crate::raster::{BoardPoint, RasterBoard};
use crate::recognize::Recognize;
use crate::render::Renderer;
use crate::text::TextBuffer;

/// Default fingertip separation (mm) below which writing starts.
pub const DEFAULT_ENTER_THRESHOLD: f32 = 30.0;

/// Default fingertip separation (mm) above which writing stops.
pub const DEFAULT_EXIT_THRESHOLD: f32 = 35.0;

/// Default number of marked cells a stroke needs before it is recognized.
pub const DEFAULT_ACTIVITY_THRESHOLD: usize = 2500;

/// Default minimum frame gap between accepted erase gestures.
pub const DEFAULT_COOLDOWN_FRAMES: u64 = 30;

/// Tunables for [`StrokeCaptureStateMachine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSettings {
    pub enter_threshold: f32,
    pub exit_threshold: f32,
    pub activity_threshold: usize,
    pub cooldown_frames: u64,
    pub surface: WritingSurface,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            enter_threshold: DEFAULT_ENTER_THRESHOLD,
            exit_threshold: DEFAULT_EXIT_THRESHOLD,
            activity_threshold: DEFAULT_ACTIVITY_THRESHOLD,
            cooldown_frames: DEFAULT_COOLDOWN_FRAMES,
            surface: WritingSurface::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Writing,
}

/// Debounce for erase gestures, keyed on sensor frame ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeCooldown {
    frames: u64,
    last_accepted: Option<u64>,
}

impl SwipeCooldown {
    pub fn new(frames: u64) -> Self {
        Self {
            frames,
            last_accepted: None,
        }
    }

    /// Frame id of the last accepted erase, if any.
    pub fn last_accepted(&self) -> Option<u64> {
        self.last_accepted
    }

    /// Whether an erase at `frame_id` is outside the cooldown window.
    pub fn ready(&self, frame_id: u64) -> bool {
        match self.last_accepted {
            None => true,
            Some(last) => frame_id.saturating_sub(last) >= self.frames && frame_id > last,
        }
    }

    pub fn accept(&mut self, frame_id: u64) {
        self.last_accepted = Some(frame_id);
    }
}

/// What happened while processing one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    /// Idle -> Writing; the board was cleared
    StrokeStarted,
    /// A pen disk was stamped at this board position
    Marked(BoardPoint),
    /// Writing -> Idle and the stroke was recognized as this character
    Recognized(char),
    /// Writing -> Idle but the stroke had too little ink
    Discarded { marked: usize },
    /// Writing -> Idle and the recognition pipeline rejected the board
    RecognitionFailed(ValidationError),
    /// An erase gesture was accepted; holds the removed character
    Erased(Option<char>),
    /// An erase gesture arrived while writing or inside the cooldown
    EraseIgnored,
}

/// Owns the board, the capture state, the erase cooldown and the recognized text.
#[derive(Debug, Clone)]
pub struct StrokeCaptureStateMachine {
    settings: CaptureSettings,
    state: CaptureState,
    board: RasterBoard,
    cooldown: SwipeCooldown,
    text: TextBuffer,
}

impl StrokeCaptureStateMachine {
    pub fn new(settings: CaptureSettings) -> Self {
        Self {
            state: CaptureState::Idle,
            board: RasterBoard::square(settings.surface.board_side()),
            cooldown: SwipeCooldown::new(settings.cooldown_frames),
            text: TextBuffer::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn board(&self) -> &RasterBoard {
        &self.board
    }

    pub fn text(&self) -> &TextBuffer {
        &self.text
    }

    pub fn cooldown(&self) -> &SwipeCooldown {
        &self.cooldown
    }

    /// Process one sensor frame: stroke tracking first, then gestures.
    pub fn on_frame<R, D>(
        &mut self,
        frame: &SensorFrame,
        recognizer: &R,
        renderer: &mut D,
    ) -> Vec<CaptureEvent>
    where
        R: Recognize + ?Sized,
        D: Renderer + ?Sized,
    {
        let mut events = self.on_sample(frame.sample(), recognizer, renderer);
        for gesture in &frame.gestures {
            if let Some(event) = self.on_gesture(*gesture, frame.id, renderer) {
                events.push(event);
            }
        }
        events
    }

    /// Advance the stroke state with one (possibly absent) hand sample.
    ///
    /// An absent sample leaves the state unchanged.
    pub fn on_sample<R, D>(
        &mut self,
        sample: Option<HandSample>,
        recognizer: &R,
        renderer: &mut D,
    ) -> Vec<CaptureEvent>
    where
        R: Recognize + ?Sized,
        D: Renderer + ?Sized,
    {
        let mut events = Vec::new();
        let Some(sample) = sample else {
            return events;
        };
        let separation = sample.separation();

        if self.state == CaptureState::Idle && separation < self.settings.enter_threshold {
            self.board.clear();
            self.state = CaptureState::Writing;
            log::debug!("Stroke started (separation {:.1}mm)", separation);
            events.push(CaptureEvent::StrokeStarted);
        }

        if self.state == CaptureState::Writing {
            if let Some(point) = self.settings.surface.project(&sample.index) {
                self.board.stamp_disk(point, self.settings.surface.pen_radius());
                renderer.draw_mark(point);
                events.push(CaptureEvent::Marked(point));
            }

            if separation > self.settings.exit_threshold {
                self.state = CaptureState::Idle;
                events.push(self.finish_stroke(recognizer, renderer));
            }
        }

        events
    }

    fn finish_stroke<R, D>(&mut self, recognizer: &R, renderer: &mut D) -> CaptureEvent
    where
        R: Recognize + ?Sized,
        D: Renderer + ?Sized,
    {
        let marked = self.board.marked();
        let event = if marked > self.settings.activity_threshold {
            match recognizer.recognize(&self.board) {
                Ok(ch) => {
                    self.text.append(ch);
                    log::info!("Recognized '{}' ({} cells)", ch, marked);
                    CaptureEvent::Recognized(ch)
                }
                Err(e) => {
                    log::error!("Recognition failed: {}", e);
                    CaptureEvent::RecognitionFailed(e)
                }
            }
        } else {
            log::debug!(
                "Stroke discarded: {} cells, need more than {}",
                marked,
                self.settings.activity_threshold
            );
            CaptureEvent::Discarded { marked }
        };

        // Also clears any live preview of a discarded stroke
        renderer.write(&self.text.as_string());
        event
    }

    /// Handle a gesture reported at `frame_id`. Returns `None` for gestures with no effect.
    pub fn on_gesture<D>(
        &mut self,
        gesture: GestureKind,
        frame_id: u64,
        renderer: &mut D,
    ) -> Option<CaptureEvent>
    where
        D: Renderer + ?Sized,
    {
        match gesture {
            GestureKind::Swipe => {}
            GestureKind::Circle | GestureKind::KeyTap | GestureKind::ScreenTap => return None,
        }

        if self.state == CaptureState::Writing || !self.cooldown.ready(frame_id) {
            log::debug!("Erase ignored at frame {} ({:?})", frame_id, self.state);
            return Some(CaptureEvent::EraseIgnored);
        }

        self.cooldown.accept(frame_id);
        let removed = self.text.erase_last();
        log::info!("Erased {:?} at frame {}", removed, frame_id);
        renderer.write(&self.text.as_string());
        Some(CaptureEvent::Erased(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::sample::Vec3;
    use std::cell::Cell;

    struct FixedRecognizer {
        ch: char,
        calls: Cell<usize>,
    }

    impl FixedRecognizer {
        fn new(ch: char) -> Self {
            Self { ch, calls: Cell::new(0) }
        }
    }

    impl Recognize for FixedRecognizer {
        fn recognize(&self, _board: &RasterBoard) -> Result<char, ValidationError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.ch)
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        writes: Vec<String>,
        marks: usize,
    }

    impl Renderer for RecordingRenderer {
        fn write(&mut self, text: &str) {
            self.writes.push(text.to_string());
        }

        fn draw_mark(&mut self, _point: BoardPoint) {
            self.marks += 1;
        }
    }

    fn settings(activity_threshold: usize) -> CaptureSettings {
        CaptureSettings {
            activity_threshold,
            ..CaptureSettings::default()
        }
    }

    /// Index tip at `(x, y)` with the middle tip `separation` mm to its right.
    fn sample_at(x: f32, y: f32, separation: f32) -> HandSample {
        HandSample::new(Vec3::new(x, y, 0.0), Vec3::new(x + separation, y, 0.0))
    }

    #[test]
    fn test_separation_sequence_yields_one_cycle() {
        let mut machine = StrokeCaptureStateMachine::new(settings(0));
        let recognizer = FixedRecognizer::new('3');
        let mut renderer = RecordingRenderer::default();

        let mut all = Vec::new();
        for sep in [40.0, 40.0, 20.0, 20.0, 40.0] {
            let events = machine.on_sample(Some(sample_at(0.0, 250.0, sep)), &recognizer, &mut renderer);
            all.push(events);
        }

        assert!(all[0].is_empty());
        assert!(all[1].is_empty());
        assert_eq!(all[2][0], CaptureEvent::StrokeStarted);
        assert!(!all[3].contains(&CaptureEvent::StrokeStarted));
        assert_eq!(all[4].last(), Some(&CaptureEvent::Recognized('3')));
        assert_eq!(recognizer.calls.get(), 1);
        assert_eq!(machine.state(), CaptureState::Idle);
        assert_eq!(machine.text().as_string(), "3");
    }

    #[test]
    fn test_hysteresis_band_holds_state() {
        let mut machine = StrokeCaptureStateMachine::new(settings(0));
        let recognizer = FixedRecognizer::new('1');
        let mut renderer = RecordingRenderer::default();

        // Between the thresholds nothing changes, in either state
        machine.on_sample(Some(sample_at(0.0, 250.0, 32.0)), &recognizer, &mut renderer);
        assert_eq!(machine.state(), CaptureState::Idle);
        machine.on_sample(Some(sample_at(0.0, 250.0, 10.0)), &recognizer, &mut renderer);
        assert_eq!(machine.state(), CaptureState::Writing);
        for sep in [31.0, 34.0, 35.0, 29.0] {
            machine.on_sample(Some(sample_at(0.0, 250.0, sep)), &recognizer, &mut renderer);
            assert_eq!(machine.state(), CaptureState::Writing);
        }
        assert_eq!(recognizer.calls.get(), 0);
    }

    #[test]
    fn test_board_cleared_on_stroke_start() {
        let mut machine = StrokeCaptureStateMachine::new(settings(usize::MAX));
        let recognizer = FixedRecognizer::new('1');
        let mut renderer = RecordingRenderer::default();

        machine.on_sample(Some(sample_at(-100.0, 300.0, 0.0)), &recognizer, &mut renderer);
        machine.on_sample(Some(sample_at(-100.0, 300.0, 50.0)), &recognizer, &mut renderer);
        let first_stroke = machine.board().marked();
        assert!(first_stroke > 0);

        // New stroke in a different place: the old ink is gone
        machine.on_sample(Some(sample_at(100.0, 100.0, 0.0)), &recognizer, &mut renderer);
        let board = machine.board();
        let old = machine.settings().surface.project(&Vec3::new(-100.0, 300.0, 0.0)).unwrap();
        assert_eq!(board.get(old.row, old.col), 0);
        assert_eq!(board.marked(), first_stroke);
    }

    #[test]
    fn test_marks_only_inside_surface() {
        let mut machine = StrokeCaptureStateMachine::new(settings(usize::MAX));
        let recognizer = FixedRecognizer::new('1');
        let mut renderer = RecordingRenderer::default();

        machine.on_sample(Some(sample_at(0.0, 20.0, 0.0)), &recognizer, &mut renderer);
        assert_eq!(machine.state(), CaptureState::Writing);
        assert!(machine.board().is_empty());
        assert_eq!(renderer.marks, 0);

        let events = machine.on_sample(Some(sample_at(0.0, 200.0, 0.0)), &recognizer, &mut renderer);
        assert!(matches!(events[0], CaptureEvent::Marked(_)));
        assert_eq!(renderer.marks, 1);
        // Full disk of radius 7
        assert_eq!(machine.board().marked(), 149);
    }

    #[test]
    fn test_sub_threshold_stroke_is_discarded() {
        let mut machine = StrokeCaptureStateMachine::new(settings(2500));
        let recognizer = FixedRecognizer::new('1');
        let mut renderer = RecordingRenderer::default();

        machine.on_sample(Some(sample_at(0.0, 200.0, 0.0)), &recognizer, &mut renderer);
        let events = machine.on_sample(Some(sample_at(0.0, 200.0, 60.0)), &recognizer, &mut renderer);
        assert_eq!(events.last(), Some(&CaptureEvent::Discarded { marked: 149 }));
        assert_eq!(recognizer.calls.get(), 0);
        assert!(machine.text().is_empty());
    }

    #[test]
    fn test_absent_hand_keeps_state() {
        let mut machine = StrokeCaptureStateMachine::new(settings(0));
        let recognizer = FixedRecognizer::new('1');
        let mut renderer = RecordingRenderer::default();

        machine.on_sample(Some(sample_at(0.0, 200.0, 0.0)), &recognizer, &mut renderer);
        for _ in 0..5 {
            assert!(machine.on_sample(None, &recognizer, &mut renderer).is_empty());
        }
        assert_eq!(machine.state(), CaptureState::Writing);
    }

    #[test]
    fn test_erase_cooldown() {
        let mut machine = StrokeCaptureStateMachine::new(settings(0));
        let mut renderer = RecordingRenderer::default();
        for ch in ['1', '2', '3'] {
            machine.text.append(ch);
        }

        let e5 = machine.on_gesture(GestureKind::Swipe, 5, &mut renderer);
        let e10 = machine.on_gesture(GestureKind::Swipe, 10, &mut renderer);
        assert_eq!(e5, Some(CaptureEvent::Erased(Some('3'))));
        assert_eq!(e10, Some(CaptureEvent::EraseIgnored));
        assert_eq!(machine.text().as_string(), "12");

        let e40 = machine.on_gesture(GestureKind::Swipe, 40, &mut renderer);
        assert_eq!(e40, Some(CaptureEvent::Erased(Some('2'))));
        assert_eq!(machine.cooldown().last_accepted(), Some(40));
        assert_eq!(renderer.writes, vec!["12".to_string(), "1".to_string()]);
    }

    #[test]
    fn test_erase_ignored_while_writing() {
        let mut machine = StrokeCaptureStateMachine::new(settings(0));
        let recognizer = FixedRecognizer::new('1');
        let mut renderer = RecordingRenderer::default();
        machine.text.append('9');

        machine.on_sample(Some(sample_at(0.0, 200.0, 0.0)), &recognizer, &mut renderer);
        let event = machine.on_gesture(GestureKind::Swipe, 100, &mut renderer);
        assert_eq!(event, Some(CaptureEvent::EraseIgnored));
        assert_eq!(machine.text().as_string(), "9");
        // Ignored gestures do not start a cooldown
        assert_eq!(machine.cooldown().last_accepted(), None);
    }

    #[test]
    fn test_erase_on_empty_buffer_is_noop() {
        let mut machine = StrokeCaptureStateMachine::new(settings(0));
        let mut renderer = RecordingRenderer::default();
        let event = machine.on_gesture(GestureKind::Swipe, 1, &mut renderer);
        assert_eq!(event, Some(CaptureEvent::Erased(None)));
        assert!(machine.text().is_empty());
    }

    #[test]
    fn test_other_gestures_have_no_effect() {
        let mut machine = StrokeCaptureStateMachine::new(settings(0));
        let mut renderer = RecordingRenderer::default();
        machine.text.append('4');
        for g in [GestureKind::Circle, GestureKind::KeyTap, GestureKind::ScreenTap] {
            assert_eq!(machine.on_gesture(g, 100, &mut renderer), None);
        }
        assert_eq!(machine.text().as_string(), "4");
    }

    #[test]
    fn test_cooldown_ready() {
        let mut cooldown = SwipeCooldown::new(30);
        assert!(cooldown.ready(0));
        cooldown.accept(5);
        assert!(!cooldown.ready(34));
        assert!(cooldown.ready(35));
        // Frame ids going backwards never reopen the window
        assert!(!cooldown.ready(2));
    }
}
