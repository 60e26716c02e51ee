//! Replay of recorded sensor frames from a JSON-lines file.
//!
//! Each non-empty line is one [`SensorFrame`]. Lines that fail to parse, or
//! whose frame id does not increase, are skipped with a warning.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use super::{SensorError, SensorListener};
use crate::capture::SensorFrame;

/// Outcome of a replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub delivered: u64,
    pub skipped: u64,
    /// Replay ended early because shutdown was requested
    pub interrupted: bool,
}

/// Feeds recorded frames to a [`SensorListener`].
pub struct ReplaySource<B> {
    reader: B,
    frame_interval: Option<Duration>,
}

impl ReplaySource<BufReader<File>> {
    /// Open a recording on disk.
    pub fn open(path: &Path) -> Result<Self, SensorError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<B: BufRead> ReplaySource<B> {
    pub fn new(reader: B) -> Self {
        Self {
            reader,
            frame_interval: None,
        }
    }

    /// Sleep between frames to reproduce the recording's pace.
    pub fn with_frame_rate(mut self, fps: u32) -> Self {
        self.frame_interval = (fps > 0).then(|| Duration::from_secs_f64(1.0 / fps as f64));
        self
    }

    /// Deliver every frame, calling the listener's lifecycle hooks around them.
    ///
    /// `stop` is polled before each frame.
    pub fn run<L, F>(self, listener: &mut L, stop: F) -> Result<ReplayStats, SensorError>
    where
        L: SensorListener + ?Sized,
        F: Fn() -> bool,
    {
        let mut stats = ReplayStats::default();
        let mut last_id: Option<u64> = None;

        listener.on_init();
        listener.on_connect();

        for (line_no, line) in self.reader.lines().enumerate() {
            if stop() {
                stats.interrupted = true;
                break;
            }
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let frame: SensorFrame = match serde_json::from_str(line) {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Skipping line {}: {}", line_no + 1, e);
                    stats.skipped += 1;
                    continue;
                }
            };
            if last_id.is_some_and(|last| frame.id <= last) {
                log::warn!(
                    "Skipping line {}: frame id {} does not increase",
                    line_no + 1,
                    frame.id
                );
                stats.skipped += 1;
                continue;
            }
            last_id = Some(frame.id);

            listener.on_frame(&frame);
            stats.delivered += 1;

            if let Some(interval) = self.frame_interval {
                std::thread::sleep(interval);
            }
        }

        listener.on_disconnect();
        listener.on_exit();
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[derive(Default)]
    struct Log {
        hooks: Vec<&'static str>,
        ids: Vec<u64>,
    }

    impl SensorListener for Log {
        fn on_init(&mut self) {
            self.hooks.push("init");
        }
        fn on_connect(&mut self) {
            self.hooks.push("connect");
        }
        fn on_disconnect(&mut self) {
            self.hooks.push("disconnect");
        }
        fn on_frame(&mut self, frame: &SensorFrame) {
            self.ids.push(frame.id);
        }
        fn on_exit(&mut self) {
            self.hooks.push("exit");
        }
    }

    #[test]
    fn test_replay_delivers_frames_in_order() {
        let data = "{\"id\": 1}\n{\"id\": 2}\n\n{\"id\": 5}\n";
        let mut log = Log::default();
        let stats = ReplaySource::new(Cursor::new(data)).run(&mut log, || false).unwrap();
        assert_eq!(log.ids, vec![1, 2, 5]);
        assert_eq!(log.hooks, vec!["init", "connect", "disconnect", "exit"]);
        assert_eq!(stats.delivered, 3);
        assert_eq!(stats.skipped, 0);
        assert!(!stats.interrupted);
    }

    #[test]
    fn test_replay_skips_malformed_and_stale_lines() {
        let data = "{\"id\": 3}\nnot json\n{\"id\": 2}\n{\"id\": 4, \"hands\": 7}\n{\"id\": 9}\n";
        let mut log = Log::default();
        let stats = ReplaySource::new(Cursor::new(data)).run(&mut log, || false).unwrap();
        assert_eq!(log.ids, vec![3, 9]);
        assert_eq!(stats.skipped, 3);
    }

    #[test]
    fn test_replay_stops_when_requested() {
        let data = "{\"id\": 1}\n{\"id\": 2}\n";
        let mut log = Log::default();
        let stats = ReplaySource::new(Cursor::new(data)).run(&mut log, || true).unwrap();
        assert!(log.ids.is_empty());
        assert!(stats.interrupted);
        // Lifecycle hooks still run so the listener can clean up
        assert_eq!(log.hooks.last(), Some(&"exit"));
    }
}
