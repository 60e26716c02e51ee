//! CLI argument parsing with clap.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Write digits in the air with your fingertip and recognize them
#[derive(Parser, Debug)]
#[command(name = "air-digits")]
#[command(version, about = "Air-written digit recognition", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Network parameter file (overrides the config file)
    #[arg(long, short, global = true)]
    pub params: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Capture strokes and recognize them (default)
    Run(RunArgs),
    /// Recognize a text raster file ('#' or '1' marked, '.' or '0' empty)
    Classify {
        /// Raster file, one row per line
        file: PathBuf,
    },
    /// Show the layers of the network parameter file
    Inspect,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

/// Where sensor frames come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SourceKind {
    /// Global mouse pointer: hold the left button to write, Backspace to erase
    #[default]
    Pointer,
    /// JSON-lines recording of sensor frames
    Replay,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Sensor frame source
    #[arg(long, value_enum, default_value_t = SourceKind::Pointer)]
    pub source: SourceKind,

    /// Recording to play back (implies --source replay)
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Pace replayed frames at the configured frame rate
    #[arg(long)]
    pub realtime: bool,

    /// Print only the recognized text, no stroke preview
    #[arg(long)]
    pub no_preview: bool,

    /// Fingertip separation (mm) that starts a stroke
    #[arg(long)]
    pub enter_threshold: Option<f32>,

    /// Fingertip separation (mm) that ends a stroke
    #[arg(long)]
    pub exit_threshold: Option<f32>,

    /// Marked cells a stroke needs to be recognized
    #[arg(long)]
    pub activity_threshold: Option<usize>,

    /// Minimum frames between accepted erase gestures
    #[arg(long)]
    pub cooldown_frames: Option<u64>,
}

impl RunArgs {
    /// Effective source, taking `--replay` into account.
    pub fn source(&self) -> SourceKind {
        if self.replay.is_some() {
            SourceKind::Replay
        } else {
            self.source
        }
    }
}
