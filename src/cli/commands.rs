//! Subcommand handlers for run, classify, inspect and config actions.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::args::{ConfigAction, RunArgs, SourceKind};
use crate::config::{default_path, Config};
use crate::error::ConfigError;
use crate::network::NetworkParameters;
use crate::raster::RasterBoard;
use crate::recognize::Recognizer;
use crate::render::TerminalRenderer;
use crate::sensor::{DigitWriter, PointerSource, ReplaySource};
use crate::shutdown::{ctrlc_received, setup_ctrlc_handler};

pub type CommandResult = Result<(), Box<dyn Error + Send + Sync>>;

const DEFAULT_CONFIG: &str = r#"# air-digits configuration

[capture]
# Fingertip separation (mm) that starts a stroke
enter_threshold = 30.0
# Fingertip separation (mm) that ends a stroke; keep it above enter_threshold
exit_threshold = 35.0
# Marked cells a stroke needs before it is recognized
activity_threshold = 2500
# Minimum frames between two accepted erase swipes
cooldown_frames = 30

[surface]
# Side of the square writing area (mm)
size = 400
# Pen radius in board cells
pen_radius = 7
# Height of the writing area's bottom edge above the sensor (mm)
v_shift = 50.0

[network]
# Network parameter file, relative to this file's directory
params = "nn_params.json"

[pointer]
# Millimetres of writing surface per screen pixel
scale = 0.5
frame_rate = 60

[display]
# Show the stroke preview while writing
preview = true
preview_cols = 40
preview_rows = 20
"#;

/// Apply command-line overrides on top of the loaded config.
pub fn apply_overrides(config: &mut Config, args: &RunArgs) -> Result<(), ConfigError> {
    if let Some(v) = args.enter_threshold {
        config.capture.enter_threshold = v;
    }
    if let Some(v) = args.exit_threshold {
        config.capture.exit_threshold = v;
    }
    if let Some(v) = args.activity_threshold {
        config.capture.activity_threshold = v;
    }
    if let Some(v) = args.cooldown_frames {
        config.capture.cooldown_frames = v;
    }
    if args.no_preview {
        config.display.preview = false;
    }
    config.validate()
}

/// Load the network parameters named by the config, or by `--params`.
///
/// A `--params` path resolves against the working directory.
pub fn load_params(
    config: &Config,
    params: Option<&Path>,
) -> Result<Arc<NetworkParameters>, ConfigError> {
    let path: PathBuf = match params {
        Some(p) => p.to_path_buf(),
        None => config.params_path(),
    };
    NetworkParameters::load(&path).map(Arc::new)
}

/// Capture strokes from the chosen source until it ends or Ctrl+C is pressed.
pub fn run(config: &Config, args: &RunArgs, params: Arc<NetworkParameters>) -> CommandResult {
    let settings = config.capture_settings();
    let board_side = settings.surface.board_side();
    let renderer = TerminalRenderer::new(
        std::io::stdout(),
        board_side,
        config.display.preview_cols,
        config.display.preview_rows,
        config.display.preview,
    );
    let mut writer = DigitWriter::new(settings, Recognizer::new(params), renderer);

    setup_ctrlc_handler()?;

    match args.source() {
        SourceKind::Replay => {
            let path = args
                .replay
                .as_deref()
                .ok_or("--source replay needs a recording, pass --replay FILE")?;
            let mut source = ReplaySource::open(path)?;
            if args.realtime {
                source = source.with_frame_rate(config.pointer.frame_rate);
            }
            let stats = source.run(&mut writer, ctrlc_received)?;
            log::info!(
                "Replayed {} frames from '{}' ({} skipped)",
                stats.delivered,
                path.display(),
                stats.skipped
            );
        }
        SourceKind::Pointer => {
            println!("Hold the left mouse button to write, press Backspace to erase.");
            println!("Press Ctrl+C to quit.");
            let source =
                PointerSource::new(config.pointer.scale, config.pointer.frame_rate, settings.surface)?;
            let frames = source.run(&mut writer, ctrlc_received)?;
            log::debug!("Pointer source delivered {} frames", frames);
        }
    }

    println!();
    println!("{}", writer.text());
    Ok(())
}

/// Recognize a raster stored as text and print the class scores.
pub fn classify(file: &Path, params: Arc<NetworkParameters>) -> CommandResult {
    let content = std::fs::read_to_string(file)
        .map_err(|e| format!("Cannot read '{}': {}", file.display(), e))?;
    let board = RasterBoard::from_text(&content);
    log::debug!(
        "Read {}x{} raster with {} marked cells",
        board.rows(),
        board.cols(),
        board.marked()
    );

    let recognizer = Recognizer::new(params);
    let recognition = recognizer.analyze(&board)?;
    let labels = recognizer.classifier().params().labels();

    println!("Recognized: {}", recognition.label);
    println!();
    println!("Scores:");
    for (class, (label, score)) in labels.iter().zip(&recognition.scores).enumerate() {
        let marker = if class == recognition.class { "*" } else { " " };
        println!("  {} {}  {:>10.4}", marker, label, score);
    }
    Ok(())
}

/// Print the shape of every layer in the parameter file.
pub fn inspect(params: &NetworkParameters) -> CommandResult {
    println!("Fingerprint: {}", params.fingerprint());
    println!(
        "Input: {}x{} pixels, scale {}",
        params.input_side(),
        params.input_side(),
        params.input_scale()
    );
    println!("Labels: {}", params.labels().iter().collect::<String>());
    println!();
    println!("Layers:");
    for layer in params.layers() {
        let kind = if layer.is_output() { "output" } else { "hidden, relu" };
        println!(
            "  {:<12} {:>5} -> {:<5} ({})",
            layer.name(),
            layer.inputs(),
            layer.outputs(),
            kind
        );
    }
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: ConfigAction,
    config: &Config,
    config_path: Option<&Path>,
) -> CommandResult {
    let config_path = config_path.map(PathBuf::from).unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!();
            print!("{}", toml::to_string_pretty(config)?);
            println!();
            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            println!("Parameter file: {}", config.params_path().display());
        }
        ConfigAction::Init => {
            if config_path.exists() {
                return Err(format!(
                    "Config file already exists: {}\nUse 'air-digits config show' to view current settings.",
                    config_path.display()
                )
                .into());
            }

            // Create parent directories if needed
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Error creating config directory: {}", e))?;
            }

            std::fs::write(&config_path, DEFAULT_CONFIG)
                .map_err(|e| format!("Error writing config file: {}", e))?;
            println!("Created config file: {}", config_path.display());
        }
    }
    Ok(())
}
