//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing and subcommand handlers.

mod args;
mod commands;

pub use args::{Args, Command, ConfigAction, RunArgs, SourceKind};
pub use commands::{apply_overrides, classify, handle_config_action, inspect, load_params, run};
