//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction, SliceArgs};
pub use commands::{handle_config_action, run_palette, run_preview, run_slice, SliceSettings};
pub use enums::Mode;
