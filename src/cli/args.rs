//! CLI argument parsing with clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use super::enums::Mode;

/// Slices a processed image into cable-robot painting instructions
#[derive(Parser, Debug)]
#[command(name = "mural-slicer")]
#[command(version, about = "Image slicer for a two-cable mural painting robot", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Slice an image into an instruction document
    Slice(SliceArgs),
    /// Render an instruction document back into a PNG
    Preview {
        /// Instruction document to render
        document: PathBuf,

        /// Where to write the PNG
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,
    },
    /// Print the colors of an image in palette order
    Palette {
        /// Image to inspect
        image: PathBuf,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for `slice`. Unset options fall back to the config file.
#[derive(ClapArgs, Debug, Default)]
pub struct SliceArgs {
    /// Processed image to slice
    pub image: PathBuf,

    /// Instruction document to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Slicing mode
    #[arg(short, long)]
    pub mode: Option<Mode>,

    /// Comma-separated palette in index order (default: colors of the image)
    #[arg(long, value_delimiter = ',')]
    pub palette: Option<Vec<String>>,

    /// Edge length of one pixel on the wall (m)
    #[arg(long)]
    pub pixel_size: Option<f64>,

    /// Distance between the pulleys (m)
    #[arg(long)]
    pub cable_separation: Option<f64>,

    /// Distance from the pulleys to the bottom of the mural (m)
    #[arg(long)]
    pub dist_from_pulley: Option<f64>,

    /// Shift of the image from the centre towards the left (m)
    #[arg(long, allow_negative_numbers = true)]
    pub offset: Option<f64>,

    /// Paint nozzles per stripe (1-9)
    #[arg(long)]
    pub nozzles: Option<u32>,

    /// Resize the image to this many pixels wide before slicing
    #[arg(long, value_name = "PX")]
    pub resize: Option<u32>,

    /// Render a PNG preview of the finished document
    #[arg(long)]
    pub preview: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
