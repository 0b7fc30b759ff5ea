//! Configuration file handling for mural-slicer.
//!
//! Loads configuration from `~/.config/mural-slicer/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::slicing::SlicingMode;

/// Configuration file structure for mural-slicer.
/// Loaded from ~/.config/mural-slicer/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub geometry: GeometrySection,
    #[serde(default)]
    pub slicing: SlicingSection,
    #[serde(default)]
    pub output: OutputSection,
}

/// Physical rig dimensions, all in meters.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeometrySection {
    pub pixel_size: f64,
    pub cable_separation: f64,
    pub dist_from_pulley: f64,
    pub offset: f64,
    pub nozzles: u32,
}

impl Default for GeometrySection {
    fn default() -> Self {
        Self {
            pixel_size: 0.002,
            cable_separation: 1.265,
            dist_from_pulley: 1.0,
            offset: 0.0,
            nozzles: 4,
        }
    }
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct SlicingSection {
    #[serde(default)]
    pub mode: SlicingMode,
    /// Explicit palette; derived from the image when absent.
    #[serde(default)]
    pub palette: Option<Vec<String>>,
    /// Resize the image to this many pixels wide before slicing.
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSection {
    pub path: PathBuf,
    pub preview: Option<PathBuf>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("gcode.txt"),
            preview: None,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("mural-slicer").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/mural-slicer/config.toml")
        })
}

/// Contents written by `mural-slicer config init`.
pub const DEFAULT_CONFIG: &str = r##"# mural-slicer configuration

[geometry]
# Edge length of one image pixel on the wall (m)
pixel_size = 0.002
# Distance between the two pulleys (m)
cable_separation = 1.265
# Distance from the pulleys down to the bottom of the mural (m)
dist_from_pulley = 1.0
# Shift of the image from the centre towards the left (m)
offset = 0.0
# Paint channels per stripe (1-9)
nozzles = 4

[slicing]
# position, mono-velocity, or multi-velocity
mode = "multi-velocity"
# Palette in index order; derived from the image when omitted
# palette = ["#ff0000", "#00ff00"]
# Resize the image to this width in pixels before slicing
# width = 300

[output]
# Instruction document
path = "gcode.txt"
# Render a PNG preview of the finished document
# preview = "preview.png"
"##;
