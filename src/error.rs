//! Top-level error type for the command-line entry points.

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::palette::PaletteError;
use crate::preview::PreviewError;
use crate::slicing::SliceError;
use crate::source::SourceError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Invalid palette: {0}")]
    Palette(#[from] PaletteError),

    #[error(transparent)]
    Slice(#[from] SliceError),

    #[error(transparent)]
    Preview(#[from] PreviewError),

    #[error("Config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("Failed to write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
