//! CLI enum types for slicing options.

use clap::ValueEnum;

use crate::slicing::SlicingMode;

/// How the image is turned into instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// One instruction per pixel, grouped by color
    Position,
    /// One stripe sweep per palette color
    MonoVelocity,
    /// A single sweep with indexed color digits
    #[default]
    MultiVelocity,
}

impl From<Mode> for SlicingMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Position => SlicingMode::Position,
            Mode::MonoVelocity => SlicingMode::MonoVelocity,
            Mode::MultiVelocity => SlicingMode::MultiVelocity,
        }
    }
}
