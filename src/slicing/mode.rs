//! Slicing strategies.

use serde::{Deserialize, Serialize};

/// The three mutually exclusive ways of turning an image into instructions.
///
/// Chosen once per run from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlicingMode {
    /// One instruction line per opaque pixel, grouped by color.
    Position,
    /// One full stripe sweep per palette color.
    MonoVelocity,
    /// A single stripe sweep whose rows carry palette digits.
    #[default]
    MultiVelocity,
}

impl SlicingMode {
    /// Label used in the `BEGIN ... SLICING` / `END ... SLICING` markers.
    pub fn marker_label(&self) -> &'static str {
        match self {
            SlicingMode::Position => "POSITION",
            SlicingMode::MonoVelocity => "MONO-COLOR VELOCITY",
            SlicingMode::MultiVelocity => "MULTI-COLOR VELOCITY",
        }
    }

    /// Human-readable name, matching the config file spelling.
    pub fn name(&self) -> &'static str {
        match self {
            SlicingMode::Position => "position",
            SlicingMode::MonoVelocity => "mono-velocity",
            SlicingMode::MultiVelocity => "multi-velocity",
        }
    }

    /// Whether stripe rows carry palette digits, which caps the palette at nine colors.
    pub fn uses_index_digits(&self) -> bool {
        matches!(self, SlicingMode::MultiVelocity)
    }
}

impl std::fmt::Display for SlicingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
