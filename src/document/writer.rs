//! Append-only writer for the instruction document.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::format::{self, format_float, round6};
use crate::geometry::CableLengths;
use crate::palette::ColorIndexMap;
use crate::slicing::SlicingMode;
use crate::stripe::Stripe;

/// Errors that can occur while writing the document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to create document '{}': {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode stripe pattern: {0}")]
    Pattern(#[from] serde_json::Error),

    #[error("the color mapping must be written before the slicing run begins")]
    MappingAfterBegin,

    #[error("the slicing run has already begun")]
    AlreadyBegun,

    #[error("the slicing run has not begun")]
    NotBegun,

    #[error("stripe column #{column} written after column #{previous}")]
    OutOfOrder { previous: u32, column: u32 },
}

/// Where a stripe starts and the cable lengths that put the carriage there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripeAnchor {
    /// Pixel x of the carriage; may be negative.
    pub x: i64,
    /// Pixel y of the stripe top, i.e. the image height.
    pub top: u32,
    pub lengths: CableLengths,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Open,
    Slicing(SlicingMode),
}

/// Owns the single output stream of a run.
///
/// Blocks are only ever appended. The color mapping is emitted at most once and
/// always before the run begins; stripe columns strictly increase within a sweep.
pub struct DocumentWriter<W: Write> {
    out: W,
    mapping_emitted: bool,
    state: RunState,
    last_column: Option<u32>,
}

impl DocumentWriter<BufWriter<File>> {
    /// Create (or truncate) the document at `path` and write the preamble.
    pub fn create(path: &Path) -> Result<Self, DocumentError> {
        let file = File::create(path).map_err(|source| DocumentError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Opened document {}", path.display());
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> DocumentWriter<W> {
    /// Wrap an output stream and write the preamble.
    pub fn new(mut out: W) -> Result<Self, DocumentError> {
        writeln!(out, "{}", format::PREAMBLE)?;
        writeln!(out, "\n")?;
        Ok(Self {
            out,
            mapping_emitted: false,
            state: RunState::Open,
            last_column: None,
        })
    }

    /// Whether the color mapping block has been written.
    pub fn mapping_emitted(&self) -> bool {
        self.mapping_emitted
    }

    /// Write the color mapping block on first call.
    ///
    /// Returns `true` if the block was written, `false` if it already had been.
    pub fn write_mapping(&mut self, map: &ColorIndexMap) -> Result<bool, DocumentError> {
        if self.mapping_emitted {
            return Ok(false);
        }
        if self.state != RunState::Open {
            return Err(DocumentError::MappingAfterBegin);
        }

        writeln!(self.out)?;
        writeln!(self.out, "{}", format::MAPPING_BEGIN)?;
        for (index, hex) in map.entries() {
            writeln!(
                self.out,
                "{}{}{}{}",
                format::MAPPING_ENTRY_PREFIX,
                index,
                format::MAPPING_ENTRY_SEPARATOR,
                hex
            )?;
        }
        writeln!(self.out, "{}", format::MAPPING_END)?;
        writeln!(self.out)?;
        self.mapping_emitted = true;
        Ok(true)
    }

    /// Write the run metadata and the begin marker. Allowed once.
    pub fn begin_run(
        &mut self,
        mode: SlicingMode,
        column_count: u32,
        cable_separation: f64,
    ) -> Result<(), DocumentError> {
        if self.state != RunState::Open {
            return Err(DocumentError::AlreadyBegun);
        }
        writeln!(self.out, "{}{}", format::COLUMN_COUNT_PREFIX, column_count)?;
        writeln!(
            self.out,
            "{}{}",
            format::PULLEY_SPACING_PREFIX,
            format_float(cable_separation)
        )?;
        writeln!(self.out, "{}", format::begin_marker(mode.marker_label()))?;
        self.state = RunState::Slicing(mode);
        Ok(())
    }

    /// Switch paint color. Starts a new sweep, so column numbering restarts.
    pub fn change_color(&mut self, hex: &str) -> Result<(), DocumentError> {
        self.ensure_slicing()?;
        writeln!(self.out, "{}{}", format::CHANGE_COLOR_PREFIX, hex)?;
        self.last_column = None;
        Ok(())
    }

    /// Append one stripe block.
    pub fn write_stripe(
        &mut self,
        stripe: &Stripe,
        anchor: &StripeAnchor,
        drop: f64,
    ) -> Result<(), DocumentError> {
        self.ensure_slicing()?;
        if let Some(previous) = self.last_column {
            if stripe.column_index <= previous {
                return Err(DocumentError::OutOfOrder {
                    previous,
                    column: stripe.column_index,
                });
            }
        }

        let pattern = format::format_pattern(&stripe.rows)?;
        writeln!(self.out, "{}{}", format::STRIPE_PREFIX, stripe.column_index)?;
        writeln!(
            self.out,
            "{}({},{}),({},0)",
            format::ANCHOR_PREFIX,
            anchor.x,
            anchor.top,
            anchor.x
        )?;
        writeln!(self.out, "{}{}", format::PATTERN_PREFIX, pattern)?;
        writeln!(self.out, "{}{}", format::DROP_PREFIX, format_float(drop))?;
        writeln!(
            self.out,
            "{}{},{}",
            format::PULLEY_VALUES_PREFIX,
            format_float(round6(anchor.lengths.a)),
            format_float(round6(anchor.lengths.b))
        )?;
        self.last_column = Some(stripe.column_index);
        Ok(())
    }

    /// Append one position-slicing line for pixel `(x, y)`, y counted from the bottom.
    pub fn write_position(
        &mut self,
        lengths: CableLengths,
        x: u32,
        y: u32,
        hex: &str,
    ) -> Result<(), DocumentError> {
        self.ensure_slicing()?;
        writeln!(
            self.out,
            "({},{}),({},{}),{}",
            format_float(lengths.a),
            format_float(lengths.b),
            x,
            y,
            hex
        )?;
        Ok(())
    }

    /// Write the end marker, flush, and hand back the underlying stream.
    pub fn end_run(mut self) -> Result<W, DocumentError> {
        let mode = match self.state {
            RunState::Slicing(mode) => mode,
            RunState::Open => return Err(DocumentError::NotBegun),
        };
        writeln!(self.out, "{}", format::end_marker(mode.marker_label()))?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn ensure_slicing(&self) -> Result<(), DocumentError> {
        match self.state {
            RunState::Slicing(_) => Ok(()),
            RunState::Open => Err(DocumentError::NotBegun),
        }
    }
}
