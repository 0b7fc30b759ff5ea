//! The slicing run itself.

use std::io::Write;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use super::SlicingMode;
use crate::document::{DocumentError, DocumentWriter, StripeAnchor};
use crate::geometry::{cable_lengths, GeometryConfig, GeometryError};
use crate::palette::{hex_of, ColorIndexMap, Palette, PaletteError};
use crate::stripe::{encode_stripe, SymbolRule};

/// Errors that abort a slicing run.
#[derive(Debug, thiserror::Error)]
pub enum SliceError {
    #[error("Invalid geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Invalid palette: {0}")]
    Palette(#[from] PaletteError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("image is {image} pixels wide but the geometry describes {geometry} pixels")]
    WidthMismatch { image: u32, geometry: u32 },

    #[error("Completion step failed: {0}")]
    Hook(Box<dyn std::error::Error + Send + Sync>),
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: SlicingMode,
    /// Document path, when the run wrote to a file.
    pub output: Option<PathBuf>,
    /// Value of the `number of drawn columns` header.
    pub columns: u32,
    /// Full passes over the image.
    pub sweeps: usize,
    pub stripes: usize,
    pub positions: usize,
    /// Opaque pixels written as blank because their color had no index.
    pub unmapped_pixels: usize,
}

impl RunSummary {
    fn new(mode: SlicingMode, columns: u32) -> Self {
        Self {
            mode,
            output: None,
            columns,
            sweeps: 0,
            stripes: 0,
            positions: 0,
            unmapped_pixels: 0,
        }
    }
}

/// Downstream stage run once a document is complete (preview, logging, ...).
pub trait CompletionHook {
    fn on_complete(
        &mut self,
        summary: &RunSummary,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl CompletionHook for Vec<Box<dyn CompletionHook>> {
    fn on_complete(
        &mut self,
        summary: &RunSummary,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        for hook in self.iter_mut() {
            hook.on_complete(summary)?;
        }
        Ok(())
    }
}

/// Turns one processed image into one instruction document.
#[derive(Debug, Clone)]
pub struct Slicer {
    mode: SlicingMode,
    geometry: GeometryConfig,
}

impl Slicer {
    /// Create a slicer, rejecting infeasible geometry up front.
    pub fn new(mode: SlicingMode, geometry: GeometryConfig) -> Result<Self, SliceError> {
        geometry.validate()?;
        Ok(Self { mode, geometry })
    }

    pub fn mode(&self) -> SlicingMode {
        self.mode
    }

    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    /// Everything that can be rejected before a single byte is written.
    pub fn check_inputs(&self, image: &RgbaImage, palette: &Palette) -> Result<(), SliceError> {
        if image.width() != self.geometry.width {
            return Err(SliceError::WidthMismatch {
                image: image.width(),
                geometry: self.geometry.width,
            });
        }
        if self.mode.uses_index_digits() {
            palette.ensure_digit_encodable()?;
        }
        Ok(())
    }

    /// Slice into an already opened document and finish it.
    ///
    /// Returns the underlying stream together with the run summary.
    pub fn run<W: Write>(
        &self,
        image: &RgbaImage,
        palette: &Palette,
        mut writer: DocumentWriter<W>,
    ) -> Result<(W, RunSummary), SliceError> {
        self.check_inputs(image, palette)?;
        log::info!(
            "Slicing {}x{} image in {} mode with {} color(s)",
            image.width(),
            image.height(),
            self.mode,
            palette.len()
        );

        let summary = match self.mode {
            SlicingMode::Position => self.slice_positions(image, palette, &mut writer)?,
            SlicingMode::MonoVelocity => self.slice_mono_velocity(image, palette, &mut writer)?,
            SlicingMode::MultiVelocity => self.slice_multi_velocity(image, palette, &mut writer)?,
        };

        let out = writer.end_run()?;
        if summary.unmapped_pixels > 0 {
            log::warn!(
                "{} opaque pixel(s) had colors outside the palette and were left blank",
                summary.unmapped_pixels
            );
        }
        Ok((out, summary))
    }

    /// Create the document at `path`, slice into it, and run `hook` on the result.
    ///
    /// Inputs are checked before the file is touched. On a mid-run failure the
    /// blocks already written stay on disk.
    pub fn slice_to_path(
        &self,
        image: &RgbaImage,
        palette: &Palette,
        path: &Path,
        hook: &mut dyn CompletionHook,
    ) -> Result<RunSummary, SliceError> {
        self.check_inputs(image, palette)?;
        let writer = DocumentWriter::create(path)?;
        let (_, mut summary) = self.run(image, palette, writer)?;
        summary.output = Some(path.to_path_buf());
        log::info!(
            "Wrote {} stripe(s) and {} position(s) to {}",
            summary.stripes,
            summary.positions,
            path.display()
        );

        hook.on_complete(&summary).map_err(SliceError::Hook)?;
        Ok(summary)
    }

    fn slice_positions<W: Write>(
        &self,
        image: &RgbaImage,
        palette: &Palette,
        writer: &mut DocumentWriter<W>,
    ) -> Result<RunSummary, SliceError> {
        let (width, height) = image.dimensions();
        let mut summary = RunSummary::new(self.mode, width);
        writer.begin_run(self.mode, width, self.geometry.cable_separation)?;

        for color in palette.iter() {
            writer.change_color(color)?;
            for x in 0..width {
                for y in 0..height {
                    let pixel = image.get_pixel(x, y);
                    if pixel.0[3] == 0 || hex_of(pixel) != color {
                        continue;
                    }
                    let y_flipped = height - 1 - y;
                    let lengths = cable_lengths(i64::from(x), i64::from(y_flipped), &self.geometry);
                    writer.write_position(lengths, x, y_flipped, color)?;
                    summary.positions += 1;
                }
            }
            summary.sweeps += 1;
            log::debug!("Position sweep for {} done", color);
        }
        Ok(summary)
    }

    fn slice_mono_velocity<W: Write>(
        &self,
        image: &RgbaImage,
        palette: &Palette,
        writer: &mut DocumentWriter<W>,
    ) -> Result<RunSummary, SliceError> {
        let columns = self.geometry.column_count();
        let mut summary = RunSummary::new(self.mode, columns);
        writer.begin_run(self.mode, columns, self.geometry.cable_separation)?;

        for color in palette.iter() {
            writer.change_color(color)?;
            self.sweep(image, &SymbolRule::SingleColor { active: color }, writer, &mut summary)?;
            log::debug!("Stripe sweep for {} done", color);
        }
        Ok(summary)
    }

    fn slice_multi_velocity<W: Write>(
        &self,
        image: &RgbaImage,
        palette: &Palette,
        writer: &mut DocumentWriter<W>,
    ) -> Result<RunSummary, SliceError> {
        let map = ColorIndexMap::build(palette);
        writer.write_mapping(&map)?;

        let columns = self.geometry.column_count();
        let mut summary = RunSummary::new(self.mode, columns);
        writer.begin_run(self.mode, columns, self.geometry.cable_separation)?;
        self.sweep(image, &SymbolRule::Indexed(&map), writer, &mut summary)?;
        Ok(summary)
    }

    fn sweep<W: Write>(
        &self,
        image: &RgbaImage,
        rule: &SymbolRule<'_>,
        writer: &mut DocumentWriter<W>,
        summary: &mut RunSummary,
    ) -> Result<(), SliceError> {
        let height = image.height();
        let drop = self.geometry.drop(height);

        for column in 0..self.geometry.column_count() {
            let encoded = encode_stripe(image, column, rule, &self.geometry);
            let x = self.geometry.stripe_anchor_x(column);
            let anchor = StripeAnchor {
                x,
                top: height,
                lengths: cable_lengths(x, i64::from(height), &self.geometry),
            };
            writer.write_stripe(&encoded.stripe, &anchor, drop)?;
            summary.stripes += 1;
            summary.unmapped_pixels += encoded.unmapped;
        }
        summary.sweeps += 1;
        Ok(())
    }
}
