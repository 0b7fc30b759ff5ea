//! Preview of a finished instruction document.
//!
//! The document is read back exactly as the rig would receive it and painted to a
//! PNG, so the preview shows what will be painted rather than what was sliced.
//!
//! # Structure
//!
//! - [`parse`] - document text → mapping, stripes, and positions
//! - [`render`] - parsed document → RGB canvas

pub mod parse;
pub mod render;

use std::path::{Path, PathBuf};

use crate::slicing::{CompletionHook, RunSummary};

pub use parse::{parse_document, ParsedDocument};

/// Errors that can occur while building a preview.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("Failed to read document '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("No stripe or position data found")]
    Empty,

    #[error("Preview would be {width}x{height} pixels; the limit is {max} per side")]
    TooLarge { width: u64, height: u64, max: u32 },

    #[error("Failed to write preview image: {0}")]
    Image(#[from] image::ImageError),
}

/// Read the document at `document`, render it, and save the PNG at `output`.
pub fn render_file(document: &Path, output: &Path) -> Result<ParsedDocument, PreviewError> {
    let text = std::fs::read_to_string(document).map_err(|source| PreviewError::Read {
        path: document.to_path_buf(),
        source,
    })?;
    let parsed = parse_document(&text)?;

    if !parsed.mapping.is_empty() {
        log::info!("Color Index Mapping:");
        for (symbol, hex) in &parsed.mapping {
            log::info!("  Index {} => {}", symbol, hex);
        }
    }

    let canvas = render::render(&parsed)?;
    canvas.save(output)?;
    log::info!(
        "Preview ({}x{}) saved to {}",
        canvas.width(),
        canvas.height(),
        output.display()
    );
    Ok(parsed)
}

/// Logs the run summary once slicing is done.
#[derive(Debug, Default)]
pub struct LogSummary;

impl CompletionHook for LogSummary {
    fn on_complete(
        &mut self,
        summary: &RunSummary,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        log::info!(
            "{} slicing complete: {} column(s), {} sweep(s), {} stripe(s), {} position(s)",
            summary.mode,
            summary.columns,
            summary.sweeps,
            summary.stripes,
            summary.positions
        );
        Ok(())
    }
}

/// Renders the finished document to a PNG.
#[derive(Debug)]
pub struct PngPreview {
    output: PathBuf,
}

impl PngPreview {
    pub fn new(output: PathBuf) -> Self {
        Self { output }
    }
}

impl CompletionHook for PngPreview {
    fn on_complete(
        &mut self,
        summary: &RunSummary,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match &summary.output {
            Some(document) => {
                render_file(document, &self.output)?;
            }
            None => log::warn!("No document on disk; skipping preview"),
        }
        Ok(())
    }
}
