//! Subcommand handlers for slice, preview, palette, and config actions.

use std::path::{Path, PathBuf};

use super::args::{ConfigAction, SliceArgs};
use crate::config::{default_path as get_config_path, Config, DEFAULT_CONFIG};
use crate::error::{Error, Result};
use crate::geometry::GeometryConfig;
use crate::palette::Palette;
use crate::preview::{self, LogSummary, PngPreview};
use crate::slicing::{CompletionHook, RunSummary, Slicer, SlicingMode};
use crate::source;

/// Slice settings after applying CLI overrides on top of the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceSettings {
    pub mode: SlicingMode,
    pub palette: Option<Vec<String>>,
    pub pixel_size: f64,
    pub cable_separation: f64,
    pub dist_from_pulley: f64,
    pub offset: f64,
    pub nozzles: u32,
    pub resize: Option<u32>,
    pub output: PathBuf,
    pub preview: Option<PathBuf>,
}

impl SliceSettings {
    pub fn resolve(args: &SliceArgs, config: &Config) -> Self {
        Self {
            mode: args.mode.map(SlicingMode::from).unwrap_or(config.slicing.mode),
            palette: args
                .palette
                .clone()
                .or_else(|| config.slicing.palette.clone()),
            pixel_size: args.pixel_size.unwrap_or(config.geometry.pixel_size),
            cable_separation: args
                .cable_separation
                .unwrap_or(config.geometry.cable_separation),
            dist_from_pulley: args
                .dist_from_pulley
                .unwrap_or(config.geometry.dist_from_pulley),
            offset: args.offset.unwrap_or(config.geometry.offset),
            nozzles: args.nozzles.unwrap_or(config.geometry.nozzles),
            resize: args.resize.or(config.slicing.width),
            output: args
                .output
                .clone()
                .unwrap_or_else(|| config.output.path.clone()),
            preview: args.preview.clone().or_else(|| config.output.preview.clone()),
        }
    }

    /// Geometry for an image that is `width` pixels wide.
    pub fn geometry(&self, width: u32) -> GeometryConfig {
        GeometryConfig {
            pixel_size: self.pixel_size,
            cable_separation: self.cable_separation,
            dist_from_pulley: self.dist_from_pulley,
            offset: self.offset,
            width,
            num_nozzles: self.nozzles,
        }
    }
}

/// Run a full slice: load, optionally resize, slice to disk, then run completion hooks.
pub fn run_slice(args: &SliceArgs, config_path: Option<&Path>) -> Result<RunSummary> {
    let config = Config::load(config_path)?;
    let settings = SliceSettings::resolve(args, &config);

    let mut image = source::load_rgba(&args.image)?;
    if let Some(width) = settings.resize {
        image = source::resize_to_width(&image, width)?;
    }

    let palette = match &settings.palette {
        Some(colors) => Palette::new(colors)?,
        None => {
            let palette = Palette::from_image(&image)?;
            log::info!("Derived {} color(s) from the image", palette.len());
            palette
        }
    };

    let slicer = Slicer::new(settings.mode, settings.geometry(image.width()))?;

    let mut hooks: Vec<Box<dyn CompletionHook>> = vec![Box::new(LogSummary)];
    if let Some(preview) = &settings.preview {
        hooks.push(Box::new(PngPreview::new(preview.clone())));
    }

    let summary = slicer.slice_to_path(&image, &palette, &settings.output, &mut hooks)?;
    Ok(summary)
}

/// Render an existing document to a PNG.
pub fn run_preview(document: &Path, output: &Path) -> Result<()> {
    let parsed = preview::render_file(document, output)?;
    log::info!(
        "Rendered {} stripe(s) and {} position(s)",
        parsed.stripe_count(),
        parsed.positions.len()
    );
    Ok(())
}

/// Print the palette an image would be sliced with.
pub fn run_palette(image: &Path) -> Result<()> {
    let image = source::load_rgba(image)?;
    let palette = Palette::from_image(&image)?;

    println!("Colors ({}):", palette.len());
    for (i, color) in palette.iter().enumerate() {
        println!("  {} => {}", i + 1, color);
    }
    if palette.ensure_digit_encodable().is_err() {
        println!();
        println!("Too many colors for multi-velocity slicing; use --palette or mono-velocity.");
    }
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, config_path: Option<&Path>) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(&path))?;
            println!("Current configuration:");
            println!("  Pixel size: {} m", config.geometry.pixel_size);
            println!("  Cable separation: {} m", config.geometry.cable_separation);
            println!("  Distance from pulley: {} m", config.geometry.dist_from_pulley);
            println!("  Offset: {} m", config.geometry.offset);
            println!("  Nozzles: {}", config.geometry.nozzles);
            println!("  Mode: {}", config.slicing.mode.name());
            match &config.slicing.palette {
                Some(colors) => println!("  Palette: {}", colors.join(", ")),
                None => println!("  Palette: from image"),
            }
            match config.slicing.width {
                Some(width) => println!("  Resize width: {}", width),
                None => println!("  Resize width: none"),
            }
            println!("  Output: {}", config.output.path.display());
            match &config.output.preview {
                Some(p) => println!("  Preview: {}", p.display()),
                None => println!("  Preview: none"),
            }
            println!();

            if path.exists() {
                println!("Config file: {} (exists)", path.display());
            } else {
                println!("Config file: {} (not found)", path.display());
            }
        }
        ConfigAction::Init => {
            if path.exists() {
                return Err(Error::ConfigExists(path));
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| Error::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }

            std::fs::write(&path, DEFAULT_CONFIG).map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?;

            println!("Created config file: {}", path.display());
        }
    }
    Ok(())
}
