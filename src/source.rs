//! Loading the processed image that a run slices.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading the source image.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to open image '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image '{}' has no pixels", .path.display())]
    Empty { path: PathBuf },

    #[error("cannot resize to a width of 0 pixels")]
    ZeroWidth,
}

/// Load an image from disk as 8-bit RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, SourceError> {
    let img = image::open(path)
        .map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgba8();
    if img.width() == 0 || img.height() == 0 {
        return Err(SourceError::Empty {
            path: path.to_path_buf(),
        });
    }
    log::debug!(
        "Loaded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(img)
}

/// Scale to `width` pixels wide, keeping the aspect ratio.
///
/// Nearest-neighbour sampling keeps the palette intact: no new colors appear.
pub fn resize_to_width(image: &RgbaImage, width: u32) -> Result<RgbaImage, SourceError> {
    if width == 0 {
        return Err(SourceError::ZeroWidth);
    }
    if image.width() == width {
        return Ok(image.clone());
    }
    let ratio = width as f64 / image.width() as f64;
    let height = ((image.height() as f64 * ratio).round() as u32).max(1);
    log::info!(
        "Resizing image from {}x{} to {}x{}",
        image.width(),
        image.height(),
        width,
        height
    );
    Ok(imageops::resize(image, width, height, FilterType::Nearest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use image::Rgba;

    #[test]
    fn test_resize_keeps_aspect_ratio() {
        let img = RgbaImage::from_pixel(40, 20, Rgba([1, 2, 3, 255]));
        let resized = resize_to_width(&img, 10).unwrap();
        assert_eq!(resized.dimensions(), (10, 5));
    }

    #[test]
    fn test_resize_introduces_no_new_colors() {
        let mut img = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]));
        for y in 0..8 {
            for x in 4..8 {
                img.put_pixel(x, y, Rgba([0, 0, 255, 255]));
            }
        }
        let resized = resize_to_width(&img, 5).unwrap();
        let palette = Palette::from_image(&resized).unwrap();
        assert!(palette.iter().all(|c| c == "#ff0000" || c == "#0000ff"));
    }

    #[test]
    fn test_resize_rejects_zero_width() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        assert!(matches!(resize_to_width(&img, 0), Err(SourceError::ZeroWidth)));
    }

    #[test]
    fn test_load_round_trip_and_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mural.png");
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let loaded = load_rgba(&path).unwrap();
        assert_eq!(loaded.dimensions(), (3, 2));
        assert_eq!(loaded.get_pixel(2, 1), &Rgba([10, 20, 30, 255]));

        let err = load_rgba(&dir.path().join("missing.png")).unwrap_err();
        assert!(err.to_string().contains("missing.png"));
    }
}
