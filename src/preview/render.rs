//! Painting a parsed document onto a canvas.

use image::{Rgb, RgbImage};

use super::parse::ParsedDocument;
use super::PreviewError;
use crate::palette::parse_hex_rgb;
use crate::stripe::NO_PAINT;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Largest canvas side, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// Render every sweep and position of `doc` onto a white canvas.
///
/// Stripe `c` occupies pixel columns `c * width .. (c + 1) * width`, so the
/// dropped remainder columns of the source image stay white. Symbols with no
/// known color are left white as well.
pub fn render(doc: &ParsedDocument) -> Result<RgbImage, PreviewError> {
    let stripe_width = doc
        .sweeps
        .iter()
        .flat_map(|s| s.stripes.iter())
        .flat_map(|s| s.rows.iter())
        .map(|row| row.chars().count() as u64)
        .max()
        .unwrap_or(0);

    let mut width: u64 = 0;
    let mut height: u64 = 0;
    for stripe in doc.sweeps.iter().flat_map(|s| s.stripes.iter()) {
        width = width.max((u64::from(stripe.column_index) + 1).saturating_mul(stripe_width));
        height = height.max(stripe.rows.len() as u64);
    }
    for position in &doc.positions {
        width = width.max(u64::from(position.x) + 1);
        height = height.max(u64::from(position.y) + 1);
    }
    if width == 0 || height == 0 {
        return Err(PreviewError::Empty);
    }
    if width > u64::from(MAX_DIMENSION) || height > u64::from(MAX_DIMENSION) {
        return Err(PreviewError::TooLarge {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }
    // Every coordinate below is now under MAX_DIMENSION.
    let (width, height) = (width as u32, height as u32);
    let stripe_width = stripe_width as u32;

    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

    for sweep in &doc.sweeps {
        let sweep_color = sweep.color.as_deref().and_then(parse_hex_rgb);
        for stripe in &sweep.stripes {
            let x0 = stripe.column_index * stripe_width;
            for (y, row) in stripe.rows.iter().enumerate() {
                for (dx, symbol) in row.chars().enumerate() {
                    if symbol == NO_PAINT {
                        continue;
                    }
                    let rgb = match sweep_color {
                        Some(rgb) => Some(rgb),
                        None => doc.mapping.get(&symbol).and_then(|hex| parse_hex_rgb(hex)),
                    };
                    if let Some(rgb) = rgb {
                        canvas.put_pixel(x0 + dx as u32, y as u32, Rgb(rgb));
                    }
                }
            }
        }
    }

    for position in &doc.positions {
        if let Some(rgb) = parse_hex_rgb(&position.color) {
            canvas.put_pixel(position.x, height - 1 - position.y, Rgb(rgb));
        }
    }

    Ok(canvas)
}
