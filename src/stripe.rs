//! Per-column stripe encoding.
//!
//! A stripe is `num_nozzles` pixels wide and as tall as the image. Each row becomes a
//! string with one symbol per nozzle: a digit naming the paint to fire, or
//! [`NO_PAINT`] when the nozzle stays closed.

use crate::geometry::GeometryConfig;
use crate::palette::{hex_of, ColorIndexMap};
use image::{Rgba, RgbaImage};

/// Symbol for "nothing to paint here". Shared by out-of-bounds nozzles,
/// transparent pixels, and colors the run does not know about.
pub const NO_PAINT: char = 'x';

/// Symbol for the active color in a single-color sweep.
pub const ACTIVE_COLOR: char = '1';

/// How an opaque pixel turns into a symbol.
#[derive(Debug, Clone, Copy)]
pub enum SymbolRule<'a> {
    /// Multi-color pass: the pixel's palette digit. Pure black is never painted.
    Indexed(&'a ColorIndexMap),
    /// One sweep per color: [`ACTIVE_COLOR`] where the pixel matches `active`.
    SingleColor { active: &'a str },
}

/// One encoded column of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripe {
    pub column_index: u32,
    pub rows: Vec<String>,
}

impl Stripe {
    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }
}

/// A stripe plus the number of opaque pixels whose color had no index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStripe {
    pub stripe: Stripe,
    pub unmapped: usize,
}

/// Encode stripe `column_index` of `image`.
///
/// Unmapped colors are written as [`NO_PAINT`] and counted; they never fail the stripe.
pub fn encode_stripe(
    image: &RgbaImage,
    column_index: u32,
    rule: &SymbolRule<'_>,
    cfg: &GeometryConfig,
) -> EncodedStripe {
    let width = cfg.width.min(image.width());
    let col_start = cfg.column_start(column_index);
    let mut unmapped = 0;

    let rows = (0..image.height())
        .map(|y| {
            (0..cfg.num_nozzles)
                .map(|nozzle| {
                    let x = col_start + nozzle;
                    if x >= width {
                        return NO_PAINT;
                    }
                    symbol_for(image.get_pixel(x, y), rule, (x, y), &mut unmapped)
                })
                .collect::<String>()
        })
        .collect();

    EncodedStripe {
        stripe: Stripe { column_index, rows },
        unmapped,
    }
}

fn symbol_for(pixel: &Rgba<u8>, rule: &SymbolRule<'_>, at: (u32, u32), unmapped: &mut usize) -> char {
    let [r, g, b, a] = pixel.0;
    if a == 0 {
        return NO_PAINT;
    }

    match rule {
        SymbolRule::Indexed(map) => {
            if r == 0 && g == 0 && b == 0 {
                return NO_PAINT;
            }
            let hex = hex_of(pixel);
            match map.symbol_of(&hex) {
                Some(symbol) => symbol,
                None => {
                    log::debug!(
                        "Unrecognized color {} at ({}, {}); treating as transparent",
                        hex,
                        at.0,
                        at.1
                    );
                    *unmapped += 1;
                    NO_PAINT
                }
            }
        }
        SymbolRule::SingleColor { active } => {
            if hex_of(pixel) == *active {
                ACTIVE_COLOR
            } else {
                NO_PAINT
            }
        }
    }
}
