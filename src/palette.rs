//! Palette handling and the run-wide color → index mapping.

use image::{Rgba, RgbaImage};
use std::collections::{HashMap, HashSet};

/// Largest palette that still encodes as one decimal digit per nozzle.
pub const MAX_INDEXED_COLORS: usize = 9;

/// Errors that can occur while building a palette.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaletteError {
    #[error("palette is empty, there is nothing to paint")]
    Empty,

    #[error("'{0}' is not a #rrggbb hex color")]
    InvalidHex(String),

    #[error("palette has {count} colors but multi-color slicing supports at most {max}")]
    TooManyColors { count: usize, max: usize },
}

/// Ordered, deduplicated list of lowercase `#rrggbb` colors.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Build a palette from hex strings, dropping case-insensitive duplicates.
    pub fn new<I, S>(colors: I) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for color in colors {
            let hex = normalize_hex(color.as_ref())?;
            if seen.insert(hex.clone()) {
                unique.push(hex);
            }
        }
        if unique.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self { colors: unique })
    }

    /// Parse a comma or whitespace separated list such as `"#ff0000, 00ff00"`.
    pub fn parse(list: &str) -> Result<Self, PaletteError> {
        Self::new(
            list.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty()),
        )
    }

    /// Every distinct opaque color of `image`, in row-major order of first appearance.
    pub fn from_image(image: &RgbaImage) -> Result<Self, PaletteError> {
        Self::new(
            image
                .pixels()
                .filter(|p| p.0[3] != 0)
                .map(hex_of),
        )
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.colors.iter().map(String::as_str)
    }

    /// Fail when the palette is too large for single-digit indices.
    pub fn ensure_digit_encodable(&self) -> Result<(), PaletteError> {
        if self.colors.len() > MAX_INDEXED_COLORS {
            return Err(PaletteError::TooManyColors {
                count: self.colors.len(),
                max: MAX_INDEXED_COLORS,
            });
        }
        Ok(())
    }
}

/// Stable 1-based index for every palette color, keyed by lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorIndexMap {
    ordered: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl ColorIndexMap {
    /// Assign `i + 1` to `palette[i]`.
    pub fn build(palette: &Palette) -> Self {
        let ordered = palette.colors().to_vec();
        let lookup = ordered
            .iter()
            .enumerate()
            .map(|(i, hex)| (hex.clone(), i + 1))
            .collect();
        Self { ordered, lookup }
    }

    pub fn index_of(&self, hex: &str) -> Option<usize> {
        self.lookup.get(hex).copied()
    }

    /// The digit written into stripe rows for `hex`, if it has one.
    pub fn symbol_of(&self, hex: &str) -> Option<char> {
        self.index_of(hex)
            .and_then(|i| char::from_digit(i as u32, 10))
    }

    /// `(index, hex)` pairs in index order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> {
        self.ordered
            .iter()
            .enumerate()
            .map(|(i, hex)| (i + 1, hex.as_str()))
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Lowercase `#rrggbb` for the color channels of a pixel. Alpha is ignored.
pub fn hex_of(pixel: &Rgba<u8>) -> String {
    let [r, g, b, _] = pixel.0;
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Accept `#rrggbb` or `rrggbb` in any case and return the lowercase `#rrggbb` form.
pub fn normalize_hex(input: &str) -> Result<String, PaletteError> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(PaletteError::InvalidHex(input.to_string()));
    }
    Ok(format!("#{}", digits.to_ascii_lowercase()))
}

/// Parse `#rrggbb` into its channels.
pub fn parse_hex_rgb(hex: &str) -> Option<[u8; 3]> {
    let normalized = normalize_hex(hex).ok()?;
    let channel = |i: usize| u8::from_str_radix(&normalized[i..i + 2], 16).ok();
    Some([channel(1)?, channel(3)?, channel(5)?])
}
