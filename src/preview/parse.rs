//! Reading a finished document back into stripes, positions, and the color mapping.

use std::collections::BTreeMap;

use super::PreviewError;
use crate::document::format;
use crate::palette::normalize_hex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStripe {
    pub column_index: u32,
    pub rows: Vec<String>,
}

/// Stripes written under one paint color, or under the index mapping when `color` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSweep {
    pub color: Option<String>,
    pub stripes: Vec<ParsedStripe>,
}

/// One position-slicing pixel; `y` counts from the bottom of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPosition {
    pub x: u32,
    pub y: u32,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Stripe symbol → `#rrggbb`.
    pub mapping: BTreeMap<char, String>,
    pub column_count: Option<u32>,
    pub sweeps: Vec<ParsedSweep>,
    pub positions: Vec<ParsedPosition>,
}

impl ParsedDocument {
    pub fn stripe_count(&self) -> usize {
        self.sweeps.iter().map(|s| s.stripes.len()).sum()
    }
}

/// Parse the text of an instruction document.
///
/// Lines the preview has no use for (pulley values, drops, markers) are skipped.
pub fn parse_document(text: &str) -> Result<ParsedDocument, PreviewError> {
    let mut doc = ParsedDocument::default();
    let mut in_mapping = false;
    let mut pending_column: Option<u32> = None;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        let fail = |message: String| PreviewError::Parse {
            line: line_no,
            message,
        };

        if line == format::MAPPING_BEGIN {
            in_mapping = true;
            continue;
        }
        if line == format::MAPPING_END {
            in_mapping = false;
            continue;
        }
        if in_mapping {
            if line.is_empty() {
                continue;
            }
            let (symbol, hex) = parse_mapping_entry(line).ok_or_else(|| {
                fail(format!("malformed mapping entry '{}'", line))
            })?;
            doc.mapping.insert(symbol, hex);
            continue;
        }

        if let Some(rest) = line.strip_prefix(format::COLUMN_COUNT_PREFIX) {
            let count = rest
                .trim()
                .parse()
                .map_err(|_| fail(format!("bad column count '{}'", rest)))?;
            doc.column_count = Some(count);
        } else if let Some(rest) = line.strip_prefix(format::CHANGE_COLOR_PREFIX) {
            let hex = normalize_hex(rest).map_err(|e| fail(e.to_string()))?;
            doc.sweeps.push(ParsedSweep {
                color: Some(hex),
                stripes: Vec::new(),
            });
        } else if let Some(rest) = line.strip_prefix(format::STRIPE_PREFIX) {
            let column = rest
                .trim()
                .parse()
                .map_err(|_| fail(format!("bad stripe column '{}'", rest)))?;
            pending_column = Some(column);
        } else if let Some(rest) = line.strip_prefix(format::PATTERN_PREFIX) {
            let column_index = pending_column
                .take()
                .ok_or_else(|| fail("pattern outside a stripe block".to_string()))?;
            let rows: Vec<String> =
                serde_json::from_str(rest).map_err(|e| fail(format!("bad pattern: {}", e)))?;
            if doc.sweeps.is_empty() {
                doc.sweeps.push(ParsedSweep {
                    color: None,
                    stripes: Vec::new(),
                });
            }
            if let Some(sweep) = doc.sweeps.last_mut() {
                sweep.stripes.push(ParsedStripe { column_index, rows });
            }
        } else if line.starts_with('(') {
            let position = parse_position(line)
                .ok_or_else(|| fail(format!("malformed position line '{}'", line)))?;
            doc.positions.push(position);
        }
    }

    Ok(doc)
}

/// `Index 2 => #00ff00`
fn parse_mapping_entry(line: &str) -> Option<(char, String)> {
    let rest = line.strip_prefix(format::MAPPING_ENTRY_PREFIX)?;
    let (index, hex) = rest.split_once(format::MAPPING_ENTRY_SEPARATOR.trim())?;
    let mut chars = index.trim().chars();
    let symbol = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some((symbol, normalize_hex(hex).ok()?))
}

/// `(<lenA>,<lenB>),(<x>,<y>),<hex>`
fn parse_position(line: &str) -> Option<ParsedPosition> {
    let (_, rest) = line.split_once("),(")?;
    let (coords, hex) = rest.split_once("),")?;
    let (x, y) = coords.split_once(',')?;
    Some(ParsedPosition {
        x: x.trim().parse().ok()?,
        y: y.trim().parse().ok()?,
        color: normalize_hex(hex).ok()?,
    })
}
