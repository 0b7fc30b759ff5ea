//! Line vocabulary of the instruction document.
//!
//! Shared by the writer and the preview parser so both sides agree on the grammar.

pub const PREAMBLE: &str = "//this is the start of the gcode";
pub const MAPPING_BEGIN: &str = "-- MULTI-COLOR INDEX MAPPING --";
pub const MAPPING_END: &str = "-- END OF COLOR MAPPING --";
pub const COLUMN_COUNT_PREFIX: &str = "number of drawn columns = ";
pub const PULLEY_SPACING_PREFIX: &str = "pulley spacing = ";
pub const CHANGE_COLOR_PREFIX: &str = "change color to:";
pub const STRIPE_PREFIX: &str = "STRIPE - column #";
pub const ANCHOR_PREFIX: &str = "starting/ending position pixel values:  ";
pub const PATTERN_PREFIX: &str = "pattern: ";
pub const DROP_PREFIX: &str = "drop: ";
pub const PULLEY_VALUES_PREFIX: &str = "starting pulley values:  ";
pub const MAPPING_ENTRY_PREFIX: &str = "Index ";
pub const MAPPING_ENTRY_SEPARATOR: &str = " => ";

/// `BEGIN <label> SLICING`
pub fn begin_marker(label: &str) -> String {
    format!("BEGIN {} SLICING", label)
}

/// `END <label> SLICING`
pub fn end_marker(label: &str) -> String {
    format!("END {} SLICING", label)
}

/// Shortest round-trip decimal, always with a fractional part (`1.0`, `0.004`).
pub fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// Round half away from zero to 6 decimal places.
pub fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// `["r0", "r1", ...]` with each row JSON-encoded.
pub fn format_pattern(rows: &[String]) -> Result<String, serde_json::Error> {
    let encoded = rows
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("[{}]", encoded.join(", ")))
}
