//! Line framing of feature vectors for the downstream classifier.
//!
//! One record per cycle: `AI_INPUT:` followed by every feature printed with
//! two decimals and terminated by a comma, then a newline:
//!
//! ```text
//! AI_INPUT:1.23,-4.56,0.00,\n
//! ```

use crate::error::WireError;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Marker token that opens every record
pub const WIRE_MARKER: &str = "AI_INPUT:";

/// Decimal places of every field
pub const WIRE_PRECISION: usize = 2;

/// Encode `values` as one newline-terminated record
pub fn encode_line(values: &[f64]) -> String {
    // marker + ~8 chars per field + newline
    let mut line = String::with_capacity(WIRE_MARKER.len() + values.len() * 8 + 1);
    line.push_str(WIRE_MARKER);
    for &value in values {
        // -0.0 prints as 0.00
        let value = if value == 0.0 { 0.0 } else { value };
        let _ = write!(line, "{:.*},", WIRE_PRECISION, value);
    }
    line.push('\n');
    line
}

/// Write one record to `writer`
pub fn write_line<W: Write>(writer: &mut W, values: &[f64]) -> io::Result<()> {
    writer.write_all(encode_line(values).as_bytes())
}

/// Decode a record produced by [`encode_line`].
///
/// The trailing newline (`\n` or `\r\n`) is optional.
pub fn parse_line(line: &str) -> Result<Vec<f64>, WireError> {
    let line = line.trim_end_matches(['\n', '\r']);
    let body = line
        .strip_prefix(WIRE_MARKER)
        .ok_or(WireError::MissingMarker(WIRE_MARKER))?;

    if body.is_empty() {
        return Ok(Vec::new());
    }
    let body = body.strip_suffix(',').ok_or(WireError::Unterminated)?;

    body.split(',')
        .enumerate()
        .map(|(index, field)| {
            field.parse::<f64>().map_err(|_| WireError::InvalidField {
                index,
                field: field.to_string(),
            })
        })
        .collect()
}
