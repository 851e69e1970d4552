//! Field scanner for pressure files.
//!
//! Lines look like:
//!
//! ```text
//! some avg10=0.00 avg60=0.12 avg300=0.05 total=123456
//! full avg10=0.00 avg60=0.00 avg300=0.00 total=7890
//! ```
//!
//! Only the leading mode token and the `avg60`, `avg300`, and `total` fields
//! are consumed; other fields may appear in any order.

use tracing::{debug, warn};

use crate::data::{Mode, Resource, ResourceSample, Sample};
use crate::error::ReadError;

/// A line that matched the schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureLine<'a> {
    /// Leading token, not yet checked against the known modes.
    pub token: &'a str,
    pub sample: Sample,
}

/// Scan one line. Returns `None` if any required field is missing or invalid.
pub fn parse_line(line: &str) -> Option<PressureLine<'_>> {
    let mut fields = line.split_whitespace();
    let token = fields.next()?;
    if token.contains('=') {
        return None;
    }

    let (mut avg60, mut avg300, mut total) = (None, None, None);
    for field in fields {
        let Some((key, value)) = field.split_once('=') else {
            continue;
        };
        match key {
            "avg60" => avg60 = parse_percent(value),
            "avg300" => avg300 = parse_percent(value),
            "total" => total = value.parse::<u64>().ok(),
            _ => {}
        }
    }

    Some(PressureLine {
        token,
        sample: Sample {
            total_micros: total?,
            avg60: avg60?,
            avg300: avg300?,
        },
    })
}

/// Accept only the kernel's `digits.digits` form, so `inf`, `NaN`, signs
/// and exponents never reach the history.
fn parse_percent(value: &str) -> Option<f64> {
    let (whole, frac) = value.split_once('.')?;
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !is_digits(frac) {
        return None;
    }
    value.parse().ok()
}

/// Parse a whole pressure file for `resource`.
///
/// Both `full` and `some` must be present; `path` is only used in errors.
pub fn parse_pressure(
    resource: Resource,
    path: &str,
    document: &str,
) -> Result<ResourceSample, ReadError> {
    let mut full = None;
    let mut some = None;

    for line in document.lines() {
        let Some(parsed) = parse_line(line) else {
            debug!(resource = %resource, line, "skipping unmatched pressure line");
            continue;
        };
        let slot = match Mode::from_token(parsed.token) {
            Some(Mode::Full) => &mut full,
            Some(Mode::Some) => &mut some,
            None => continue,
        };
        if slot.is_some() {
            warn!(resource = %resource, line, "ignoring duplicate pressure line");
            continue;
        }
        *slot = Some(parsed.sample);
    }

    let full = full.ok_or_else(|| ReadError::SchemaMismatch {
        path: path.to_string(),
        missing: Mode::Full,
    })?;
    let some = some.ok_or_else(|| ReadError::SchemaMismatch {
        path: path.to_string(),
        missing: Mode::Some,
    })?;

    Ok(ResourceSample {
        resource,
        full,
        some,
    })
}
