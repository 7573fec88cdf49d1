//! Unit-aware numeric extraction for metadata values.
//!
//! Metadata values look like `12.5 mm` or `1126.972 MPa`. The number is
//! recovered by keeping every digit, dot and minus sign of the string in
//! order, and the unit is whatever is left once the number's text form is
//! removed. Both steps are lossy for unusual inputs (`12.5-3`, `007 mm`,
//! `1.000e-02 1/s`); callers rely on the exact behaviour, so it is kept.

use std::num::ParseFloatError;

/// Extracts the number embedded in a metadata value.
///
/// Returns `Ok(None)` when the value does not start with a digit (a minus
/// sign directly followed by a digit also counts as a numeric start).
/// Otherwise all ASCII digits, dots and minus signs are concatenated in
/// order and parsed; a concatenation that is not a valid float is an
/// error.
pub fn extract_numeric_value(value: &str) -> Result<Option<f64>, ParseFloatError> {
    let mut chars = value.chars();
    let numeric_start = match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    };
    if !numeric_start {
        return Ok(None);
    }

    let digits: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    digits.parse::<f64>().map(Some)
}

/// Removes the number's text form from `raw` and returns the trimmed rest.
///
/// With no number the whole trimmed value is the "unit", which is how
/// text metadata such as specimen names travels through the table.
pub fn split_unit(raw: &str, number: Option<f64>) -> String {
    match number {
        Some(v) => raw.replace(&float_repr(v), "").trim().to_string(),
        None => raw.trim().to_string(),
    }
}

/// Canonical text form of a float: shortest round-trip digits, integral
/// values keep a trailing `.0`, and magnitudes outside `1e-4..1e16` use a
/// two-digit signed exponent (`1e-05`, `1.5e+20`).
pub fn float_repr(v: f64) -> String {
    if !v.is_finite() {
        return if v.is_nan() {
            "nan".to_string()
        } else if v > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }

    let sci = format!("{:e}", v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if v != 0.0 && !(-4..16).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exp.abs());
    }

    let plain = format!("{}", v);
    if plain.contains('.') {
        plain
    } else {
        format!("{}.0", plain)
    }
}
