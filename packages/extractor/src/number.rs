//! Parsing of numeric table cells.
//!
//! Reports use a comma as decimal separator (`1,23`). Only the first comma
//! is treated as one.

use crate::types::Measurement;

/// Parse a table cell into a number.
///
/// Whole numbers become [`Measurement::Integer`] (exact up to the `i128`
/// range, larger ones are read as decimals), decimals
/// [`Measurement::Float`]. Anything else (`"< 0,5"`, `"n.n."`, empty cells)
/// yields `None`.
///
/// # Examples
/// ```
/// use lwg_extractor::number::parse_number;
/// use lwg_extractor::types::Measurement;
///
/// assert_eq!(parse_number("12"), Some(Measurement::Integer(12)));
/// assert_eq!(parse_number("1,23"), Some(Measurement::Float(1.23)));
/// assert_eq!(parse_number("n.n."), None);
/// ```
pub fn parse_number(token: &str) -> Option<Measurement> {
    let token = token.trim();

    if let Ok(value) = token.parse::<i128>() {
        return Some(Measurement::Integer(value));
    }

    let normalized = token.replacen(',', ".", 1);
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(Measurement::Float(value)),
        _ => {
            tracing::debug!(token, "Can't convert to numerical type");
            None
        }
    }
}
