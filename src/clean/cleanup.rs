//! Positional cleanup of the numeric and date fields of one record

use super::number::{parse_number_or_empty, round_to, stringify};

/// Cleaned numeric/date fields. Every field is either a normalized value or
/// the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedFields {
    pub lat: String,
    pub lon: String,
    pub precision: String,
    pub year: String,
    pub month: String,
    pub day: String,
}

/// Parse and normalize the numeric fields of a record.
///
/// Coordinates and precision are rounded to `digits` places; year, month
/// and day are rendered as plain integers. Sources without a day column
/// pass `None`.
pub fn cleanup_data(
    digits: usize,
    lat: &str,
    lon: &str,
    precision: &str,
    year: &str,
    month: &str,
    day: Option<&str>,
) -> CleanedFields {
    CleanedFields {
        lat: round_to(digits, parse_number_or_empty(lat)),
        lon: round_to(digits, parse_number_or_empty(lon)),
        precision: round_to(digits, parse_number_or_empty(precision)),
        year: stringify(parse_number_or_empty(year)),
        month: stringify(parse_number_or_empty(month)),
        day: day.map(|d| stringify(parse_number_or_empty(d))).unwrap_or_default(),
    }
}
