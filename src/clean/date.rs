//! Date decomposition

/// Split an ISO-style `YYYY-MM-DD` date into its parts.
///
/// Anything other than exactly three numeric parts yields three empty
/// strings. Parts are returned as written; normalization happens in
/// [`cleanup_data`](super::cleanup_data).
pub fn parse_date(s: &str) -> (String, String, String) {
    let parts: Vec<&str> = s.trim().split('-').map(str::trim).collect();
    match parts.as_slice() {
        [year, month, day] if [year, month, day].iter().all(|p| is_numeric(p)) => {
            (year.to_string(), month.to_string(), day.to_string())
        }
        _ => (String::new(), String::new(), String::new()),
    }
}

fn is_numeric(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}
