//! Value quoting for flat-table export

/// Quote a value for a flat export table.
///
/// Values that are already wrapped in double quotes, or that contain no
/// double quote at all, pass through unchanged. Anything else is wrapped in
/// double quotes with inner quotes doubled. With `escape_single`, single
/// quotes are doubled as well so the result can sit inside an SQL literal.
pub fn quote(value: &str, escape_single: bool) -> String {
    let already_quoted = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');
    let quoted = if already_quoted || !value.contains('"') {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('"', "\"\""))
    };

    if escape_single {
        quoted.replace('\'', "''")
    } else {
        quoted
    }
}
