//! Numeric parsing and decimal rounding

/// A parsed decimal value.
///
/// Besides the value itself, remembers how many fraction digits the source
/// text was written with, so rounding never strips zeros the data carried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number {
    value: f64,
    scale: usize,
}

impl Number {
    /// Wrap a value that has no textual form (scale 0)
    pub fn new(value: f64) -> Self {
        Self { value, scale: 0 }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Fraction digits present in the source text
    pub fn scale(&self) -> usize {
        self.scale
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

/// Strictly parse a numeric token.
///
/// Returns `None` for empty input, non-numeric text, degree/minute notation
/// (`"39°32'"`), and non-finite values. Surrounding whitespace is ignored.
pub fn parse_number_or_empty(s: &str) -> Option<Number> {
    let token = s.trim();
    if token.is_empty() {
        return None;
    }
    let value: f64 = token.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(Number {
        value,
        scale: fraction_digits(token),
    })
}

/// Count the digits after the decimal point of a plain decimal token.
/// Exponent notation counts as scale 0.
fn fraction_digits(token: &str) -> usize {
    if token.contains(['e', 'E']) {
        return 0;
    }
    match token.split_once('.') {
        Some((_, frac)) => frac.chars().take_while(|c| c.is_ascii_digit()).count(),
        None => 0,
    }
}

/// Format `n` with `digits` fraction places, then trim the padding.
///
/// Zeros introduced by formatting are stripped; zeros written in the source
/// text are kept. When no significant fraction remains the decimal point is
/// dropped as well, so `3.0` renders as `"3"`. `None` renders as `""`.
pub fn round_to(digits: usize, n: Option<Number>) -> String {
    let Some(n) = n else {
        return String::new();
    };

    let formatted = format!("{:.*}", digits, n.value);
    let Some((int, frac)) = formatted.split_once('.') else {
        return normalize_zero(&formatted);
    };

    let significant = frac.trim_end_matches('0').len();
    if significant == 0 {
        return normalize_zero(int);
    }

    let keep = significant.max(n.scale.min(digits));
    format!("{}.{}", int, &frac[..keep])
}

/// Render a value that should be a plain count (year, month, day).
///
/// Integral values lose any fraction; anything else keeps its shortest
/// decimal form.
pub fn stringify(n: Option<Number>) -> String {
    match n {
        None => String::new(),
        Some(n) if n.value.fract() == 0.0 && n.value.abs() < 1e15 => {
            format!("{}", n.value as i64)
        }
        Some(n) => n.value.to_string(),
    }
}

fn normalize_zero(int: &str) -> String {
    if int == "-0" {
        "0".to_string()
    } else {
        int.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_decimals() {
        let n = parse_number_or_empty("39.539146").unwrap();
        assert_eq!(n.value(), 39.539146);
        assert_eq!(n.scale(), 6);
        assert_eq!(parse_number_or_empty(" -87 ").unwrap().value(), -87.0);
    }

    #[test]
    fn garbage_parses_to_none() {
        assert!(parse_number_or_empty("").is_none());
        assert!(parse_number_or_empty("   ").is_none());
        assert!(parse_number_or_empty("abc").is_none());
        assert!(parse_number_or_empty("39°32'N").is_none());
        assert!(parse_number_or_empty("12.5.3").is_none());
        assert!(parse_number_or_empty("NaN").is_none());
        assert!(parse_number_or_empty("inf").is_none());
    }

    #[test]
    fn exponent_notation_has_no_scale() {
        let n = parse_number_or_empty("1.5e2").unwrap();
        assert_eq!(n.value(), 150.0);
        assert_eq!(n.scale(), 0);
    }

    #[test]
    fn round_to_matches_reference_values() {
        assert_eq!(round_to(7, Some(Number::new(3.10000009))), "3.1000001");
        assert_eq!(round_to(7, Some(Number::new(3.0))), "3");
        assert_eq!(round_to(7, Some(Number::new(-300.123456789))), "-300.1234568");
    }

    #[test]
    fn round_to_keeps_zeros_from_source_text() {
        assert_eq!(round_to(7, parse_number_or_empty("3.00100")), "3.00100");
        assert_eq!(round_to(7, parse_number_or_empty("3.000000")), "3");
        assert_eq!(round_to(7, parse_number_or_empty("-87.41389")), "-87.41389");
    }

    #[test]
    fn round_to_caps_source_zeros_at_digits() {
        assert_eq!(round_to(3, parse_number_or_empty("1.50000")), "1.500");
    }

    #[test]
    fn round_to_empty_is_empty() {
        assert_eq!(round_to(7, None), "");
    }

    #[test]
    fn round_to_never_renders_negative_zero() {
        assert_eq!(round_to(7, Some(Number::new(-0.00000001))), "0");
        assert_eq!(round_to(0, Some(Number::new(-0.2))), "0");
    }

    #[test]
    fn stringify_drops_integral_fraction() {
        assert_eq!(stringify(parse_number_or_empty("2008")), "2008");
        assert_eq!(stringify(parse_number_or_empty("05")), "5");
        assert_eq!(stringify(parse_number_or_empty("5.0")), "5");
        assert_eq!(stringify(parse_number_or_empty("5.5")), "5.5");
        assert_eq!(stringify(None), "");
    }
}
