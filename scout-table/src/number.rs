/// Parse a magnitude as rendered in the table, e.g. `"8,321.50"`.
///
/// Thousands separators and surrounding whitespace are ignored. Returns
/// `None` for empty input, separator-only input, or anything that is not a
/// finite number.
///
/// ```
/// use scout_table::number::parse_magnitude;
///
/// assert_eq!(parse_magnitude("8,321.50"), Some(8321.5));
/// assert_eq!(parse_magnitude("  -1,000 "), Some(-1000.0));
/// assert_eq!(parse_magnitude(",,"), None);
/// ```
pub fn parse_magnitude(text: &str) -> Option<f64> {
    let normalized: String = text.chars().filter(|c| *c != ',').collect();
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a signed percentage such as `"+1.23%"` or `"-0.40 %"`.
pub fn parse_percent(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    parse_magnitude(trimmed.strip_suffix('%').unwrap_or(trimmed))
}
