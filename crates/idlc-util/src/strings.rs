//! Identifier validation and string-literal helpers.

use once_cell::sync::Lazy;
use regex::Regex;

/// Identifier components start with a letter and may not end with an
/// underscore.
static IDENTIFIER_COMPONENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^[A-Za-z]([A-Za-z0-9_]*[A-Za-z0-9])?$").expect("identifier pattern")
});

/// Whether `component` is a well-formed identifier component.
pub fn is_valid_identifier_component(component: &str) -> bool {
    IDENTIFIER_COMPONENT.is_match(component)
}

/// Strips the surrounding `"` quotes from a lexed string literal.
///
/// Returns `None` when the text is not quote-delimited (too short, or either
/// delimiter missing).
pub fn strip_string_literal_quotes(text: &str) -> Option<&str> {
    if text.len() < 2 || !text.starts_with('"') || !text.ends_with('"') {
        return None;
    }
    Some(&text[1..text.len() - 1])
}

/// Parses a numeric literal as a signed 64-bit integer.
///
/// Decimal and `0x`/`0X`-prefixed hexadecimal are accepted; anything else
/// (including out-of-range values) is `None`.
pub fn parse_numeric_i64(text: &str) -> Option<i64> {
    if let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        i64::from_str_radix(digits, 16).ok()
    } else {
        text.parse::<i64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(is_valid_identifier_component("a"));
        assert!(is_valid_identifier_component("Display"));
        assert!(is_valid_identifier_component("frame_count"));
        assert!(is_valid_identifier_component("V2"));
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(!is_valid_identifier_component(""));
        assert!(!is_valid_identifier_component("_leading"));
        assert!(!is_valid_identifier_component("trailing_"));
        assert!(!is_valid_identifier_component("9lives"));
        assert!(!is_valid_identifier_component("with-dash"));
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_string_literal_quotes("\"hello\""), Some("hello"));
        assert_eq!(strip_string_literal_quotes("\"\""), Some(""));
    }

    #[test]
    fn test_strip_quotes_rejects_unquoted() {
        assert_eq!(strip_string_literal_quotes("hello"), None);
        assert_eq!(strip_string_literal_quotes("\""), None);
        assert_eq!(strip_string_literal_quotes("\"open"), None);
    }

    #[test]
    fn test_parse_numeric_decimal() {
        assert_eq!(parse_numeric_i64("7"), Some(7));
        assert_eq!(parse_numeric_i64("-42"), Some(-42));
        assert_eq!(parse_numeric_i64("9223372036854775807"), Some(i64::MAX));
    }

    #[test]
    fn test_parse_numeric_hex() {
        assert_eq!(parse_numeric_i64("0x10"), Some(16));
        assert_eq!(parse_numeric_i64("0XfF"), Some(255));
    }

    #[test]
    fn test_parse_numeric_rejects_junk() {
        assert_eq!(parse_numeric_i64(""), None);
        assert_eq!(parse_numeric_i64("1_000"), None);
        assert_eq!(parse_numeric_i64("3.14"), None);
        assert_eq!(parse_numeric_i64("99999999999999999999"), None);
        assert_eq!(parse_numeric_i64("1-2"), None);
    }
}
