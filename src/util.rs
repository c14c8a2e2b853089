// Utility helpers for parsing and normalization.
//
// This module centralizes all the "dirty" CSV cell handling so the rest of
// the code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (commas, spaces, text).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

/// Trim and case-fold a header or lookup key.
///
/// Header casing drifts between hand-assembled exports (`WBN`, `wbn `,
/// `Wbn`), so every column and remark-table lookup goes through this fold.
pub fn fold_key(s: &str) -> String {
    s.trim().to_ascii_lowercase()
}

/// Loose boolean test for flag-like CSV cells (`TRUE`, `yes`, `1`, `Y`).
pub fn is_truthy(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

/// Render an hours/days value with two decimals for table previews.
pub fn display_hours(v: &f64) -> String {
    format!("{:.2}", v)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for counts in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_handles_separators_and_junk() {
        assert_eq!(parse_f64_safe(Some(" 1,234.5 ")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some("96")), Some(96.0));
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn fold_key_trims_and_lowercases() {
        assert_eq!(fold_key("  Controllable_Remark "), "controllable_remark");
    }

    #[test]
    fn truthiness() {
        assert!(is_truthy("TRUE"));
        assert!(is_truthy(" y "));
        assert!(!is_truthy("no"));
        assert!(!is_truthy(""));
    }
}
