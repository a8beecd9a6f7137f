//! Quantity extraction from model-written text
//!
//! The model answers with strings like "1,8 м" or "1.8 m (2 шари)".
//! Only the first number is used; units are trusted as-is.

use regex::Regex;

lazy_static::lazy_static! {
    static ref NUMBER_RE: Regex = Regex::new(r"[0-9]+(?:\.[0-9]+)?").unwrap();
}

/// Extract the first number from a usage string
///
/// The first decimal comma becomes a decimal point. Anything without a
/// number, or that overflows to a non-finite value, yields 0.
pub fn parse_quantity(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let normalized = text.replacen(',', ".", 1);

    NUMBER_RE
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Same as [`parse_quantity`] for optional cells (absent → 0)
pub fn parse_optional_quantity(text: Option<&str>) -> f64 {
    text.map(parse_quantity).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_comma_and_point_agree() {
        assert_eq!(parse_quantity("1,8 м"), 1.8);
        assert_eq!(parse_quantity("1.8 m"), 1.8);
    }

    #[test]
    fn test_empty_and_absent() {
        assert_eq!(parse_quantity(""), 0.0);
        assert_eq!(parse_optional_quantity(None), 0.0);
        assert_eq!(parse_optional_quantity(Some("")), 0.0);
    }

    #[test]
    fn test_placeholder_dash() {
        assert_eq!(parse_quantity("-"), 0.0);
        assert_eq!(parse_quantity("—"), 0.0);
    }

    #[test]
    fn test_integer_value() {
        assert_eq!(parse_quantity("2 м"), 2.0);
    }

    #[test]
    fn test_first_number_wins() {
        assert_eq!(parse_quantity("1.5 м (2 шари)"), 1.5);
        assert_eq!(parse_quantity("approx. 2,25 m x 150 cm"), 2.25);
    }

    #[test]
    fn test_no_sign_is_read() {
        // a minus sign is not part of the number
        assert_eq!(parse_quantity("-1.2 m"), 1.2);
    }

    #[test]
    fn test_only_first_comma_normalized() {
        // "1,2,3" -> "1.2,3" -> 1.2
        assert_eq!(parse_quantity("1,2,3"), 1.2);
    }

    #[test]
    fn test_text_without_number() {
        assert_eq!(parse_quantity("не потрібно"), 0.0);
        assert_eq!(parse_quantity("n/a"), 0.0);
    }

    #[test]
    fn test_overflow_is_zero() {
        let huge = "9".repeat(400);
        assert_eq!(parse_quantity(&huge), 0.0);
    }

    #[test]
    fn test_total_and_idempotent() {
        let inputs = ["", "-", "1,8 м", "abc", "12.", ".5", "3.14.15", "١٢", "∞"];
        for input in inputs {
            let first = parse_quantity(input);
            assert!(first.is_finite() && first >= 0.0, "input {:?}", input);
            assert_eq!(first, parse_quantity(input));
        }
    }
}
