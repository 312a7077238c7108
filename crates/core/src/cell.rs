//! Numeric reading of rendered cell text.
//!
//! Every reader here is total: text that does not hold a finite number
//! yields `None`, and callers accumulate it as zero.

/// Parse trimmed text as a finite float.
pub fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Longest numeric prefix of the text, after leading whitespace.
///
/// Reads an optional sign, digits with an optional fraction, and an
/// exponent when digits follow it. Anything after that is ignored, so
/// `"80.0h"` reads as 80. Non-finite results are rejected.
pub fn float_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut at: usize| {
        while bytes.get(at).is_some_and(u8::is_ascii_digit) {
            at += 1;
        }
        at
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        let frac = frac_end - (end + 1);
        if digits + frac > 0 {
            digits += frac;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    parse_finite(&s[..end])
}

/// Leading number of a quantity cell, dropping a unit suffix (`"12.5 CYD"` -> 12.5).
///
/// The cell is split on its first whitespace character and the numeric
/// prefix of the first token is read, so `"100CYD"` is 100 as well.
pub fn leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let token = match trimmed.find(char::is_whitespace) {
        Some(at) => &trimmed[..at],
        None => trimmed,
    };
    float_prefix(token)
}

/// Percentage text with an optional trailing `%` (`"40%"` -> 40.0).
pub fn percent_value(text: &str) -> Option<f64> {
    float_prefix(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_number_strips_unit() {
        assert_eq!(leading_number("12.5 CYD"), Some(12.5));
        assert_eq!(leading_number("  100\tLF"), Some(100.0));
        assert_eq!(leading_number("7"), Some(7.0));
    }

    #[test]
    fn test_leading_number_unit_without_space() {
        assert_eq!(leading_number("100CYD"), Some(100.0));
        assert_eq!(leading_number("80.0h"), Some(80.0));
        assert_eq!(leading_number("-3.5e2LF"), Some(-350.0));
        assert_eq!(leading_number("2e"), Some(2.0));
        assert_eq!(leading_number(".5hrs"), Some(0.5));
    }

    #[test]
    fn test_leading_number_rejects_text() {
        assert_eq!(leading_number("abc"), None);
        assert_eq!(leading_number(""), None);
        assert_eq!(leading_number("CYD 12"), None);
        assert_eq!(leading_number("-"), None);
        assert_eq!(leading_number("."), None);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(parse_finite("NaN"), None);
        assert_eq!(parse_finite("inf"), None);
        assert_eq!(leading_number("-infinity units"), None);
        assert_eq!(float_prefix("Infinity"), None);
        assert_eq!(float_prefix("1e400"), None);
    }

    #[test]
    fn test_percent_value() {
        assert_eq!(percent_value("40%"), Some(40.0));
        assert_eq!(percent_value(" 62.5 "), Some(62.5));
        assert_eq!(percent_value("33.3 %"), Some(33.3));
        assert_eq!(percent_value("n/a%"), None);
    }
}
