//! Month/year parsing and the render-time "now"

use chrono::{Datelike, Utc};

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Parse `"Mon YYYY"` or a bare `"YYYY"` into a fractional year.
///
/// The month is matched on its first three letters, case-insensitively, and
/// contributes `month_index / 12`. Returns `None` for anything else,
/// including a bare year of zero.
pub fn parse_month_year(text: &str) -> Option<f64> {
    let lowered = text.trim().to_lowercase();
    let mut parts = lowered.split_whitespace();
    let first = parts.next()?;

    let Some(second) = parts.next() else {
        return leading_int(first).filter(|&y| y != 0).map(|y| y as f64);
    };

    let prefix: String = first.chars().take(3).collect();
    let month = MONTHS.iter().position(|m| *m == prefix)?;
    let year = leading_int(second)?;
    Some(year as f64 + month as f64 / 12.0)
}

/// Integer prefix of `text` (optional sign, then digits), like a lenient
/// `parseInt`.
pub fn leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}

/// Current fractional year (`year + month0 / 12`), evaluated at render time
pub fn fractional_year_now() -> f64 {
    let now = Utc::now();
    now.year() as f64 + now.month0() as f64 / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_month_year() {
        assert!(approx(parse_month_year("Jan 2020").unwrap(), 2020.0));
        assert!(approx(parse_month_year("Jul 2019").unwrap(), 2019.5));
        assert!(approx(parse_month_year("december 2010").unwrap(), 2010.0 + 11.0 / 12.0));
        assert!(approx(parse_month_year("  SEP   2019 ").unwrap(), 2019.0 + 8.0 / 12.0));
    }

    #[test]
    fn test_bare_year() {
        assert_eq!(parse_month_year("2021"), Some(2021.0));
        assert_eq!(parse_month_year("0"), None);
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_month_year(""), None);
        assert_eq!(parse_month_year("Present"), None);
        assert_eq!(parse_month_year("Foo 2020"), None);
        assert_eq!(parse_month_year("Mar soon"), None);
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("2019abc"), Some(2019));
        assert_eq!(leading_int("-12"), Some(-12));
        assert_eq!(leading_int("abc"), None);
    }

    #[test]
    fn test_now_is_plausible() {
        let now = fractional_year_now();
        assert!(now > 2000.0 && now < 3000.0);
    }
}
