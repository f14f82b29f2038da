//! Monetary amount extraction
//!
//! Pulls the first monetary quantity out of free text: an optional currency
//! symbol, then digits with optional 3-digit thousands groups and up to two
//! decimals. Multiple numbers in one sentence are not disambiguated; the
//! first match wins.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref AMOUNT_RE: Regex =
        Regex::new(r"[₹$€£]?\s?((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{1,2})?)").unwrap();
}

/// Extract the first monetary amount from `text`, or 0.0 when none parses.
///
/// Absence of an amount is a valid state (pure queries), never an error.
pub fn extract(text: &str) -> f64 {
    AMOUNT_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_amount() {
        assert_eq!(extract("paid 500 for dinner"), 500.0);
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(extract("transferred 8,000 to savings"), 8000.0);
        assert_eq!(extract("won $1,234,567.89 somehow"), 1234567.89);
    }

    #[test]
    fn test_decimals_without_separators() {
        assert_eq!(extract("the bill was 8000.50"), 8000.5);
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(extract("₹150.50 for coffee"), 150.5);
        assert_eq!(extract("spent $42 on books"), 42.0);
        assert_eq!(extract("€ 99 subscription"), 99.0);
    }

    #[test]
    fn test_no_numbers() {
        assert_eq!(extract("no numbers here"), 0.0);
        assert_eq!(extract(""), 0.0);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(extract("paid 500 then another 300"), 500.0);
    }
}
