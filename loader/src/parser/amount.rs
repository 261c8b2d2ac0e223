//! Currency text cleanup for the `Total` column.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Anything that is not an ASCII digit or a decimal point.
static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.]").expect("valid regex"));

#[derive(Debug, Clone, Error, PartialEq)]
#[error("'{raw}' is not an amount (cleaned to '{cleaned}')")]
pub struct AmountError {
    pub raw: String,
    pub cleaned: String,
}

/// Turn spreadsheet currency text into a number.
///
/// Text that already parses as a finite number is returned unchanged, sign
/// included. Otherwise every character other than a digit or `.` is
/// stripped (`"$1,234.56"` -> `1234.56`) and the rest must parse.
pub fn clean_amount(raw: &str) -> Result<f64, AmountError> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        if value.is_finite() {
            return Ok(value);
        }
    }

    let cleaned = NON_NUMERIC.replace_all(trimmed, "");
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AmountError {
            raw: raw.to_string(),
            cleaned: cleaned.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_text() {
        assert_eq!(clean_amount("$1,234.56"), Ok(1234.56));
        assert_eq!(clean_amount("1,000.00"), Ok(1000.0));
        assert_eq!(clean_amount(" $ 75 "), Ok(75.0));
        assert_eq!(clean_amount("USD 12.5"), Ok(12.5));
    }

    #[test]
    fn test_numeric_passthrough() {
        assert_eq!(clean_amount("1234.56"), Ok(1234.56));
        assert_eq!(clean_amount("-12.50"), Ok(-12.5));
        assert_eq!(clean_amount("0"), Ok(0.0));
    }

    #[test]
    fn test_sign_lost_once_stripped() {
        // Only plain numbers keep their sign
        assert_eq!(clean_amount("-$12.50"), Ok(12.5));
    }

    #[test]
    fn test_uncleanable() {
        let err = clean_amount("$").unwrap_err();
        assert_eq!(err.cleaned, "");

        assert!(clean_amount("1.2.3").is_err());
        assert!(clean_amount("NaN").is_err());
        assert!(clean_amount("n/a").is_err());
    }
}
