//! Monetary helpers: coercion, tolerant parsing and display rounding
//!
//! All monetary math in tallyweb uses binary `f64` with rounding applied at
//! display time only. Malformed numeric input (NaN, empty string, garbage
//! text) coerces to zero instead of raising an error, because the calling
//! form treats every keystroke as a potentially partial value and expects
//! the engine to keep computing mid-edit.

use serde::{Deserialize, Deserializer};

/// Tolerance used when comparing derived monetary values
pub const EPSILON: f64 = 1e-9;

/// Coerce a possibly malformed number to a usable value (NaN/infinite -> 0)
pub fn coerce(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Coerce to a non-negative value (NaN/infinite/negative -> 0)
pub fn coerce_non_negative(value: f64) -> f64 {
    let value = coerce(value);
    if value < 0.0 {
        0.0
    } else {
        value
    }
}

/// Parse a user-entered amount string, returning 0.0 for anything unparseable
///
/// Handles formats like "1,234.56", " 42 ", "-100.00 INR", "".
pub fn parse_amount(input: &str) -> f64 {
    let cleaned: String = input.trim().chars().filter(|&c| c != ',').collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    let token = cleaned.split_whitespace().next().unwrap_or("");
    coerce(token.parse::<f64>().unwrap_or(0.0))
}

/// Round to two decimal places for display
pub fn round2(value: f64) -> f64 {
    (coerce(value) * 100.0).round() / 100.0
}

/// Format an amount with two decimal places
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", coerce(value))
}

/// Compare two amounts within floating-point tolerance
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// ==================== Serde Coercion ====================

/// Accepted wire forms for a numeric field: number, numeric string, "" or null
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Missing(Option<()>),
    Other(serde::de::IgnoredAny),
}

impl RawNumber {
    fn into_f64(self) -> f64 {
        match self {
            RawNumber::Number(n) => coerce(n),
            RawNumber::Text(s) => parse_amount(&s),
            RawNumber::Missing(_) | RawNumber::Other(_) => 0.0,
        }
    }
}

/// Deserialize a numeric field with the coerce-to-zero policy
pub fn de_coerced_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawNumber::deserialize(deserializer)?.into_f64())
}

/// Deserialize an optional numeric field; absent/null stays `None`,
/// present-but-malformed coerces to zero
pub fn de_coerced_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(RawNumber::Missing(_)) => None,
        Some(value) => Some(value.into_f64()),
    })
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce() {
        assert_eq!(coerce(12.5), 12.5);
        assert_eq!(coerce(-3.0), -3.0);
        assert_eq!(coerce(f64::NAN), 0.0);
        assert_eq!(coerce(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_coerce_non_negative() {
        assert_eq!(coerce_non_negative(12.5), 12.5);
        assert_eq!(coerce_non_negative(-3.0), 0.0);
        assert_eq!(coerce_non_negative(f64::NAN), 0.0);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("42"), 42.0);
        assert_eq!(parse_amount(" 12.50 "), 12.5);
        assert_eq!(parse_amount("1,234.56"), 1234.56);
        assert_eq!(parse_amount("-100.00 INR"), -100.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(5.849999), 5.85);
        assert_eq!(round2(122.849), 122.85);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(130.0), "130.00");
        assert_eq!(format_amount(5.849999999), "5.85");
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(0.1 + 0.2, 0.3));
        assert!(!approx_eq(0.1, 0.2));
    }

    #[derive(serde::Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "de_coerced_f64")]
        amount: f64,
        #[serde(default, deserialize_with = "de_coerced_opt_f64")]
        paid: Option<f64>,
    }

    #[test]
    fn test_de_coerced_number_forms() {
        let p: Probe = serde_json::from_str(r#"{"amount": 12.5, "paid": 3}"#).unwrap();
        assert_eq!(p.amount, 12.5);
        assert_eq!(p.paid, Some(3.0));

        let p: Probe = serde_json::from_str(r#"{"amount": "1,200", "paid": ""}"#).unwrap();
        assert_eq!(p.amount, 1200.0);
        assert_eq!(p.paid, Some(0.0));

        let p: Probe = serde_json::from_str(r#"{"amount": null}"#).unwrap();
        assert_eq!(p.amount, 0.0);
        assert_eq!(p.paid, None);

        // Structurally wrong shapes still coerce instead of failing
        let p: Probe = serde_json::from_str(r#"{"amount": true, "paid": [1, 2]}"#).unwrap();
        assert_eq!(p.amount, 0.0);
        assert_eq!(p.paid, Some(0.0));
    }
}
