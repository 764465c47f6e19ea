//! Display formatting helpers for currency, numbers and dates
//!
//! The compute layer hands the UI plain numbers; everything presentational
//! (grouping separators, currency symbols, friendly dates) lives here.

use chrono::NaiveDate;
use tallyweb_config::{CurrencyConfig, SymbolPosition};

/// Format a number with grouping and decimal separators
pub fn format_number(
    value: f64,
    decimal_places: u32,
    thousands_separator: &str,
    decimal_separator: &str,
) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let rounded = format!("{:.*}", decimal_places as usize, value.abs());
    let negative = value < 0.0 && rounded.bytes().any(|b| (b'1'..=b'9').contains(&b));

    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rounded.as_str(), None),
    };

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(thousands_separator);
        }
        grouped.push(*c);
    }

    let mut result = String::new();
    if negative {
        result.push('-');
    }
    result.push_str(&grouped);
    if let Some(frac) = frac_part {
        result.push_str(decimal_separator);
        result.push_str(frac);
    }
    result
}

/// Format a monetary amount per the currency configuration
pub fn format_currency(value: f64, config: &CurrencyConfig) -> String {
    let number = format_number(
        value,
        config.decimal_places,
        &config.thousands_separator,
        &config.decimal_separator,
    );

    match config.symbol_position {
        SymbolPosition::Before => format!("{} {}", config.default_currency, number),
        SymbolPosition::After => format!("{} {}", number, config.default_currency),
    }
}

/// Reformat a YYYY-MM-DD date for display (e.g. "03 Jan 2024")
///
/// Unparseable input passes through unchanged.
pub fn display_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%d %b %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

// ==================== Tests ====================
