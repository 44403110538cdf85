//! Monetary text parsing for uploaded totals.
//!
//! Spreadsheet totals arrive as display text ("$5,000.00", "7500", "USD
//! 10,500.50"). Parsing strips currency decoration and grouping separators
//! and converts to an exact decimal. Malformed totals are an error; a row's
//! stated total is legal-document content and must never silently become
//! zero.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

// Optional 3-letter currency code around the amount. Anything else is noise
// we refuse to guess about.
static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:[a-z]{3})?(-?\d+(?:\.\d+)?)(?i:[a-z]{3})?$").expect("amount regex is valid")
});

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoneyParseError {
    #[error("no numeric amount in '{0}'")]
    NoDigits(String),
    #[error("total amount must be positive, got '{0}'")]
    NotPositive(String),
}

/// Parse a monetary cell into a decimal amount.
///
/// Accepts an optional currency symbol or code prefix/suffix and comma
/// grouping. Rejects text with no extractable digits and non-positive
/// amounts.
pub fn parse_amount(text: &str) -> Result<Decimal, MoneyParseError> {
    let stripped: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',') && !c.is_whitespace())
        .collect();

    let captures = AMOUNT_RE
        .captures(&stripped)
        .ok_or_else(|| MoneyParseError::NoDigits(text.trim().to_string()))?;

    let amount: Decimal = captures[1]
        .parse()
        .map_err(|_| MoneyParseError::NoDigits(text.trim().to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(MoneyParseError::NotPositive(text.trim().to_string()));
    }
    Ok(amount.round_dp(2))
}
