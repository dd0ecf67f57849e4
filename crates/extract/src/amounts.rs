use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use stokvel_core::Money;

#[derive(Debug, Clone, Error)]
#[error("unparseable amount: {0}")]
pub struct AmountParseError(pub String);

/// Parse a statement amount: strips the rand symbol, internal whitespace and
/// thousands separators; negativity comes from a leading `-` or accounting
/// parentheses. Callers skip the row on error.
pub fn parse_amount(token: &str) -> Result<Money, AmountParseError> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(AmountParseError(token.to_string()));
    }

    let (parenthesized, inner) = if trimmed.starts_with('(') && trimmed.ends_with(')') {
        (true, &trimmed[1..trimmed.len() - 1])
    } else {
        (false, trimmed)
    };

    let cleaned = inner
        .replace(['R', 'r', ',', ' ', '\u{a0}'], "")
        .trim_start_matches('+')
        .to_string();

    let mut value =
        Decimal::from_str(&cleaned).map_err(|_| AmountParseError(token.to_string()))?;
    if parenthesized {
        value = -value;
    }

    Ok(Money::from_decimal(value))
}
