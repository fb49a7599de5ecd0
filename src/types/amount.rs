//! Parsing of user-supplied amounts
//!
//! Amounts are `Decimal` with currency semantics: at most two decimal places.

use super::error::LedgerError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Decimal places allowed in an amount
pub const AMOUNT_SCALE: u32 = 2;

/// Parse an amount, accepting at most two decimal places
///
/// The sign is not checked here; deposits and withdrawals validate it when
/// applied.
///
/// # Errors
///
/// Returns `InvalidAmount` if the text is not a number or carries more than
/// two significant decimal places.
pub fn parse_amount(text: &str, operation: &str) -> Result<Decimal, LedgerError> {
    let trimmed = text.trim();
    let amount = Decimal::from_str(trimmed)
        .map_err(|_| LedgerError::invalid_amount(trimmed, operation))?;

    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(LedgerError::invalid_amount(trimmed, operation));
    }

    Ok(amount)
}
