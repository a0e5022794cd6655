use crate::error::{BillPayError, Result};

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Converts a decimal amount in major currency units to an integer string
/// in minor units. The gateway rejects fractional amounts, so "33.90"
/// becomes "3390". Two decimal places are assumed for every currency.
pub fn minor_units(amount: &str) -> Result<String> {
    let value = Decimal::from_str(amount.trim()).map_err(|_| {
        BillPayError::invalid_request(format!("Cannot convert amount '{amount}' to minor units"))
    })?;
    let minor = value
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| {
            BillPayError::invalid_request(format!(
                "Cannot convert amount '{amount}' to minor units"
            ))
        })?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    Ok(minor.normalize().to_string())
}

/// Renders a date in the gateway's 8-digit form, e.g. 1990-05-03 as
/// "19900503".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
