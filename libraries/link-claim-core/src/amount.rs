//! Conversion between smallest-unit integers and human decimal strings.

use alloy_primitives::U256;
use thiserror::Error;

/// Errors produced while parsing a decimal amount.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("Invalid amount: {0}")]
    Invalid(String),

    #[error("Amount does not fit in 256 bits: {0}")]
    Overflow(String),
}

// None once 10^decimals no longer fits in 256 bits (decimals > 77).
fn scale(decimals: u8) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(decimals))
}

/// Render `amount` (in smallest units) as a decimal string.
///
/// Trailing fractional zeros are trimmed, so `2500000` with 6 decimals
/// renders as `"2.5"` and `1000000` as `"1"`.
pub fn format_units(amount: U256, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    let (whole, fraction) = match scale(decimals) {
        Some(base) => (amount / base, amount % base),
        // Every U256 is below 10^decimals here, so it is all fraction
        None => (U256::ZERO, amount),
    };

    let fraction = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Parse a decimal string such as `"0.25"` into smallest units.
///
/// Digits beyond `decimals` are truncated rather than rounded.
pub fn parse_units(value: &str, decimals: u8) -> Result<U256, AmountError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (value, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::Invalid(value.to_string()));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(AmountError::Invalid(value.to_string()));
    }

    let fraction: String = fraction.chars().take(decimals as usize).collect();
    let digits = format!(
        "{}{:0<width$}",
        if whole.is_empty() { "0" } else { whole },
        fraction,
        width = decimals as usize
    );

    digits
        .parse::<U256>()
        .map_err(|_| AmountError::Overflow(value.to_string()))
}
