//! Fixed-precision arithmetic for token and fiat balances.
//!
//! All balances carry exactly [`BALANCE_PRECISION`] fractional digits and are
//! rounded half away from zero. Inputs are non-negative, so this is the same
//! as rounding half up.

use rust_decimal::{Decimal, RoundingStrategy};
use tokenwatch_chain::U256;

use crate::constants::{BALANCE_PRECISION, MAX_TOKEN_DECIMALS};
use crate::errors::{Error, Result};

/// Round to [`BALANCE_PRECISION`] digits and pin the scale, so `3.075` becomes `3.0750`.
///
/// Idempotent: a value that already has the target precision is returned unchanged.
pub fn round_balance(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(BALANCE_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(BALANCE_PRECISION);
    rounded
}

/// Convert a raw on-chain amount (smallest unit) into whole tokens.
///
/// `raw / 10^decimals`, rounded to [`BALANCE_PRECISION`] digits. The rounding
/// is done on the integer before it is narrowed, so no precision is lost to an
/// intermediate representation.
pub fn token_units_to_decimal(raw: U256, decimals: u8) -> Result<Decimal> {
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(Error::Conversion(format!(
            "token decimals {} exceed the supported maximum of {}",
            decimals, MAX_TOKEN_DECIMALS
        )));
    }

    let ten = U256::from(10u8);
    let precision = BALANCE_PRECISION as u8;

    // Amount expressed in units of 10^-BALANCE_PRECISION tokens.
    let scaled = if decimals > precision {
        let divisor = ten.pow(U256::from(decimals - precision));
        let quotient = raw / divisor;
        let remainder = raw % divisor;
        if remainder * U256::from(2u8) >= divisor {
            quotient + U256::from(1u8)
        } else {
            quotient
        }
    } else {
        let multiplier = ten.pow(U256::from(precision - decimals));
        raw.checked_mul(multiplier)
            .ok_or_else(|| overflow(raw, decimals))?
    };

    let mantissa = u128::try_from(scaled)
        .ok()
        .and_then(|m| i128::try_from(m).ok())
        .ok_or_else(|| overflow(raw, decimals))?;

    Decimal::try_from_i128_with_scale(mantissa, BALANCE_PRECISION)
        .map_err(|_| overflow(raw, decimals))
}

/// `round(token_balance * price)` at balance precision.
pub fn fiat_value(token_balance: Decimal, price: Decimal) -> Result<Decimal> {
    token_balance
        .checked_mul(price)
        .map(round_balance)
        .ok_or_else(|| {
            Error::Conversion(format!(
                "fiat value of {} at {} overflows",
                token_balance, price
            ))
        })
}

fn overflow(raw: U256, decimals: u8) -> Error {
    Error::Conversion(format!(
        "balance {} with {} decimals does not fit a decimal",
        raw, decimals
    ))
}
