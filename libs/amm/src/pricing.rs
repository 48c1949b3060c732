//! Constant product pricing with exact integer arithmetic
//!
//! All intermediates are computed in 256 bits so that the product of two
//! reserve-scale values never overflows. Division truncates toward zero.

use crate::error::{AmmError, Result};
use ethnum::U256;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// Fee denominator: fees are expressed in basis points out of 10_000
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Narrow a 256-bit intermediate back to reserve width
pub(crate) fn to_u128(value: U256) -> Result<u128> {
    if value > U256::from(u128::MAX) {
        return Err(AmmError::ArithmeticOverflow);
    }
    Ok(value.as_u128())
}

pub(crate) fn mul(a: u128, b: u128) -> U256 {
    // Two u128 factors always fit in 256 bits
    U256::from(a) * U256::from(b)
}

fn validate_fee(fee_bps: u32) -> Result<()> {
    if fee_bps >= BPS_DENOMINATOR {
        return Err(AmmError::InvalidFee(fee_bps));
    }
    Ok(())
}

/// Exact output for `amount_in` against `(reserve_in, reserve_out)` after the fee
///
/// `amount_out = floor(a * (10000 - fee) * r_out / (r_in * 10000 + a * (10000 - fee)))`
pub fn quote_output(amount_in: u128, reserve_in: u128, reserve_out: u128, fee_bps: u32) -> Result<u128> {
    if amount_in == 0 {
        return Err(AmmError::InvalidAmount);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(AmmError::NoLiquidity);
    }
    validate_fee(fee_bps)?;

    let amount_in_after_fee = mul(amount_in, (BPS_DENOMINATOR - fee_bps) as u128);
    let numerator = amount_in_after_fee
        .checked_mul(U256::from(reserve_out))
        .ok_or(AmmError::ArithmeticOverflow)?;
    let denominator = mul(reserve_in, BPS_DENOMINATOR as u128)
        .checked_add(amount_in_after_fee)
        .ok_or(AmmError::ArithmeticOverflow)?;

    to_u128(numerator / denominator)
}

/// Smallest input that yields at least `amount_out`
pub fn quote_input(amount_out: u128, reserve_in: u128, reserve_out: u128, fee_bps: u32) -> Result<u128> {
    if amount_out == 0 {
        return Err(AmmError::InvalidAmount);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(AmmError::NoLiquidity);
    }
    if amount_out >= reserve_out {
        return Err(AmmError::InsufficientReserves {
            requested: amount_out,
            available: reserve_out,
        });
    }
    validate_fee(fee_bps)?;

    let numerator = mul(reserve_in, amount_out)
        .checked_mul(U256::from(BPS_DENOMINATOR))
        .ok_or(AmmError::ArithmeticOverflow)?;
    let denominator = mul(reserve_out - amount_out, (BPS_DENOMINATOR - fee_bps) as u128);

    // Ceiling division; an exact quotient already covers `amount_out`
    let quotient = numerator / denominator;
    if numerator % denominator == U256::ZERO {
        to_u128(quotient)
    } else {
        to_u128(quotient + U256::ONE)
    }
}

/// Quote-per-base spot price, `None` for an empty base reserve
pub fn spot_price(reserve_base: u128, reserve_quote: u128) -> Option<Decimal> {
    if reserve_base == 0 {
        return None;
    }
    let base = Decimal::from_u128(reserve_base)?;
    let quote = Decimal::from_u128(reserve_quote)?;
    quote.checked_div(base)
}

/// Floor integer square root using Newton's method
pub fn isqrt(value: U256) -> U256 {
    if value < U256::new(2) {
        return value;
    }

    let mut x = value;
    // ceil(value / 2) without overflowing on U256::MAX
    let mut y = (x >> 1) + (x & U256::ONE);
    while y < x {
        x = y;
        y = (x + value / x) >> 1;
    }
    x
}
