// =============================================================================
// Fixed-Point Math
// =============================================================================
// Scaled-integer primitives shared by the whole engine.
//
// Every quantity is a non-negative u128 scaled by PRECISION (1.0 = 1e18).
// A product of two such numbers can reach ~2^256 before the division that
// brings it back to scale, so intermediates are widened to U256 and only
// narrowed once the final quotient is known. Anything that doesn't fit back
// into u128 is a MathOverflow - never a silent truncation.
// =============================================================================

use anchor_lang::prelude::*;
use ethnum::U256;

use crate::constants::{BPS_DENOMINATOR, DEPOSIT_CAP_MULTIPLIER, PRECISION};
use crate::error::TrancheError;

/// Narrow a 256-bit intermediate back to u128
fn narrow(value: U256) -> Result<u128> {
    let (high, low) = value.into_words();
    require!(high == 0, TrancheError::MathOverflow);
    Ok(low)
}

/// `a * b / denominator`, rounded down
pub fn mul_div_floor(a: u128, b: u128, denominator: u128) -> Result<u128> {
    require!(denominator != 0, TrancheError::DivisionByZero);

    // Two u128 factors never overflow 256 bits
    let product = U256::from(a) * U256::from(b);
    narrow(product / U256::from(denominator))
}

/// `a * b / denominator`, rounded up
pub fn mul_div_ceil(a: u128, b: u128, denominator: u128) -> Result<u128> {
    require!(denominator != 0, TrancheError::DivisionByZero);

    let product = U256::from(a) * U256::from(b);
    let denominator = U256::from(denominator);

    let mut quotient = product / denominator;
    if product % denominator != U256::ZERO {
        quotient += U256::ONE;
    }

    narrow(quotient)
}

/// Fixed-point multiply: `a * b / PRECISION`
pub fn mul_div(a: u128, b: u128) -> Result<u128> {
    mul_div_floor(a, b, PRECISION)
}

/// Prorate a fixed-point rate over a slice of a period
///
/// Formula: `amount * rate * elapsed / (period * PRECISION)`
///
/// The full numerator is built before the single division, so short epochs
/// don't lose precision the way `rate / period * elapsed` would.
pub fn prorate(amount: u128, rate: u128, elapsed: u64, period: u64) -> Result<u128> {
    require!(period != 0, TrancheError::DivisionByZero);

    let numerator = (U256::from(amount) * U256::from(rate))
        .checked_mul(U256::from(elapsed as u128))
        .ok_or(error!(TrancheError::MathOverflow))?;

    let denominator = U256::from(period as u128) * U256::from(PRECISION);

    narrow(numerator / denominator)
}

/// Backing ratio: `value * PRECISION / supply`
///
/// 1.0 (PRECISION) means Senior is exactly 100% collateralized.
pub fn ratio(value: u128, supply: u128) -> Result<u128> {
    mul_div_floor(value, PRECISION, supply)
}

/// Visible balance for a number of internal shares (floor)
pub fn balance_from_shares(shares: u128, index: u128) -> Result<u128> {
    mul_div_floor(shares, index, PRECISION)
}

/// Internal shares for a visible balance (floor)
///
/// Used when minting: the holder never receives more shares than paid for.
pub fn shares_from_balance(balance: u128, index: u128) -> Result<u128> {
    mul_div_floor(balance, PRECISION, index)
}

/// Internal shares for a visible balance (ceiling)
///
/// Used when burning shares for a requested balance so the ledger never
/// under-burns. At most 1 unit above `shares_from_balance`.
pub fn shares_from_balance_ceil(balance: u128, index: u128) -> Result<u128> {
    mul_div_ceil(balance, PRECISION, index)
}

/// Senior supply implied by total internal shares and the rebase index
pub fn total_supply(shares: u128, index: u128) -> Result<u128> {
    balance_from_shares(shares, index)
}

/// Maximum Senior supply the Reserve can stand behind
pub fn deposit_cap(reserve_value: u128) -> Result<u128> {
    reserve_value
        .checked_mul(DEPOSIT_CAP_MULTIPLIER)
        .ok_or(error!(TrancheError::MathOverflow))
}

/// Apply a signed basis-point adjustment to `value`
///
/// `+250` grows the value by 2.5%, `-10000` takes it to zero. A negative
/// delta larger than 100% would flip the sign and fails with MathOverflow.
pub fn signed_percentage(value: u128, delta_bps: i64) -> Result<u128> {
    let magnitude = delta_bps.unsigned_abs() as u128;

    let multiplier = if delta_bps >= 0 {
        BPS_DENOMINATOR
            .checked_add(magnitude)
            .ok_or(error!(TrancheError::MathOverflow))?
    } else {
        require!(magnitude <= BPS_DENOMINATOR, TrancheError::MathOverflow);
        BPS_DENOMINATOR - magnitude
    };

    mul_div_floor(value, multiplier, BPS_DENOMINATOR)
}
