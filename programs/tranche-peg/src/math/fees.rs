// =============================================================================
// Fee Accrual
// =============================================================================
// Management fee, performance fee, early-withdrawal penalty, and the
// supply / index growth formulas a rebase is built from.
//
// Fees are minted as extra Senior supply rather than drawn from vault value:
// they dilute holders instead of draining the backing.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::TrancheError;
use crate::math::fixed_point::{mul_div, mul_div_floor, prorate};

/// Monthly approximation of the management fee
///
/// Formula: `vault_value * MANAGEMENT_FEE_MONTHLY / PRECISION`
pub fn management_fee_monthly(vault_value: u128) -> Result<u128> {
    mul_div(vault_value, MANAGEMENT_FEE_MONTHLY)
}

/// Time-prorated management fee tokens (the form rebase uses)
///
/// Formula: `vault_value * MANAGEMENT_FEE_ANNUAL * elapsed / (SECONDS_PER_YEAR * PRECISION)`
///
/// Strictly linear in `elapsed`, so rebasing more or less often than monthly
/// never over- or under-charges.
pub fn management_fee_tokens(vault_value: u128, elapsed_seconds: u64) -> Result<u128> {
    prorate(vault_value, MANAGEMENT_FEE_ANNUAL, elapsed_seconds, SECONDS_PER_YEAR)
}

/// Performance fee: 2% of the yield tokens minted to users this epoch
pub fn performance_fee(user_tokens: u128) -> Result<u128> {
    mul_div(user_tokens, PERFORMANCE_FEE)
}

/// Result of applying the early-withdrawal penalty
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithdrawalPenalty {
    /// Amount kept by the protocol
    pub penalty: u128,
    /// Amount the holder actually receives
    pub net: u128,
}

/// Early-withdrawal penalty for a Senior withdrawal
///
/// A holder who never started a cooldown (`cooldown_start == 0`), or whose
/// cooldown hasn't run for COOLDOWN_PERIOD_SECONDS yet, pays 20%.
pub fn withdrawal_penalty(amount: u128, cooldown_start: i64, now: i64) -> Result<WithdrawalPenalty> {
    require!(amount > 0, TrancheError::InvalidWithdrawalAmount);

    let cooldown_complete = cooldown_start != 0
        && now >= cooldown_start.saturating_add(COOLDOWN_PERIOD_SECONDS);

    if cooldown_complete {
        return Ok(WithdrawalPenalty { penalty: 0, net: amount });
    }

    let penalty = mul_div(amount, EARLY_WITHDRAWAL_PENALTY)?;
    let net = amount
        .checked_sub(penalty)
        .ok_or(error!(TrancheError::MathUnderflow))?;

    Ok(WithdrawalPenalty { penalty, net })
}

/// Scale a nominal monthly rate to the actual epoch length
///
/// Formula: `monthly_rate * elapsed / SECONDS_PER_MONTH`
pub fn prorated_rate(monthly_rate: u128, elapsed_seconds: u64) -> Result<u128> {
    mul_div_floor(monthly_rate, elapsed_seconds as u128, SECONDS_PER_MONTH as u128)
}

/// Supply growth for one epoch at a given tier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RebaseSupply {
    /// Monthly rate prorated to the epoch
    pub scaled_rate: u128,
    /// Yield tokens minted to Senior holders
    pub user_tokens: u128,
    /// Performance fee tokens minted on top of the yield
    pub performance_fee_tokens: u128,
    /// Management fee tokens handed in by the caller
    pub management_fee_tokens: u128,
    /// `supply + user + performance + management`
    pub new_supply: u128,
}

impl RebaseSupply {
    /// Tokens minted to the protocol treasury this epoch
    pub fn fee_tokens(&self) -> Result<u128> {
        self.performance_fee_tokens
            .checked_add(self.management_fee_tokens)
            .ok_or(error!(TrancheError::MathOverflow))
    }
}

/// Hypothetical Senior supply after one epoch at `monthly_rate`
pub fn rebase_supply(
    supply: u128,
    monthly_rate: u128,
    elapsed_seconds: u64,
    management_fee_tokens: u128,
) -> Result<RebaseSupply> {
    let scaled_rate = prorated_rate(monthly_rate, elapsed_seconds)?;
    let user_tokens = mul_div(supply, scaled_rate)?;
    let performance_fee_tokens = performance_fee(user_tokens)?;

    let new_supply = supply
        .checked_add(user_tokens)
        .and_then(|s| s.checked_add(performance_fee_tokens))
        .and_then(|s| s.checked_add(management_fee_tokens))
        .ok_or(error!(TrancheError::MathOverflow))?;

    Ok(RebaseSupply {
        scaled_rate,
        user_tokens,
        performance_fee_tokens,
        management_fee_tokens,
        new_supply,
    })
}

/// New rebase index after one epoch at `monthly_rate`
///
/// Formula: `old_index * (PRECISION + scaled_rate) / PRECISION`
///
/// The index carries the user yield only. The performance fee reaches the
/// treasury as separately minted tokens; folding it in here as well would
/// pay it twice.
pub fn rebase_index(old_index: u128, monthly_rate: u128, elapsed_seconds: u64) -> Result<u128> {
    let scaled_rate = prorated_rate(monthly_rate, elapsed_seconds)?;
    let growth = PRECISION
        .checked_add(scaled_rate)
        .ok_or(error!(TrancheError::MathOverflow))?;

    mul_div(old_index, growth)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u128 = PRECISION;
    const DAY: i64 = SECONDS_PER_DAY as i64;

    #[test]
    fn test_penalty_without_cooldown() {
        let now = 1_700_000_000;
        let result = withdrawal_penalty(1_000, 0, now).unwrap();
        assert_eq!(result.penalty, 200);
        assert_eq!(result.net, 800);
    }

    #[test]
    fn test_penalty_after_cooldown() {
        let now = 1_700_000_000;
        let result = withdrawal_penalty(1_000, now - 8 * DAY, now).unwrap();
        assert_eq!(result.penalty, 0);
        assert_eq!(result.net, 1_000);
    }

    #[test]
    fn test_penalty_cooldown_boundary() {
        let now = 1_700_000_000;

        // Exactly 7 days: cooldown complete
        let result = withdrawal_penalty(1_000, now - 7 * DAY, now).unwrap();
        assert_eq!(result.penalty, 0);

        // One second short: still penalized
        let result = withdrawal_penalty(1_000, now - 7 * DAY + 1, now).unwrap();
        assert_eq!(result.penalty, 200);
    }

    #[test]
    fn test_penalty_zero_amount_fails() {
        assert_eq!(
            withdrawal_penalty(0, 0, 1_700_000_000).unwrap_err(),
            TrancheError::InvalidWithdrawalAmount.into()
        );
    }

    #[test]
    fn test_management_fee_full_year() {
        let fee = management_fee_tokens(1_000_000 * ONE, SECONDS_PER_YEAR).unwrap();
        assert_eq!(fee, 5_000 * ONE);
    }

    #[test]
    fn test_management_fee_is_linear_in_time() {
        let value = 2_345_678 * ONE;
        let one_day = management_fee_tokens(value, SECONDS_PER_DAY).unwrap();
        let ten_days = management_fee_tokens(value, 10 * SECONDS_PER_DAY).unwrap();

        // Floor rounding differs by at most a unit per division
        assert!(ten_days >= one_day * 10);
        assert!(ten_days - one_day * 10 <= 10);
        assert_eq!(management_fee_tokens(value, 0).unwrap(), 0);
    }

    #[test]
    fn test_monthly_approximation_close_to_prorated() {
        let value = 1_000_000 * ONE;
        let monthly = management_fee_monthly(value).unwrap();
        let prorated = management_fee_tokens(value, SECONDS_PER_MONTH).unwrap();

        // 1/12 of a year vs 30/365 of a year
        assert!(monthly > prorated);
        assert!(monthly - prorated < 12 * ONE);
    }

    #[test]
    fn test_performance_fee_two_percent() {
        assert_eq!(performance_fee(10_000 * ONE).unwrap(), 200 * ONE);
        assert_eq!(performance_fee(0).unwrap(), 0);
    }

    #[test]
    fn test_rebase_supply_full_month_at_twelve_percent() {
        let supply = 1_000_000 * ONE;
        let result = rebase_supply(supply, TIER_12_MONTHLY_RATE, SECONDS_PER_MONTH, 500 * ONE).unwrap();

        assert_eq!(result.scaled_rate, TIER_12_MONTHLY_RATE);
        assert_eq!(result.user_tokens, 10_000 * ONE);
        assert_eq!(result.performance_fee_tokens, 200 * ONE);
        assert_eq!(result.management_fee_tokens, 500 * ONE);
        assert_eq!(result.new_supply, 1_010_700 * ONE);
        assert_eq!(result.fee_tokens().unwrap(), 700 * ONE);
    }

    #[test]
    fn test_rebase_supply_half_month() {
        let supply = 1_000_000 * ONE;
        let result = rebase_supply(supply, TIER_12_MONTHLY_RATE, SECONDS_PER_MONTH / 2, 0).unwrap();
        assert_eq!(result.user_tokens, 5_000 * ONE);
        assert_eq!(result.new_supply, 1_005_100 * ONE);
    }

    #[test]
    fn test_rebase_index_grows_by_rate_only() {
        let index = rebase_index(ONE, TIER_12_MONTHLY_RATE, SECONDS_PER_MONTH).unwrap();
        assert_eq!(index, 1_010_000_000_000_000_000);
    }

    #[test]
    fn test_rebase_index_does_not_fold_in_performance_fee() {
        // Regression: an older revision grew the index by rate * 1.02,
        // paying the performance fee both through the index and via minted
        // fee tokens.
        let shares = 1_000_000 * ONE;
        let supply = shares;

        let index = rebase_index(ONE, TIER_12_MONTHLY_RATE, SECONDS_PER_MONTH).unwrap();
        let defective_rate = mul_div(TIER_12_MONTHLY_RATE, ONE + PERFORMANCE_FEE).unwrap();
        let defective_index = mul_div(ONE, ONE + defective_rate).unwrap();

        assert_eq!(index, 1_010_000_000_000_000_000);
        assert_eq!(defective_index, 1_010_200_000_000_000_000);

        // Holders' visible balances must grow by exactly the user tokens
        let growth = rebase_supply(supply, TIER_12_MONTHLY_RATE, SECONDS_PER_MONTH, 0).unwrap();
        let holder_balance = mul_div(shares, index).unwrap();
        assert_eq!(holder_balance, supply + growth.user_tokens);

        // The defective index would hand holders the fee tokens too
        let defective_balance = mul_div(shares, defective_index).unwrap();
        assert_eq!(defective_balance - holder_balance, growth.performance_fee_tokens);
    }

    #[test]
    fn test_rebase_index_zero_elapsed_is_unchanged() {
        let index = 1_234_567_890_000_000_000;
        assert_eq!(rebase_index(index, TIER_13_MONTHLY_RATE, 0).unwrap(), index);
    }
}
