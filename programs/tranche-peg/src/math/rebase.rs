// =============================================================================
// Rebase Orchestrator
// =============================================================================
// One epoch of Senior accounting, composed from the pieces above:
//
//   1. management fee tokens for the elapsed time (dilutive, added to supply)
//   2. highest sustainable yield tier
//   3. zone of the hypothetical post-rebase backing ratio
//   4. spillover or backstop transfer between tranches
//   5. new rebase index
//   6. new supply, index and treasury fee shares
//
// The result is computed into a fresh TrancheBalances; the caller's copy is
// never touched. Committing it is a single assignment by the owner of the
// state, so an error anywhere leaves the ledger exactly as it was.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::TrancheError;
use crate::math::apy::{select_apy, ApySelection};
use crate::math::fees::{management_fee_tokens, rebase_index};
use crate::math::fixed_point::shares_from_balance;
use crate::math::zones::{
    classify, compute_backstop, compute_spillover, BackstopTransfer, SpilloverTransfer,
    TrancheTransfer, Zone,
};
use crate::state::TrancheBalances;

/// Everything one epoch produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RebaseOutcome {
    pub elapsed_seconds: u64,
    pub management_fee_tokens: u128,
    pub selection: ApySelection,
    /// Zone of `senior value / selection new supply`
    pub zone: Zone,
    pub spillover: Option<SpilloverTransfer>,
    pub backstop: Option<BackstopTransfer>,
    /// Value movements in execution order
    pub transfers: Vec<TrancheTransfer>,
    /// Shares minted to the treasury for performance + management fees
    pub fee_shares: u128,
    pub new_index: u128,
    pub new_supply: u128,
    /// Tranche balances after the epoch
    pub balances: TrancheBalances,
}

impl RebaseOutcome {
    /// `Some(flag)` when the backstop ran this epoch
    pub fn fully_restored(&self) -> Option<bool> {
        self.backstop.map(|b| b.fully_restored)
    }
}

/// Compute one rebase epoch over `current` balances
pub fn compute_rebase(current: &TrancheBalances, elapsed_seconds: u64) -> Result<RebaseOutcome> {
    let senior = current.senior;
    let mut next = *current;

    // Step 1: management fee on gross Senior value
    let management_fee_tokens = management_fee_tokens(senior.usd_value, elapsed_seconds)?;

    // Step 2: tier selection (fee tokens count against the peg)
    let selection = select_apy(
        senior.total_supply,
        senior.usd_value,
        elapsed_seconds,
        management_fee_tokens,
    )?;
    let new_supply = selection.supply.new_supply;

    // Step 3
    let zone = classify(selection.backing_ratio);

    // Step 4
    let mut spillover = None;
    let mut backstop = None;
    let mut transfers = Vec::new();

    if zone == Zone::Spillover {
        let s = compute_spillover(senior.usd_value, new_supply)?;

        next.senior.usd_value = s.senior_final;
        next.junior_value = next
            .junior_value
            .checked_add(s.to_junior)
            .ok_or(error!(TrancheError::MathOverflow))?;
        next.reserve_value = next
            .reserve_value
            .checked_add(s.to_reserve)
            .ok_or(error!(TrancheError::MathOverflow))?;

        transfers.extend(s.transfers());
        spillover = Some(s);
    } else if zone == Zone::Backstop || selection.backstop_needed {
        let b = compute_backstop(
            senior.usd_value,
            new_supply,
            current.reserve_value,
            current.junior_value,
        )?;

        next.senior.usd_value = b.senior_final;
        next.reserve_value = next
            .reserve_value
            .checked_sub(b.from_reserve)
            .ok_or(error!(TrancheError::MathUnderflow))?;
        next.junior_value = next
            .junior_value
            .checked_sub(b.from_junior)
            .ok_or(error!(TrancheError::MathUnderflow))?;

        transfers.extend(b.transfers());
        backstop = Some(b);
    }

    // Step 5: index grows by the user yield only
    let new_index = rebase_index(senior.rebase_index, selection.monthly_rate, elapsed_seconds)?;

    // Step 6: fee tokens become treasury shares at the new index so that
    // supply ~= shares * index keeps holding
    let fee_shares = shares_from_balance(selection.supply.fee_tokens()?, new_index)?;

    next.senior.total_supply = new_supply;
    next.senior.rebase_index = new_index;
    next.senior.total_shares = next
        .senior
        .total_shares
        .checked_add(fee_shares)
        .ok_or(error!(TrancheError::MathOverflow))?;

    Ok(RebaseOutcome {
        elapsed_seconds,
        management_fee_tokens,
        selection,
        zone,
        spillover,
        backstop,
        transfers,
        fee_shares,
        new_index,
        new_supply,
        balances: next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::math::apy::{ApyTier, APY_TIERS};
    use crate::math::fees::management_fee_tokens as mgmt_fee;
    use crate::math::fixed_point::mul_div;
    use crate::math::zones::Tranche;
    use crate::state::SeniorTranche;

    const ONE: u128 = PRECISION;

    fn balances(senior_value: u128, supply: u128, junior: u128, reserve: u128) -> TrancheBalances {
        TrancheBalances {
            senior: SeniorTranche {
                usd_value: senior_value,
                total_supply: supply,
                total_shares: supply,
                rebase_index: ONE,
            },
            junior_value: junior,
            reserve_value: reserve,
        }
    }

    fn abs_diff(a: u128, b: u128) -> u128 {
        if a > b { a - b } else { b - a }
    }

    #[test]
    fn test_healthy_epoch_moves_nothing() {
        let current = balances(1_050_000 * ONE, 1_000_000 * ONE, 200_000 * ONE, 100_000 * ONE);
        let outcome = compute_rebase(&current, SECONDS_PER_MONTH).unwrap();

        assert_eq!(outcome.selection.tier, ApyTier::Apy13);
        assert_eq!(outcome.zone, Zone::Healthy);
        assert!(outcome.transfers.is_empty());
        assert_eq!(outcome.fully_restored(), None);

        assert_eq!(outcome.balances.senior.usd_value, current.senior.usd_value);
        assert_eq!(outcome.balances.junior_value, current.junior_value);
        assert_eq!(outcome.balances.reserve_value, current.reserve_value);
        assert!(outcome.new_index > ONE);
        assert_eq!(outcome.balances.senior.total_supply, outcome.new_supply);
    }

    #[test]
    fn test_management_fee_counted_once() {
        let current = balances(1_050_000 * ONE, 1_000_000 * ONE, 0, 100_000 * ONE);
        let outcome = compute_rebase(&current, SECONDS_PER_MONTH).unwrap();

        let fee = mgmt_fee(current.senior.usd_value, SECONDS_PER_MONTH).unwrap();
        assert_eq!(outcome.management_fee_tokens, fee);

        let s = outcome.selection.supply;
        assert_eq!(
            outcome.new_supply,
            current.senior.total_supply + s.user_tokens + s.performance_fee_tokens + fee
        );
    }

    #[test]
    fn test_spillover_epoch() {
        let current = balances(1_300_000 * ONE, 1_000_000 * ONE, 100_000 * ONE, 50_000 * ONE);
        let outcome = compute_rebase(&current, SECONDS_PER_MONTH).unwrap();

        assert_eq!(outcome.selection.tier, ApyTier::Apy13);
        assert_eq!(outcome.zone, Zone::Spillover);

        let s = outcome.spillover.unwrap();
        assert_eq!(s.target, mul_div(outcome.new_supply, SENIOR_TARGET_BACKING).unwrap());
        assert_eq!(outcome.balances.senior.usd_value, s.target);
        assert_eq!(outcome.balances.junior_value, 100_000 * ONE + s.to_junior);
        assert_eq!(outcome.balances.reserve_value, 50_000 * ONE + s.to_reserve);

        assert_eq!(outcome.transfers.len(), 2);
        assert!(outcome.transfers.iter().all(|t| t.from == Tranche::Senior));
        assert_eq!(
            outcome.balances.total_value().unwrap(),
            current.total_value().unwrap()
        );
    }

    #[test]
    fn test_backstop_epoch_partial() {
        let current = balances(900_000 * ONE, 1_000_000 * ONE, 30_000 * ONE, 50_000 * ONE);
        let outcome = compute_rebase(&current, SECONDS_PER_MONTH).unwrap();

        assert_eq!(outcome.selection.tier, ApyTier::Apy11);
        assert!(outcome.selection.backstop_needed);
        assert_eq!(outcome.zone, Zone::Backstop);
        assert_eq!(outcome.fully_restored(), Some(false));

        // Both buffers drained, Reserve first
        assert_eq!(outcome.balances.reserve_value, 0);
        assert_eq!(outcome.balances.junior_value, 0);
        assert_eq!(outcome.balances.senior.usd_value, 980_000 * ONE);
        assert_eq!(outcome.transfers[0].from, Tranche::Reserve);
        assert_eq!(outcome.transfers[1].from, Tranche::Junior);

        // Floor yield still minted
        assert!(outcome.new_index > ONE);
    }

    #[test]
    fn test_backstop_epoch_full_restore() {
        let current = balances(995_000 * ONE, 1_000_000 * ONE, 30_000 * ONE, 50_000 * ONE);
        let outcome = compute_rebase(&current, SECONDS_PER_MONTH).unwrap();

        assert_eq!(outcome.zone, Zone::Backstop);
        assert_eq!(outcome.fully_restored(), Some(true));

        let b = outcome.backstop.unwrap();
        assert_eq!(b.from_junior, 0);
        assert_eq!(
            outcome.balances.senior.usd_value,
            mul_div(outcome.new_supply, SENIOR_RESTORE_BACKING).unwrap()
        );
        assert_eq!(
            outcome.balances.total_value().unwrap(),
            current.total_value().unwrap()
        );
    }

    #[test]
    fn test_input_untouched_on_error() {
        let current = balances(ONE, 0, 0, 0);
        let snapshot = current;
        assert_eq!(
            compute_rebase(&current, SECONDS_PER_MONTH).unwrap_err(),
            TrancheError::InvalidSupply.into()
        );
        assert_eq!(current, snapshot);

        let current = balances(0, ONE, 0, 0);
        assert_eq!(
            compute_rebase(&current, SECONDS_PER_MONTH).unwrap_err(),
            TrancheError::InvalidVaultValue.into()
        );
    }

    #[test]
    fn test_supply_tracks_shares_times_index() {
        let mut current = balances(1_050_000 * ONE, 1_000_000 * ONE, 0, 100_000 * ONE);

        for epoch in 1..=12u128 {
            let outcome = compute_rebase(&current, SECONDS_PER_MONTH).unwrap();
            current = outcome.balances;

            // Each epoch the index floors by at most one unit, which moves
            // the implied supply by at most shares / PRECISION
            let per_epoch = current.senior.total_shares / ONE + 4;
            let implied = current.senior.implied_supply().unwrap();
            assert!(abs_diff(implied, current.senior.total_supply) <= 2 * epoch * per_epoch);
        }
    }

    #[test]
    fn test_index_growth_linear_in_elapsed() {
        let current = balances(1_050_000 * ONE, 1_000_000 * ONE, 0, 100_000 * ONE);

        let one = compute_rebase(&current, 5 * SECONDS_PER_DAY).unwrap();
        let two = compute_rebase(&current, 10 * SECONDS_PER_DAY).unwrap();
        assert_eq!(one.selection.tier, two.selection.tier);

        let growth_one = one.new_index - ONE;
        let growth_two = two.new_index - ONE;
        assert!(growth_one > 0);
        assert!(abs_diff(growth_two, 2 * growth_one) <= 2);
    }

    #[test]
    fn test_restore_buffer_survives_floor_tier_epoch() {
        // SENIOR_RESTORE_BACKING was sized against the floor tier. If the
        // floor rate or fee schedule changes, revalidate the buffer.
        let (floor_tier, floor_rate) = APY_TIERS[APY_TIERS.len() - 1];
        assert_eq!(floor_tier, ApyTier::Apy11);
        assert_eq!(
            floor_rate, TIER_11_MONTHLY_RATE,
            "floor tier rate changed - revalidate SENIOR_RESTORE_BACKING"
        );

        // Senior freshly restored to 100.9%, then a full month at the floor
        let supply = 1_000_000 * ONE;
        let restored = mul_div(supply, SENIOR_RESTORE_BACKING).unwrap();
        let current = balances(restored, supply, 0, 0);
        let outcome = compute_rebase(&current, SECONDS_PER_MONTH).unwrap();

        assert!(
            !outcome.selection.backstop_needed,
            "100.9% buffer no longer covers one floor-tier epoch (ratio {})",
            outcome.selection.backing_ratio
        );
        assert_ne!(outcome.zone, Zone::Backstop);
    }
}
