// =============================================================================
// TrancheState Account
// =============================================================================
// The single global ledger for the three tranches.
//
// Every instruction that changes balances takes this account as `mut`, so
// the runtime serializes them: no instruction can observe a half-applied
// rebase. Handlers compute their full result first and then commit it here
// in one call.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::TrancheError;
use crate::math::fees::WithdrawalPenalty;
use crate::math::fixed_point::{deposit_cap, shares_from_balance, shares_from_balance_ceil};
use crate::math::rebase::RebaseOutcome;
use crate::state::TrancheBalances;

/// Global protocol state. PDA: ["tranche_state"]
#[account]
#[derive(InitSpace)]
pub struct TrancheState {
    // =========================================================================
    // Authority
    // =========================================================================

    /// Can pause, rotate the keeper and hand over admin
    pub admin: Pubkey,

    /// Pushes valuations and triggers rebases
    pub keeper: Pubkey,

    // =========================================================================
    // Ledger
    // =========================================================================

    pub balances: TrancheBalances,

    /// Senior shares minted to the protocol for performance + management fees
    pub treasury_shares: u128,

    // =========================================================================
    // Epoch Tracking
    // =========================================================================

    /// Unix timestamp the last epoch was accounted up to
    pub last_rebase_timestamp: i64,

    /// Unix timestamp of the keeper's last valuation push
    pub last_valuation_timestamp: i64,

    /// Number of rebases committed
    pub epoch: u64,

    // =========================================================================
    // Lifetime Statistics
    // =========================================================================

    /// Senior value moved out to Junior + Reserve by spillover
    pub total_spilled_over: u128,

    /// Senior value pulled in from Reserve + Junior by backstop
    pub total_backstopped: u128,

    /// Early-withdrawal penalties routed to Reserve
    pub total_penalties: u128,

    // =========================================================================
    // Status
    // =========================================================================

    /// When true, no deposits, withdrawals or rebases
    pub is_paused: bool,

    pub bump: u8,
}

impl TrancheState {
    /// Maximum Senior supply the current Reserve allows
    pub fn deposit_cap(&self) -> Result<u128> {
        deposit_cap(self.balances.reserve_value)
    }

    /// Record a Senior deposit of `amount` USD
    ///
    /// Mints floor shares at the current index and grows Senior value and
    /// supply by the same amount. Returns the shares minted.
    pub fn record_deposit(&mut self, amount: u128) -> Result<u128> {
        let senior = &self.balances.senior;

        let new_supply = senior
            .total_supply
            .checked_add(amount)
            .ok_or(error!(TrancheError::MathOverflow))?;
        require!(new_supply <= self.deposit_cap()?, TrancheError::ExceedsDepositCap);

        let shares = shares_from_balance(amount, senior.rebase_index)?;
        require!(shares > 0, TrancheError::InvalidAmount);

        let new_value = senior
            .usd_value
            .checked_add(amount)
            .ok_or(error!(TrancheError::MathOverflow))?;
        let new_shares = senior
            .total_shares
            .checked_add(shares)
            .ok_or(error!(TrancheError::MathOverflow))?;

        let senior = &mut self.balances.senior;
        senior.total_supply = new_supply;
        senior.usd_value = new_value;
        senior.total_shares = new_shares;

        Ok(shares)
    }

    /// Record a Senior withdrawal of `amount` visible balance
    ///
    /// Burns ceiling shares so the ledger never under-burns. The net amount
    /// leaves Senior; the penalty moves from Senior to Reserve. Returns the
    /// shares burned.
    pub fn record_withdrawal(&mut self, amount: u128, penalty: &WithdrawalPenalty) -> Result<u128> {
        let senior = &self.balances.senior;

        let shares = shares_from_balance_ceil(amount, senior.rebase_index)?;

        let new_shares = senior
            .total_shares
            .checked_sub(shares)
            .ok_or(error!(TrancheError::InsufficientShares))?;
        let new_supply = senior
            .total_supply
            .checked_sub(amount)
            .ok_or(error!(TrancheError::InsufficientShares))?;
        let new_value = senior
            .usd_value
            .checked_sub(amount)
            .ok_or(error!(TrancheError::MathUnderflow))?;
        let new_reserve = self
            .balances
            .reserve_value
            .checked_add(penalty.penalty)
            .ok_or(error!(TrancheError::MathOverflow))?;
        let new_total_penalties = self
            .total_penalties
            .checked_add(penalty.penalty)
            .ok_or(error!(TrancheError::MathOverflow))?;

        let senior = &mut self.balances.senior;
        senior.total_shares = new_shares;
        senior.total_supply = new_supply;
        senior.usd_value = new_value;
        self.balances.reserve_value = new_reserve;
        self.total_penalties = new_total_penalties;

        Ok(shares)
    }

    /// Commit a computed rebase epoch
    pub fn commit_rebase(&mut self, outcome: &RebaseOutcome, timestamp: i64) -> Result<()> {
        let spilled = outcome
            .spillover
            .map(|s| s.excess)
            .unwrap_or_default();
        let backstopped = outcome
            .backstop
            .map(|b| b.from_reserve + b.from_junior)
            .unwrap_or_default();

        let treasury_shares = self
            .treasury_shares
            .checked_add(outcome.fee_shares)
            .ok_or(error!(TrancheError::MathOverflow))?;
        let total_spilled_over = self
            .total_spilled_over
            .checked_add(spilled)
            .ok_or(error!(TrancheError::MathOverflow))?;
        let total_backstopped = self
            .total_backstopped
            .checked_add(backstopped)
            .ok_or(error!(TrancheError::MathOverflow))?;
        let epoch = self
            .epoch
            .checked_add(1)
            .ok_or(error!(TrancheError::MathOverflow))?;

        self.balances = outcome.balances;
        self.treasury_shares = treasury_shares;
        self.total_spilled_over = total_spilled_over;
        self.total_backstopped = total_backstopped;
        self.epoch = epoch;
        self.last_rebase_timestamp = timestamp;

        Ok(())
    }
}
