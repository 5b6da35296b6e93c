// =============================================================================
// SeniorPosition Account
// =============================================================================
// One per holder. Stores the holder's Senior shares plus the cooldown clock
// that decides whether a withdrawal pays the early-exit penalty.
//
// Balances are never stored: a holder's visible Senior balance is always
// shares * rebase_index, so a rebase grows every holder without touching
// their account.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::TrancheError;
use crate::math::fixed_point::balance_from_shares;

/// A holder's Senior position. PDA: ["position", tranche_state, owner]
#[account]
#[derive(InitSpace)]
pub struct SeniorPosition {
    // =========================================================================
    // Account References
    // =========================================================================

    /// The TrancheState this position belongs to
    pub state: Pubkey,

    /// Wallet that must sign deposits, cooldowns and withdrawals
    pub owner: Pubkey,

    // =========================================================================
    // Position Tracking
    // =========================================================================

    /// Current Senior shares held
    pub shares: u128,

    /// Cumulative USD deposited
    pub total_deposited: u128,

    /// Cumulative USD paid out, net of penalties
    pub total_withdrawn: u128,

    /// Cumulative early-withdrawal penalties paid
    pub total_penalties: u128,

    pub deposit_count: u32,

    // =========================================================================
    // Timestamps
    // =========================================================================

    /// When the holder started the cooldown clock (0 = never)
    pub cooldown_start: i64,

    pub last_deposit_timestamp: i64,

    pub last_withdrawal_timestamp: i64,

    pub bump: u8,
}

impl SeniorPosition {
    /// Visible Senior balance at `rebase_index`
    pub fn balance(&self, rebase_index: u128) -> Result<u128> {
        balance_from_shares(self.shares, rebase_index)
    }

    pub fn record_deposit(&mut self, amount: u128, shares: u128, timestamp: i64) -> Result<()> {
        self.shares = self
            .shares
            .checked_add(shares)
            .ok_or(error!(TrancheError::MathOverflow))?;

        self.total_deposited = self
            .total_deposited
            .checked_add(amount)
            .ok_or(error!(TrancheError::MathOverflow))?;

        self.deposit_count = self
            .deposit_count
            .checked_add(1)
            .ok_or(error!(TrancheError::MathOverflow))?;

        self.last_deposit_timestamp = timestamp;

        Ok(())
    }

    /// Burn `shares` and book the payout
    ///
    /// The cooldown is consumed by a withdrawal; the next exit needs a fresh
    /// one to avoid the penalty.
    pub fn record_withdrawal(
        &mut self,
        shares: u128,
        net: u128,
        penalty: u128,
        timestamp: i64,
    ) -> Result<()> {
        self.shares = self
            .shares
            .checked_sub(shares)
            .ok_or(error!(TrancheError::InsufficientShares))?;

        self.total_withdrawn = self
            .total_withdrawn
            .checked_add(net)
            .ok_or(error!(TrancheError::MathOverflow))?;

        self.total_penalties = self
            .total_penalties
            .checked_add(penalty)
            .ok_or(error!(TrancheError::MathOverflow))?;

        self.cooldown_start = 0;
        self.last_withdrawal_timestamp = timestamp;

        Ok(())
    }

    /// Start (or restart) the cooldown clock
    pub fn start_cooldown(&mut self, timestamp: i64) -> Result<()> {
        require!(self.shares > 0, TrancheError::InsufficientShares);
        self.cooldown_start = timestamp;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PRECISION;

    const ONE: u128 = PRECISION;

    fn empty_position() -> SeniorPosition {
        SeniorPosition {
            state: Pubkey::default(),
            owner: Pubkey::default(),
            shares: 0,
            total_deposited: 0,
            total_withdrawn: 0,
            total_penalties: 0,
            deposit_count: 0,
            cooldown_start: 0,
            last_deposit_timestamp: 0,
            last_withdrawal_timestamp: 0,
            bump: 0,
        }
    }

    #[test]
    fn test_balance_follows_index() {
        let mut position = empty_position();
        position.record_deposit(1_000 * ONE, 1_000 * ONE, 100).unwrap();

        assert_eq!(position.balance(ONE).unwrap(), 1_000 * ONE);
        assert_eq!(position.balance(ONE + ONE / 100).unwrap(), 1_010 * ONE);
        assert_eq!(position.deposit_count, 1);
        assert_eq!(position.last_deposit_timestamp, 100);
    }

    #[test]
    fn test_cooldown_requires_shares() {
        let mut position = empty_position();
        assert_eq!(
            position.start_cooldown(100).unwrap_err(),
            TrancheError::InsufficientShares.into()
        );

        position.record_deposit(ONE, ONE, 100).unwrap();
        position.start_cooldown(200).unwrap();
        assert_eq!(position.cooldown_start, 200);
    }

    #[test]
    fn test_withdrawal_resets_cooldown() {
        let mut position = empty_position();
        position.record_deposit(1_000 * ONE, 1_000 * ONE, 100).unwrap();
        position.start_cooldown(200).unwrap();

        position.record_withdrawal(400 * ONE, 400 * ONE, 0, 300).unwrap();

        assert_eq!(position.shares, 600 * ONE);
        assert_eq!(position.total_withdrawn, 400 * ONE);
        assert_eq!(position.cooldown_start, 0);
        assert_eq!(position.last_withdrawal_timestamp, 300);
    }

    #[test]
    fn test_over_burn_rejected() {
        let mut position = empty_position();
        position.record_deposit(ONE, ONE, 100).unwrap();

        assert_eq!(
            position.record_withdrawal(ONE + 1, ONE, 0, 200).unwrap_err(),
            TrancheError::InsufficientShares.into()
        );
    }
}
