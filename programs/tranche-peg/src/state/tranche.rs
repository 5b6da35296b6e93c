// =============================================================================
// Tranche Records
// =============================================================================
// Plain value records for the three tranches. These are what the engine
// reads and produces; TrancheState embeds one copy as the committed ledger.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::PRECISION;
use crate::error::TrancheError;
use crate::math::fixed_point::{ratio, total_supply};

/// The rebasing Senior tranche
///
/// Holders own internal shares; their visible balance is
/// `shares * rebase_index / PRECISION`. Invariant:
/// `total_supply ~= total_shares * rebase_index / PRECISION` (floor rounding).
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct SeniorTranche {
    /// USD value backing Senior (fixed-point, trusted input)
    pub usd_value: u128,

    /// Visible Senior token supply
    pub total_supply: u128,

    /// Internal shares outstanding (holders + treasury)
    pub total_shares: u128,

    /// Shares -> balance multiplier, starts at 1.0 and only grows
    pub rebase_index: u128,
}

impl Default for SeniorTranche {
    fn default() -> Self {
        Self {
            usd_value: 0,
            total_supply: 0,
            total_shares: 0,
            rebase_index: PRECISION,
        }
    }
}

impl SeniorTranche {
    /// Supply implied by shares and index
    pub fn implied_supply(&self) -> Result<u128> {
        total_supply(self.total_shares, self.rebase_index)
    }
}

/// Senior, Junior and Reserve values as one record
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct TrancheBalances {
    pub senior: SeniorTranche,

    /// USD value of the Junior tranche (first-loss capital after Reserve)
    pub junior_value: u128,

    /// USD value of the Reserve tranche (first line of the backstop)
    pub reserve_value: u128,
}

impl TrancheBalances {
    /// Sum of all three tranche values
    pub fn total_value(&self) -> Result<u128> {
        self.senior
            .usd_value
            .checked_add(self.junior_value)
            .and_then(|v| v.checked_add(self.reserve_value))
            .ok_or(error!(TrancheError::MathOverflow))
    }

    /// Current backing ratio; zero supply has no ratio
    pub fn backing_ratio(&self) -> Result<u128> {
        ratio(self.senior.usd_value, self.senior.total_supply)
    }
}
