//! Event definitions

use anchor_lang::prelude::*;

#[event]
pub struct ProtocolInitialized {
    pub state: Pubkey,
    pub admin: Pubkey,
    pub keeper: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when the keeper pushes fresh tranche values
#[event]
pub struct ValuationsUpdated {
    pub senior_value: u128,
    pub junior_value: u128,
    pub reserve_value: u128,
    /// Backing ratio at the new values (0 while Senior supply is empty)
    pub backing_ratio: u128,
    pub timestamp: i64,
}

#[event]
pub struct SeniorDeposited {
    pub owner: Pubkey,
    pub amount: u128,
    pub shares_minted: u128,
    pub rebase_index: u128,
    pub total_supply: u128,
    pub deposit_cap: u128,
    pub timestamp: i64,
}

#[event]
pub struct CooldownStarted {
    pub owner: Pubkey,
    pub cooldown_start: i64,
    pub cooldown_end: i64,
}

#[event]
pub struct SeniorWithdrawn {
    pub owner: Pubkey,
    pub amount: u128,
    pub shares_burned: u128,
    pub penalty: u128,
    pub net: u128,
    pub timestamp: i64,
}

/// Event emitted once per committed epoch
#[event]
pub struct RebaseExecuted {
    pub epoch: u64,
    pub elapsed_seconds: u64,
    /// Granted tier in basis points (1300 / 1200 / 1100)
    pub apy_bps: u16,
    /// 0 = backstop, 1 = healthy, 2 = spillover
    pub zone: u8,
    pub old_index: u128,
    pub new_index: u128,
    pub new_supply: u128,
    pub user_tokens: u128,
    pub performance_fee_tokens: u128,
    pub management_fee_tokens: u128,
    /// Backing ratio after the epoch's supply growth, before transfers
    pub backing_ratio: u128,
    pub spillover_to_junior: u128,
    pub spillover_to_reserve: u128,
    pub backstop_from_reserve: u128,
    pub backstop_from_junior: u128,
    /// Whether the backstop reached its restore target (true when it didn't run)
    pub fully_restored: bool,
    pub senior_value: u128,
    pub junior_value: u128,
    pub reserve_value: u128,
    pub timestamp: i64,
}
