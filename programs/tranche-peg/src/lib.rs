// =============================================================================
// Tranche Peg - Senior / Junior / Reserve Accounting on Solana
// =============================================================================
//
// A three-tranche structured product:
// - Senior holders get a rebasing, near-stable token paying 11-13% APY
// - Junior absorbs first losses after Reserve and captures excess returns
// - Reserve is the first line of the backstop and the deposit-cap anchor
//
// Each epoch the keeper pushes tranche valuations and triggers a rebase.
// The program grants the highest yield tier Senior backing can carry,
// spills excess above 110% backing to Junior/Reserve, and refills Senior
// from Reserve then Junior when backing drops below 100%.
// =============================================================================

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod math;
pub mod state;

use anchor_lang::prelude::*;

pub use constants::*;
pub use error::*;
pub use events::*;
pub use instructions::*;
pub use state::*;

declare_id!("3X3yKRCy8wXEEztcXnY28HRrDwxKTSDvc2HXg3bFTzBR");

#[program]
pub mod tranche_peg {
    use super::*;

    // =========================================================================
    // Setup
    // =========================================================================

    /// Create the global TrancheState
    ///
    /// Senior starts empty with rebase index 1.0. The `keeper` account passed
    /// in becomes the only key allowed to push valuations and rebase.
    pub fn initialize_protocol(ctx: Context<InitializeProtocol>) -> Result<()> {
        instructions::initialize_protocol::handler_initialize_protocol(ctx)
    }

    // =========================================================================
    // Keeper Operations
    // =========================================================================

    /// Push the USD value of each tranche (keeper only)
    ///
    /// # Arguments
    /// * `senior_value` - Senior vault value (1e18 = $1)
    /// * `junior_value` - Junior vault value
    /// * `reserve_value` - Reserve vault value
    pub fn update_valuations(
        ctx: Context<UpdateValuations>,
        senior_value: u128,
        junior_value: u128,
        reserve_value: u128,
    ) -> Result<()> {
        instructions::update_valuations::handler_update_valuations(
            ctx,
            senior_value,
            junior_value,
            reserve_value,
        )
    }

    /// Close one epoch (keeper only)
    ///
    /// Picks the yield tier, mints fees, rebalances across tranches and
    /// advances the rebase index. Requires MIN_REBASE_INTERVAL_SECONDS since
    /// the previous rebase.
    pub fn rebase(ctx: Context<Rebase>) -> Result<()> {
        instructions::rebase::handler_rebase(ctx)
    }

    // =========================================================================
    // Holder Operations
    // =========================================================================

    /// Deposit into Senior
    ///
    /// # Arguments
    /// * `amount` - USD amount (1e18 = $1), at least MIN_DEPOSIT_AMOUNT
    ///
    /// Fails if Senior supply would exceed 10x the Reserve value.
    pub fn deposit_senior(ctx: Context<DepositSenior>, amount: u128) -> Result<()> {
        instructions::deposit::handler_deposit_senior(ctx, amount)
    }

    /// Start the withdrawal cooldown
    ///
    /// After COOLDOWN_PERIOD_SECONDS the holder can withdraw without the 20%
    /// early-exit penalty.
    pub fn start_cooldown(ctx: Context<StartCooldown>) -> Result<()> {
        instructions::start_cooldown::handler_start_cooldown(ctx)
    }

    /// Withdraw from Senior
    ///
    /// # Arguments
    /// * `amount` - Visible Senior balance to redeem
    ///
    /// Before the cooldown completes, 20% of `amount` goes to Reserve.
    pub fn withdraw_senior(ctx: Context<WithdrawSenior>, amount: u128) -> Result<()> {
        instructions::withdraw::handler_withdraw_senior(ctx, amount)
    }

    // =========================================================================
    // Admin Operations
    // =========================================================================

    /// Pause or unpause the protocol (admin only)
    ///
    /// When paused no deposits, withdrawals or rebases go through.
    pub fn pause_protocol(ctx: Context<PauseProtocol>, paused: bool) -> Result<()> {
        instructions::admin::handler_pause_protocol(ctx, paused)
    }

    /// Rotate the keeper key (admin only)
    pub fn update_keeper(ctx: Context<UpdateKeeper>) -> Result<()> {
        instructions::admin::handler_update_keeper(ctx)
    }

    /// Transfer admin rights to a new address (admin only)
    ///
    /// # Warning
    /// * Irreversible; double-check the new admin address
    pub fn transfer_admin(ctx: Context<TransferAdmin>) -> Result<()> {
        instructions::admin::handler_transfer_admin(ctx)
    }
}
