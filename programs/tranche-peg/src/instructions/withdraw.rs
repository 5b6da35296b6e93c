// =============================================================================
// Withdraw Senior Instruction
// =============================================================================
// Redeems part of a holder's visible Senior balance.
//
// Flow:
// 1. Check the holder's balance (shares * index) covers the amount
// 2. Price the early-exit penalty off the holder's cooldown clock
// 3. Burn ceil(amount / index) shares so the ledger never under-burns
// 4. Net amount leaves Senior; the penalty moves from Senior to Reserve
//
// The penalty is waived only once a cooldown was started and has run its
// full COOLDOWN_PERIOD_SECONDS.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::TrancheError;
use crate::events::SeniorWithdrawn;
use crate::math::fees::withdrawal_penalty;
use crate::state::{SeniorPosition, TrancheState};

/// Accounts required for the withdraw_senior instruction
#[derive(Accounts)]
pub struct WithdrawSenior<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [TRANCHE_STATE_SEED],
        bump = tranche_state.bump,
        constraint = !tranche_state.is_paused @ TrancheError::ProtocolPaused
    )]
    pub tranche_state: Account<'info, TrancheState>,

    #[account(
        mut,
        seeds = [POSITION_SEED, tranche_state.key().as_ref(), owner.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == owner.key() @ TrancheError::InvalidAuthority
    )]
    pub position: Account<'info, SeniorPosition>,
}

/// Handler for the withdraw_senior instruction
///
/// # Arguments
/// * `amount` - Visible Senior balance to redeem (fixed-point, 1e18 = $1)
pub fn handler_withdraw_senior(ctx: Context<WithdrawSenior>, amount: u128) -> Result<()> {
    let clock = Clock::get()?;
    let state = &mut ctx.accounts.tranche_state;
    let position = &mut ctx.accounts.position;

    // =========================================================================
    // Validation
    // =========================================================================

    let rebase_index = state.balances.senior.rebase_index;
    let balance = position.balance(rebase_index)?;
    require!(amount <= balance, TrancheError::InsufficientShares);

    let penalty = withdrawal_penalty(amount, position.cooldown_start, clock.unix_timestamp)?;

    if penalty.penalty > 0 {
        msg!(
            "Early withdrawal: cooldown started at {}, penalty {}",
            position.cooldown_start,
            penalty.penalty
        );
    }

    // =========================================================================
    // Ledger + Position Update
    // =========================================================================

    let shares_burned = state.record_withdrawal(amount, &penalty)?;
    position.record_withdrawal(shares_burned, penalty.net, penalty.penalty, clock.unix_timestamp)?;

    // =========================================================================
    // Log Results
    // =========================================================================

    msg!("Withdrawal successful!");
    msg!("Amount redeemed: {}", amount);
    msg!("Shares burned: {}", shares_burned);
    msg!("Net paid out: {}", penalty.net);
    msg!("Remaining balance: {}", position.balance(rebase_index)?);

    emit!(SeniorWithdrawn {
        owner: position.owner,
        amount,
        shares_burned,
        penalty: penalty.penalty,
        net: penalty.net,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
