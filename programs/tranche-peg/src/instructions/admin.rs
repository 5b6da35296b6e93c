// =============================================================================
// Admin Instructions
// =============================================================================
// Administrative functions only the protocol admin can call:
// - pause_protocol: halt deposits, withdrawals and rebases
// - update_keeper: rotate the keeper key
// - transfer_admin: hand the admin role to a new key
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::TrancheError;
use crate::state::TrancheState;

// =============================================================================
// Pause Protocol
// =============================================================================

#[derive(Accounts)]
pub struct PauseProtocol<'info> {
    #[account(
        constraint = admin.key() == tranche_state.admin @ TrancheError::AdminOnly
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [TRANCHE_STATE_SEED],
        bump = tranche_state.bump
    )]
    pub tranche_state: Account<'info, TrancheState>,
}

pub fn handler_pause_protocol(ctx: Context<PauseProtocol>, paused: bool) -> Result<()> {
    let state = &mut ctx.accounts.tranche_state;

    if state.is_paused == paused {
        msg!(
            "Protocol is already {}",
            if paused { "paused" } else { "unpaused" }
        );
        return Ok(());
    }

    state.is_paused = paused;

    msg!(
        "Protocol {} by admin {}",
        if paused { "PAUSED" } else { "UNPAUSED" },
        ctx.accounts.admin.key()
    );

    Ok(())
}

// =============================================================================
// Update Keeper
// =============================================================================

#[derive(Accounts)]
pub struct UpdateKeeper<'info> {
    #[account(
        constraint = admin.key() == tranche_state.admin @ TrancheError::AdminOnly
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [TRANCHE_STATE_SEED],
        bump = tranche_state.bump
    )]
    pub tranche_state: Account<'info, TrancheState>,

    /// CHECK: Only the address is stored
    pub new_keeper: UncheckedAccount<'info>,
}

pub fn handler_update_keeper(ctx: Context<UpdateKeeper>) -> Result<()> {
    let state = &mut ctx.accounts.tranche_state;
    let new_keeper = ctx.accounts.new_keeper.key();

    require!(new_keeper != Pubkey::default(), TrancheError::InvalidAddress);

    let old_keeper = state.keeper;
    state.keeper = new_keeper;

    msg!("Keeper updated: {} -> {}", old_keeper, new_keeper);

    Ok(())
}

// =============================================================================
// Transfer Admin
// =============================================================================

#[derive(Accounts)]
pub struct TransferAdmin<'info> {
    #[account(
        constraint = admin.key() == tranche_state.admin @ TrancheError::AdminOnly
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [TRANCHE_STATE_SEED],
        bump = tranche_state.bump
    )]
    pub tranche_state: Account<'info, TrancheState>,

    /// CHECK: Only the address is stored
    pub new_admin: UncheckedAccount<'info>,
}

pub fn handler_transfer_admin(ctx: Context<TransferAdmin>) -> Result<()> {
    let state = &mut ctx.accounts.tranche_state;
    let new_admin = ctx.accounts.new_admin.key();

    require!(new_admin != Pubkey::default(), TrancheError::InvalidAddress);
    require!(new_admin != state.admin, TrancheError::InvalidAuthority);

    let old_admin = state.admin;
    state.admin = new_admin;

    msg!("Admin transferred: {} -> {}", old_admin, new_admin);

    Ok(())
}
