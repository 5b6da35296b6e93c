// =============================================================================
// Initialize Protocol Instruction
// =============================================================================
// Creates the global TrancheState. Senior starts empty with rebase index 1.0;
// Junior and Reserve start at zero until the keeper pushes valuations.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::TrancheError;
use crate::events::ProtocolInitialized;
use crate::state::{TrancheBalances, TrancheState};

/// Accounts required for the initialize_protocol instruction
#[derive(Accounts)]
pub struct InitializeProtocol<'info> {
    /// The admin who will control the protocol
    #[account(mut)]
    pub admin: Signer<'info>,

    /// The TrancheState account to create
    #[account(
        init,
        payer = admin,
        space = 8 + TrancheState::INIT_SPACE,
        seeds = [TRANCHE_STATE_SEED],
        bump
    )]
    pub tranche_state: Account<'info, TrancheState>,

    /// The keeper allowed to push valuations and trigger rebases
    /// CHECK: Only the address is stored
    pub keeper: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler_initialize_protocol(ctx: Context<InitializeProtocol>) -> Result<()> {
    let keeper = ctx.accounts.keeper.key();
    require!(keeper != Pubkey::default(), TrancheError::InvalidAddress);

    let clock = Clock::get()?;
    let state = &mut ctx.accounts.tranche_state;

    state.admin = ctx.accounts.admin.key();
    state.keeper = keeper;
    state.balances = TrancheBalances::default();
    state.treasury_shares = 0;
    state.last_rebase_timestamp = clock.unix_timestamp;
    state.last_valuation_timestamp = clock.unix_timestamp;
    state.epoch = 0;
    state.total_spilled_over = 0;
    state.total_backstopped = 0;
    state.total_penalties = 0;
    state.is_paused = false;
    state.bump = ctx.bumps.tranche_state;

    msg!("Tranche protocol initialized");
    msg!("Admin: {}", state.admin);
    msg!("Keeper: {}", state.keeper);
    msg!("Rebase index: {}", state.balances.senior.rebase_index);

    emit!(ProtocolInitialized {
        state: state.key(),
        admin: state.admin,
        keeper: state.keeper,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
