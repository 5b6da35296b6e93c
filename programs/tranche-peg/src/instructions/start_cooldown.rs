// =============================================================================
// Start Cooldown Instruction
// =============================================================================
// Starts (or restarts) the holder's cooldown clock. Withdrawals after
// COOLDOWN_PERIOD_SECONDS skip the early-exit penalty.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::TrancheError;
use crate::events::CooldownStarted;
use crate::state::{SeniorPosition, TrancheState};

#[derive(Accounts)]
pub struct StartCooldown<'info> {
    pub owner: Signer<'info>,

    #[account(
        seeds = [TRANCHE_STATE_SEED],
        bump = tranche_state.bump
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

pub fn handler_start_cooldown(ctx: Context<StartCooldown>) -> Result<()> {
    let clock = Clock::get()?;
    let position = &mut ctx.accounts.position;

    position.start_cooldown(clock.unix_timestamp)?;

    let cooldown_end = clock
        .unix_timestamp
        .checked_add(COOLDOWN_PERIOD_SECONDS)
        .ok_or(error!(TrancheError::MathOverflow))?;

    msg!("Cooldown started for {}", position.owner);
    msg!("Penalty-free withdrawals from: {}", cooldown_end);

    emit!(CooldownStarted {
        owner: position.owner,
        cooldown_start: position.cooldown_start,
        cooldown_end,
    });

    Ok(())
}
