// =============================================================================
// Update Valuations Instruction
// =============================================================================
// The keeper pushes the USD value held by each tranche. Values are trusted
// inputs: pricing the underlying vault positions happens off-chain.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::TrancheError;
use crate::events::ValuationsUpdated;
use crate::state::TrancheState;

#[derive(Accounts)]
pub struct UpdateValuations<'info> {
    #[account(
        constraint = keeper.key() == tranche_state.keeper @ TrancheError::KeeperOnly
    )]
    pub keeper: Signer<'info>,

    #[account(
        mut,
        seeds = [TRANCHE_STATE_SEED],
        bump = tranche_state.bump
    )]
    pub tranche_state: Account<'info, TrancheState>,
}

pub fn handler_update_valuations(
    ctx: Context<UpdateValuations>,
    senior_value: u128,
    junior_value: u128,
    reserve_value: u128,
) -> Result<()> {
    let state = &mut ctx.accounts.tranche_state;
    let clock = Clock::get()?;

    // A live Senior supply backed by nothing is a keeper error, not a market state
    require!(
        senior_value > 0 || state.balances.senior.total_supply == 0,
        TrancheError::InvalidValuation
    );

    let mut balances = state.balances;
    balances.senior.usd_value = senior_value;
    balances.junior_value = junior_value;
    balances.reserve_value = reserve_value;
    balances.total_value()?;

    let backing_ratio = if balances.senior.total_supply == 0 {
        0
    } else {
        balances.backing_ratio()?
    };

    state.balances = balances;
    state.last_valuation_timestamp = clock.unix_timestamp;

    msg!(
        "Valuations updated: senior={} junior={} reserve={}",
        senior_value,
        junior_value,
        reserve_value
    );
    msg!("Backing ratio: {}", backing_ratio);

    emit!(ValuationsUpdated {
        senior_value,
        junior_value,
        reserve_value,
        backing_ratio,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
