// =============================================================================
// Rebase Instruction
// =============================================================================
// The keeper closes one epoch. Everything is computed by the pure engine
// over a copy of the ledger, then committed in one call:
//
// 1. elapsed = now - last_rebase_timestamp (>= MIN_REBASE_INTERVAL_SECONDS)
// 2. compute_rebase: fees, tier, zone, spillover/backstop, new index
// 3. TrancheState::commit_rebase
// 4. Emit RebaseExecuted with the full breakdown
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::TrancheError;
use crate::events::RebaseExecuted;
use crate::math::rebase::compute_rebase;
use crate::state::TrancheState;

#[derive(Accounts)]
pub struct Rebase<'info> {
    #[account(
        constraint = keeper.key() == tranche_state.keeper @ TrancheError::KeeperOnly
    )]
    pub keeper: Signer<'info>,

    #[account(
        mut,
        seeds = [TRANCHE_STATE_SEED],
        bump = tranche_state.bump,
        constraint = !tranche_state.is_paused @ TrancheError::ProtocolPaused
    )]
    pub tranche_state: Account<'info, TrancheState>,
}

pub fn handler_rebase(ctx: Context<Rebase>) -> Result<()> {
    let clock = Clock::get()?;
    let state = &mut ctx.accounts.tranche_state;

    // =========================================================================
    // Epoch Length
    // =========================================================================

    let elapsed = clock
        .unix_timestamp
        .checked_sub(state.last_rebase_timestamp)
        .ok_or(error!(TrancheError::MathUnderflow))?;
    require!(elapsed >= MIN_REBASE_INTERVAL_SECONDS, TrancheError::RebaseTooSoon);
    let elapsed_seconds = u64::try_from(elapsed).map_err(|_| error!(TrancheError::MathUnderflow))?;

    // =========================================================================
    // Compute + Commit
    // =========================================================================

    let old_index = state.balances.senior.rebase_index;
    let outcome = compute_rebase(&state.balances, elapsed_seconds)?;
    state.commit_rebase(&outcome, clock.unix_timestamp)?;

    // =========================================================================
    // Log Results
    // =========================================================================

    let selection = &outcome.selection;
    let spillover = outcome.spillover.unwrap_or_default();
    let backstop = outcome.backstop.unwrap_or_default();
    let fully_restored = outcome.fully_restored().unwrap_or(true);

    msg!("Rebase epoch {} over {} seconds", state.epoch, elapsed_seconds);
    msg!("Tier: {} bps, zone: {:?}", selection.tier.apy_bps(), outcome.zone);
    msg!("Index: {} -> {}", old_index, outcome.new_index);
    msg!("Senior supply: {}", outcome.new_supply);

    for transfer in outcome.transfers.iter() {
        msg!("Transfer {:?} -> {:?}: {}", transfer.from, transfer.to, transfer.amount);
    }

    if selection.backstop_needed {
        msg!("Floor tier unsustainable - backstop engaged");
    }
    if !fully_restored {
        msg!("Backstop exhausted, shortfall: {}", backstop.shortfall());
    }

    let balances = state.balances;

    emit!(RebaseExecuted {
        epoch: state.epoch,
        elapsed_seconds,
        apy_bps: selection.tier.apy_bps(),
        zone: outcome.zone.code(),
        old_index,
        new_index: outcome.new_index,
        new_supply: outcome.new_supply,
        user_tokens: selection.supply.user_tokens,
        performance_fee_tokens: selection.supply.performance_fee_tokens,
        management_fee_tokens: outcome.management_fee_tokens,
        backing_ratio: selection.backing_ratio,
        spillover_to_junior: spillover.to_junior,
        spillover_to_reserve: spillover.to_reserve,
        backstop_from_reserve: backstop.from_reserve,
        backstop_from_junior: backstop.from_junior,
        fully_restored,
        senior_value: balances.senior.usd_value,
        junior_value: balances.junior_value,
        reserve_value: balances.reserve_value,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
