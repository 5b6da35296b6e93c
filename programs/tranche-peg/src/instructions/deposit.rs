// =============================================================================
// Deposit Senior Instruction
// =============================================================================
// Books a Senior deposit on the ledger and credits the holder with shares.
//
// Flow:
// 1. Validate amount and the deposit cap (supply + amount <= 10 x Reserve)
// 2. Mint floor(amount / index) shares at the current rebase index
// 3. Grow Senior value and supply by the amount
// 4. Update the holder's SeniorPosition
//
// Share calculation:
// - shares = amount * PRECISION / rebase_index (rounded down)
// - Rounding favors the protocol, never the depositor
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::TrancheError;
use crate::events::SeniorDeposited;
use crate::state::{SeniorPosition, TrancheState};

/// Accounts required for the deposit_senior instruction
#[derive(Accounts)]
pub struct DepositSenior<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    /// The holder depositing
    #[account(mut)]
    pub owner: Signer<'info>,

    // =========================================================================
    // Protocol Accounts
    // =========================================================================

    #[account(
        mut,
        seeds = [TRANCHE_STATE_SEED],
        bump = tranche_state.bump,
        constraint = !tranche_state.is_paused @ TrancheError::ProtocolPaused
    )]
    pub tranche_state: Account<'info, TrancheState>,

    /// The holder's position
    ///
    /// init_if_needed: first-time depositors get a SeniorPosition automatically
    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + SeniorPosition::INIT_SPACE,
        seeds = [POSITION_SEED, tranche_state.key().as_ref(), owner.key().as_ref()],
        bump
    )]
    pub position: Account<'info, SeniorPosition>,

    pub system_program: Program<'info, System>,
}

/// Handler for the deposit_senior instruction
///
/// # Arguments
/// * `amount` - USD amount to deposit (fixed-point, 1e18 = $1)
pub fn handler_deposit_senior(ctx: Context<DepositSenior>, amount: u128) -> Result<()> {
    // =========================================================================
    // Input Validation
    // =========================================================================

    require!(amount >= MIN_DEPOSIT_AMOUNT, TrancheError::InvalidAmount);

    let clock = Clock::get()?;
    let state_key = ctx.accounts.tranche_state.key();
    let owner_key = ctx.accounts.owner.key();
    let position_bump = ctx.bumps.position;

    // =========================================================================
    // Ledger Update
    // =========================================================================

    let state = &mut ctx.accounts.tranche_state;

    // An empty tranche has nothing to accrue; start the epoch clock now so the
    // first rebase doesn't pay yield for time nobody was invested
    let first_deposit = state.balances.senior.total_supply == 0;
    if first_deposit {
        state.last_rebase_timestamp = clock.unix_timestamp;
        msg!("First Senior deposit - epoch clock reset");
    }

    let shares_minted = state.record_deposit(amount)?;

    // =========================================================================
    // Position Update
    // =========================================================================

    let position = &mut ctx.accounts.position;

    // New position account, fill in identity
    if position.owner == Pubkey::default() {
        position.state = state_key;
        position.owner = owner_key;
        position.bump = position_bump;
    }

    position.record_deposit(amount, shares_minted, clock.unix_timestamp)?;

    // =========================================================================
    // Log Results
    // =========================================================================

    let senior = state.balances.senior;
    let deposit_cap = state.deposit_cap()?;

    msg!("Deposit successful!");
    msg!("Amount deposited: {}", amount);
    msg!("Shares minted: {}", shares_minted);
    msg!("Senior supply: {} / cap {}", senior.total_supply, deposit_cap);

    emit!(SeniorDeposited {
        owner: owner_key,
        amount,
        shares_minted,
        rebase_index: senior.rebase_index,
        total_supply: senior.total_supply,
        deposit_cap,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
