// =============================================================================
// APY Selector
// =============================================================================
// Greedy yield waterfall: grant Senior holders the highest tier that keeps
// backing at or above 100% after the epoch's mint. If even the floor tier
// breaks the peg it is minted anyway and the shortfall is handed to the
// backstop in the same epoch.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::TrancheError;
use crate::math::fees::{rebase_supply, RebaseSupply};
use crate::math::fixed_point::ratio;

/// Senior yield tiers, named by their annualized rate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApyTier {
    Apy13,
    Apy12,
    Apy11,
}

impl ApyTier {
    /// Annualized label in basis points (for events and logs)
    pub fn apy_bps(&self) -> u16 {
        match self {
            ApyTier::Apy13 => 1300,
            ApyTier::Apy12 => 1200,
            ApyTier::Apy11 => 1100,
        }
    }
}

/// Tiers in the order they are tried: highest monthly rate first
pub const APY_TIERS: [(ApyTier, u128); 3] = [
    (ApyTier::Apy13, TIER_13_MONTHLY_RATE),
    (ApyTier::Apy12, TIER_12_MONTHLY_RATE),
    (ApyTier::Apy11, TIER_11_MONTHLY_RATE),
];

/// Outcome of running one tier against the current Senior position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierSimulation {
    pub tier: ApyTier,
    pub monthly_rate: u128,
    pub supply: RebaseSupply,
    /// `vault_value / supply.new_supply`
    pub backing_ratio: u128,
}

/// The tier granted for this epoch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApySelection {
    pub tier: ApyTier,
    pub monthly_rate: u128,
    pub supply: RebaseSupply,
    pub backing_ratio: u128,
    /// No tier cleared 100%: the floor tier was granted and the backstop must run
    pub backstop_needed: bool,
}

fn validate_inputs(supply: u128, vault_value: u128) -> Result<()> {
    require!(supply > 0, TrancheError::InvalidSupply);
    require!(vault_value > 0, TrancheError::InvalidVaultValue);
    Ok(())
}

fn simulate_tier(
    tier: ApyTier,
    monthly_rate: u128,
    supply: u128,
    vault_value: u128,
    elapsed_seconds: u64,
    management_fee_tokens: u128,
) -> Result<TierSimulation> {
    let supply = rebase_supply(supply, monthly_rate, elapsed_seconds, management_fee_tokens)?;
    let backing_ratio = ratio(vault_value, supply.new_supply)?;

    Ok(TierSimulation {
        tier,
        monthly_rate,
        supply,
        backing_ratio,
    })
}

/// Pick the highest sustainable tier
///
/// Tries APY_TIERS in order and returns the first whose hypothetical
/// post-rebase backing ratio is >= 100%. Falls back to the last (lowest)
/// tier with `backstop_needed = true`.
pub fn select_apy(
    supply: u128,
    vault_value: u128,
    elapsed_seconds: u64,
    management_fee_tokens: u128,
) -> Result<ApySelection> {
    validate_inputs(supply, vault_value)?;

    let mut last = None;
    for (tier, monthly_rate) in APY_TIERS {
        let sim = simulate_tier(
            tier,
            monthly_rate,
            supply,
            vault_value,
            elapsed_seconds,
            management_fee_tokens,
        )?;

        if sim.backing_ratio >= SENIOR_TRIGGER_BACKING {
            return Ok(ApySelection {
                tier: sim.tier,
                monthly_rate: sim.monthly_rate,
                supply: sim.supply,
                backing_ratio: sim.backing_ratio,
                backstop_needed: false,
            });
        }

        last = Some(sim);
    }

    let floor = last.ok_or(error!(TrancheError::InvalidSupply))?;

    Ok(ApySelection {
        tier: floor.tier,
        monthly_rate: floor.monthly_rate,
        supply: floor.supply,
        backing_ratio: floor.backing_ratio,
        backstop_needed: true,
    })
}

/// Run every tier without committing to one
pub fn simulate_all_tiers(
    supply: u128,
    vault_value: u128,
    elapsed_seconds: u64,
    management_fee_tokens: u128,
) -> Result<[TierSimulation; 3]> {
    validate_inputs(supply, vault_value)?;

    let [(t0, r0), (t1, r1), (t2, r2)] = APY_TIERS;
    Ok([
        simulate_tier(t0, r0, supply, vault_value, elapsed_seconds, management_fee_tokens)?,
        simulate_tier(t1, r1, supply, vault_value, elapsed_seconds, management_fee_tokens)?,
        simulate_tier(t2, r2, supply, vault_value, elapsed_seconds, management_fee_tokens)?,
    ])
}
