// =============================================================================
// Tranche Peg Protocol Constants
// =============================================================================
// All tunables for the Senior / Junior / Reserve accounting engine live here.
// Values are fixed at genesis - no instruction mutates them.
//
// Every rate below is a fixed-point number scaled by PRECISION (1.0 = 1e18),
// except the values explicitly marked as basis points.
// =============================================================================

// =============================================================================
// FIXED-POINT SCALE
// =============================================================================

/// Fixed-point scale: 1.0 == 1e18
/// USD values, supplies, indexes and rates all share this scale
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Total basis points (100%) - only used for signed percentage deltas
pub const BPS_DENOMINATOR: u128 = 10_000;

// =============================================================================
// TIME
// =============================================================================

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Nominal yield period for the monthly tier rates (30 days)
pub const SECONDS_PER_MONTH: u64 = 30 * SECONDS_PER_DAY;

/// Period for annual management fee proration (365 days)
pub const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;

/// Cooldown a Senior holder must wait before withdrawing without penalty
pub const COOLDOWN_PERIOD_SECONDS: i64 = 7 * SECONDS_PER_DAY as i64;

/// Minimum spacing between two rebases
/// Keeps a misbehaving keeper from spamming tiny epochs
pub const MIN_REBASE_INTERVAL_SECONDS: i64 = 3_600;

// =============================================================================
// YIELD TIERS (monthly rates, per 30 days)
// =============================================================================
// The selector walks these from highest to lowest and grants the first one
// that keeps Senior backing at or above 100%.
// =============================================================================

/// 13% APY tier: ~1.0833% per month
pub const TIER_13_MONTHLY_RATE: u128 = 10_833_333_333_333_333;

/// 12% APY tier: 1.0% per month
pub const TIER_12_MONTHLY_RATE: u128 = 10_000_000_000_000_000;

/// 11% APY tier (floor tier): ~0.8333% per month
/// Always minted, even when backing cannot sustain it
pub const TIER_11_MONTHLY_RATE: u128 = 8_333_333_333_333_333;

// =============================================================================
// FEES
// =============================================================================

/// Management fee: 0.5% per year of gross Senior value, minted as new supply
pub const MANAGEMENT_FEE_ANNUAL: u128 = 5_000_000_000_000_000;

/// Monthly approximation of the management fee (0.5% / 12)
pub const MANAGEMENT_FEE_MONTHLY: u128 = MANAGEMENT_FEE_ANNUAL / 12;

/// Performance fee: 2% of the yield tokens minted to users each epoch
pub const PERFORMANCE_FEE: u128 = 20_000_000_000_000_000;

/// Penalty for withdrawing before the cooldown has elapsed: 20%
pub const EARLY_WITHDRAWAL_PENALTY: u128 = 200_000_000_000_000_000;

// =============================================================================
// ZONE THRESHOLDS (backing ratio = senior value / senior supply)
// =============================================================================

/// Above 110% backing the excess spills to Junior and Reserve
pub const SENIOR_TARGET_BACKING: u128 = 1_100_000_000_000_000_000;

/// Below 100% backing the backstop waterfall kicks in
pub const SENIOR_TRIGGER_BACKING: u128 = 1_000_000_000_000_000_000;

/// Backstop restores Senior to 100.9%, above the trigger, so the next
/// epoch's floor-tier accrual does not immediately re-trigger it
pub const SENIOR_RESTORE_BACKING: u128 = 1_009_000_000_000_000_000;

// =============================================================================
// SPILLOVER SPLIT (must sum to exactly 100%)
// =============================================================================

/// Junior receives 80% of spillover excess
pub const JUNIOR_SPILLOVER_SHARE: u128 = 800_000_000_000_000_000;

/// Reserve receives 20% of spillover excess
pub const RESERVE_SPILLOVER_SHARE: u128 = 200_000_000_000_000_000;

const _: () = assert!(JUNIOR_SPILLOVER_SHARE + RESERVE_SPILLOVER_SHARE == PRECISION);

// =============================================================================
// DEPOSIT LIMITS
// =============================================================================

/// Senior supply may not exceed 10x the Reserve's USD value
pub const DEPOSIT_CAP_MULTIPLIER: u128 = 10;

/// Minimum Senior deposit ($1)
/// Prevents dust deposits that round to zero shares
pub const MIN_DEPOSIT_AMOUNT: u128 = PRECISION;

// =============================================================================
// PDA SEEDS
// =============================================================================

/// Seed for the global TrancheState account
/// Full seed: ["tranche_state"]
pub const TRANCHE_STATE_SEED: &[u8] = b"tranche_state";

/// Seed for a holder's SeniorPosition account
/// Full seed: ["position", tranche_state_pubkey, owner_pubkey]
pub const POSITION_SEED: &[u8] = b"position";
