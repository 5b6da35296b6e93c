// =============================================================================
// Tranche Peg Error Codes
// =============================================================================
// Every error aborts the whole instruction. Nothing is clamped silently:
// callers fix their inputs and retry.
// =============================================================================

use anchor_lang::prelude::*;

/// All errors the Tranche Peg program can return.
///
/// Anchor assigns numeric codes starting from 6000 in declaration order.
#[error_code]
pub enum TrancheError {
    // =========================================================================
    // Arithmetic Errors (6000-6002)
    // =========================================================================

    /// A zero supply or zero index was used as a divisor
    #[msg("Division by zero")]
    DivisionByZero,

    /// A result does not fit in 128 bits, or a signed delta would flip the sign of a value
    #[msg("Math overflow - calculation exceeded maximum value")]
    MathOverflow,

    /// Subtracting more than is available
    #[msg("Math underflow - result would be negative")]
    MathUnderflow,

    // =========================================================================
    // Engine Input Errors (6003-6005)
    // =========================================================================

    /// Yield selection needs a non-zero Senior supply
    #[msg("Senior supply must be greater than zero")]
    InvalidSupply,

    /// Yield selection needs a non-zero Senior vault value
    #[msg("Senior vault value must be greater than zero")]
    InvalidVaultValue,

    /// Withdrawing zero is not allowed
    #[msg("Withdrawal amount must be greater than zero")]
    InvalidWithdrawalAmount,

    // =========================================================================
    // Protocol State Errors (6006-6008)
    // =========================================================================

    #[msg("Protocol is currently paused")]
    ProtocolPaused,

    /// Keeper called rebase before MIN_REBASE_INTERVAL_SECONDS elapsed
    #[msg("Rebase interval has not elapsed")]
    RebaseTooSoon,

    /// Keeper pushed a valuation that cannot be right (zero Senior value with live supply)
    #[msg("Invalid tranche valuation")]
    InvalidValuation,

    // =========================================================================
    // Deposit / Withdrawal Errors (6009-6011)
    // =========================================================================

    /// Amount is zero or below the minimum deposit
    #[msg("Amount is below minimum")]
    InvalidAmount,

    /// Deposit would push Senior supply above DEPOSIT_CAP_MULTIPLIER x Reserve value
    #[msg("Deposit exceeds cap tied to Reserve size")]
    ExceedsDepositCap,

    /// Holder doesn't have enough shares to cover the requested balance
    #[msg("Insufficient shares for withdrawal")]
    InsufficientShares,

    // =========================================================================
    // Authorization Errors (6012-6015)
    // =========================================================================

    #[msg("Only admin can perform this action")]
    AdminOnly,

    /// Only the registered keeper may push valuations or trigger rebases
    #[msg("Only keeper can perform this action")]
    KeeperOnly,

    #[msg("Invalid authority")]
    InvalidAuthority,

    #[msg("Invalid address - cannot be the default pubkey")]
    InvalidAddress,
}
