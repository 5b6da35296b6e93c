// =============================================================================
// Instructions Module
// =============================================================================
// Every instruction the Tranche Peg program exposes.
// =============================================================================

// Setup
pub mod initialize_protocol;

// Keeper operations
pub mod rebase;
pub mod update_valuations;

// Holder operations
pub mod deposit;
pub mod start_cooldown;
pub mod withdraw;

// Admin operations
pub mod admin;

// The #[derive(Accounts)] macro generates helper types that need to be at crate root
pub use admin::*;
pub use deposit::*;
pub use initialize_protocol::*;
pub use rebase::*;
pub use start_cooldown::*;
pub use update_valuations::*;
pub use withdraw::*;
