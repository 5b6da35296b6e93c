// =============================================================================
// State Module
// =============================================================================
// Account structures for the tranche protocol plus the plain ledger types
// the accounting engine works on.
// =============================================================================

pub mod position;
pub mod tranche;
pub mod tranche_state;

pub use position::*;
pub use tranche::*;
pub use tranche_state::*;
