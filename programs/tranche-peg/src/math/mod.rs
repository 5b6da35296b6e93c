// =============================================================================
// Accounting Engine
// =============================================================================
// Pure functions over explicit inputs. Nothing in here reads clocks or
// accounts; instruction handlers pass values in and commit what comes out.
// =============================================================================

pub mod apy;
pub mod fees;
pub mod fixed_point;
pub mod rebase;
pub mod zones;

pub use apy::*;
pub use fees::*;
pub use fixed_point::*;
pub use rebase::*;
pub use zones::*;
