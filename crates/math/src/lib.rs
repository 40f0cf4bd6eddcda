/// Position and price accounting for lendgine markets
///
/// Pure functions over exact rationals. Every function takes the snapshots
/// it needs and returns a fresh value; callers re-run them whenever an input
/// changes. Results that depend on data which may be missing are `Option`s,
/// never a substituted zero.

pub mod accrual;
pub mod aggregate;
pub mod jump_rate;
pub mod liquidity;
pub mod price;
pub mod selection;
pub mod trade;

// Re-export commonly used functions
pub use accrual::*;
pub use aggregate::*;
pub use jump_rate::*;
pub use liquidity::*;
pub use price::*;
pub use selection::*;
pub use trade::*;
