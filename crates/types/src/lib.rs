/// Shared types for the lendgine client
///
/// Exact rationals, token-tagged amounts, lendgine descriptions and their
/// on-chain snapshots. Used by the accounting math and the SDK.

pub mod amount;
pub mod constants;
pub mod encoding;
pub mod errors;
pub mod fraction;
pub mod lendgine;
pub mod token;
pub mod value;

pub use amount::Amount;
pub use constants::*;
pub use encoding::*;
pub use errors::*;
pub use fraction::Fraction;
pub use lendgine::*;
pub use token::{Address, Token};
pub use value::ChainValue;
