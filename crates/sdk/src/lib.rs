/// Lendgine client SDK
///
/// Typed, cached contract reads, subgraph normalization and the staged
/// transaction pipeline used to deposit, withdraw, open and close positions:
/// - `client`: cached reads of lendgine, position and ERC20 state
/// - `beet`: sequential stages of concurrent transactions
/// - `transactions`: builders that turn user input into stages
/// - `indexer`: subgraph access and validation of indexed lendgines
/// - `poller`: periodic snapshot refresh

pub mod beet;
pub mod cache;
pub mod client;
pub mod config;
pub mod contracts;
pub mod errors;
pub mod indexer;
pub mod notify;
pub mod poller;
pub mod tokens;
pub mod transactions;

pub use beet::*;
pub use cache::{QueryCache, QueryKey};
pub use client::*;
pub use config::*;
pub use contracts::*;
pub use errors::*;
pub use indexer::*;
pub use notify::*;
pub use poller::LendginePoller;
pub use tokens::TokenList;
pub use transactions::*;

// Re-export shared types and accounting math
pub use lendgine_math::*;
pub use lendgine_types::*;
