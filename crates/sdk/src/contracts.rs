/// Contract read/write boundary
///
/// Reads return raw 256-bit words; the client turns them into the typed
/// snapshot model. Writes take a [`TransactionRequest`] describing one call
/// on the liquidity manager, the lendgine router or an ERC20 token.

use async_trait::async_trait;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

use lendgine_types::{Address, Lendgine, LendgineWords, PositionWords};

use crate::errors::{SdkResult, TxError};

// ============================================================================
// Wallet Boundary
// ============================================================================

/// Connected wallet: the address transactions are sent from, on one chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    pub chain_id: u64,
}

impl Account {
    pub fn new(address: Address, chain_id: u64) -> Self {
        Self { address, chain_id }
    }
}

/// Transaction hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxHash(pub [u8; 32]);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Confirmation of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
}

// ============================================================================
// Calls
// ============================================================================

/// Uniswap version used by the router to swap the borrowed side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapRoute {
    V2,
    V3 { fee: u32 },
}

impl SwapRoute {
    pub fn swap_type(&self) -> u8 {
        match self {
            SwapRoute::V2 => 0,
            SwapRoute::V3 { .. } => 1,
        }
    }

    /// ABI-encoded extra swap data: the pool fee as a uint24 word for V3
    pub fn swap_extra_data(&self) -> Vec<u8> {
        match self {
            SwapRoute::V2 => Vec::new(),
            SwapRoute::V3 { fee } => {
                let mut word = vec![0u8; 32];
                word[29..].copy_from_slice(&fee.to_be_bytes()[1..]);
                word
            }
        }
    }
}

/// Market identity as the periphery contracts take it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketKey {
    pub token0: Address,
    pub token1: Address,
    pub token0_exp: u8,
    pub token1_exp: u8,
    /// Upper bound as an 18-decimal wad
    pub upper_bound: BigUint,
}

impl MarketKey {
    pub fn from_lendgine(lendgine: &Lendgine) -> Self {
        Self {
            token0: lendgine.token0.address,
            token1: lendgine.token1.address,
            token0_exp: lendgine.token0_exp,
            token1_exp: lendgine.token1_exp,
            upper_bound: lendgine.bound_wad().magnitude().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLiquidityParams {
    pub market: MarketKey,
    pub liquidity: BigUint,
    pub amount0_min: BigUint,
    pub amount1_min: BigUint,
    pub size_min: BigUint,
    pub recipient: Address,
    pub deadline: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveLiquidityParams {
    pub market: MarketKey,
    pub size: BigUint,
    pub amount0_min: BigUint,
    pub amount1_min: BigUint,
    pub recipient: Address,
    pub deadline: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintParams {
    pub market: MarketKey,
    pub amount_in: BigUint,
    pub amount_borrow: BigUint,
    pub shares_min: BigUint,
    pub route: SwapRoute,
    pub recipient: Address,
    pub deadline: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnParams {
    pub market: MarketKey,
    pub shares: BigUint,
    pub collateral_min: BigUint,
    pub amount0_min: BigUint,
    pub amount1_min: BigUint,
    pub route: SwapRoute,
    pub recipient: Address,
    pub deadline: u64,
}

/// One contract call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    /// ERC20 approve on the target token
    Approve { spender: Address, amount: BigUint },
    AddLiquidity(AddLiquidityParams),
    RemoveLiquidity(RemoveLiquidityParams),
    Mint(MintParams),
    Burn(BurnParams),
    /// Unwrap the contract's wrapped native balance to `recipient`
    UnwrapWeth { amount_min: BigUint, recipient: Address },
    /// Send the contract's `token` balance to `recipient`
    SweepToken { token: Address, amount_min: BigUint, recipient: Address },
    Multicall(Vec<ContractCall>),
}

impl ContractCall {
    pub fn name(&self) -> &'static str {
        match self {
            ContractCall::Approve { .. } => "approve",
            ContractCall::AddLiquidity(_) => "addLiquidity",
            ContractCall::RemoveLiquidity(_) => "removeLiquidity",
            ContractCall::Mint(_) => "mint",
            ContractCall::Burn(_) => "burn",
            ContractCall::UnwrapWeth { .. } => "unwrapWETH",
            ContractCall::SweepToken { .. } => "sweepToken",
            ContractCall::Multicall(_) => "multicall",
        }
    }
}

/// A call addressed to a contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub to: Address,
    pub call: ContractCall,
}

// ============================================================================
// Boundary Traits
// ============================================================================

/// Read access to lendgine, liquidity-manager and ERC20 state
#[async_trait]
pub trait ContractReader: Send + Sync {
    async fn lendgine_words(&self, lendgine: &Address) -> SdkResult<LendgineWords>;

    async fn position_words(
        &self,
        liquidity_manager: &Address,
        owner: &Address,
        lendgine: &Address,
    ) -> SdkResult<PositionWords>;

    async fn balance_of(&self, token: &Address, owner: &Address) -> SdkResult<BigUint>;

    async fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> SdkResult<BigUint>;
}

/// Signs and broadcasts transactions for an account
#[async_trait]
pub trait ContractWriter: Send + Sync {
    async fn send(&self, account: &Account, request: &TransactionRequest) -> Result<TxHash, TxError>;
}

/// Waits for a broadcast transaction to be mined
#[async_trait]
pub trait ReceiptWaiter: Send + Sync {
    async fn wait(&self, hash: &TxHash) -> Result<Receipt, TxError>;
}
