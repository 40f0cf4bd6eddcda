#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use num_bigint::BigUint;

use lendgine_sdk::{
    Account, Address, ChainConfig, ContractReader, ContractWriter, Fraction, Lendgine, LendgineWords,
    PositionWords, Receipt, ReceiptWaiter, SdkResult, Token, TransactionRequest, TxError, TxEnvelope,
    TxHash,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn wad(value: u64) -> BigUint {
    BigUint::from(value) * BigUint::from(10u64).pow(18)
}

pub const OWNER: Address = Address::new([0x99; 20]);

pub fn account() -> Account {
    Account::new(OWNER, 42_161)
}

/// WETH/USDC at bound 4
pub fn weth_usdc(config: &ChainConfig) -> Lendgine {
    Lendgine::new(
        config.tokens[0].clone(),
        config.tokens[1].clone(),
        18,
        6,
        Fraction::from_integer(4),
        Address::new([0x11; 20]),
    )
    .unwrap()
}

/// A lendgine over two tokens no other fixture uses
pub fn unrelated_lendgine() -> Lendgine {
    Lendgine::new(
        Token::new(42_161, Address::new([0xa1; 20]), 18, "AAA", "Token A"),
        Token::new(42_161, Address::new([0xb1; 20]), 18, "BBB", "Token B"),
        18,
        18,
        Fraction::from_integer(8),
        Address::new([0x22; 20]),
    )
    .unwrap()
}

// ============================================================================
// Chain Reader
// ============================================================================

/// In-memory chain state; unknown allowances are unlimited
#[derive(Default)]
pub struct MockReader {
    pub lendgines: Mutex<HashMap<Address, LendgineWords>>,
    pub positions: Mutex<HashMap<(Address, Address), PositionWords>>,
    pub balances: Mutex<HashMap<(Address, Address), BigUint>>,
    pub allowances: Mutex<HashMap<(Address, Address, Address), BigUint>>,
}

impl MockReader {
    pub fn set_lendgine(&self, lendgine: &Lendgine, words: LendgineWords) {
        self.lendgines.lock().unwrap().insert(lendgine.address, words);
    }

    pub fn set_position(&self, owner: Address, lendgine: &Lendgine, words: PositionWords) {
        self.positions.lock().unwrap().insert((owner, lendgine.address), words);
    }

    pub fn set_balance(&self, token: &Token, owner: Address, raw: BigUint) {
        self.balances.lock().unwrap().insert((token.address, owner), raw);
    }

    pub fn set_allowance(&self, token: &Token, owner: Address, spender: Address, raw: BigUint) {
        self.allowances
            .lock()
            .unwrap()
            .insert((token.address, owner, spender), raw);
    }
}

#[async_trait]
impl ContractReader for MockReader {
    async fn lendgine_words(&self, lendgine: &Address) -> SdkResult<LendgineWords> {
        Ok(self
            .lendgines
            .lock()
            .unwrap()
            .get(lendgine)
            .cloned()
            .unwrap_or_default())
    }

    async fn position_words(&self, _manager: &Address, owner: &Address, lendgine: &Address) -> SdkResult<PositionWords> {
        Ok(self
            .positions
            .lock()
            .unwrap()
            .get(&(*owner, *lendgine))
            .cloned()
            .unwrap_or_default())
    }

    async fn balance_of(&self, token: &Address, owner: &Address) -> SdkResult<BigUint> {
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&(*token, *owner))
            .cloned()
            .unwrap_or_default())
    }

    async fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> SdkResult<BigUint> {
        Ok(self
            .allowances
            .lock()
            .unwrap()
            .get(&(*token, *owner, *spender))
            .cloned()
            .unwrap_or_else(lendgine_sdk::uint256_max))
    }
}

// ============================================================================
// Wallet
// ============================================================================

/// Accepts every request and records it
#[derive(Default)]
pub struct MockWriter {
    pub sent: Mutex<Vec<TransactionRequest>>,
    next: AtomicU8,
}

#[async_trait]
impl ContractWriter for MockWriter {
    async fn send(&self, _account: &Account, request: &TransactionRequest) -> Result<TxHash, TxError> {
        self.sent.lock().unwrap().push(request.clone());
        Ok(TxHash([self.next.fetch_add(1, Ordering::SeqCst); 32]))
    }
}

/// Confirms every hash in block 1
pub struct InstantWaiter;

#[async_trait]
impl ReceiptWaiter for InstantWaiter {
    async fn wait(&self, hash: &TxHash) -> Result<Receipt, TxError> {
        Ok(Receipt {
            transaction_hash: *hash,
            block_number: 1,
        })
    }
}

// ============================================================================
// Scripted Envelopes
// ============================================================================

/// Envelope that sleeps, logs its title and returns a fixed result
pub struct ScriptedEnvelope {
    pub title: String,
    pub delay: Duration,
    pub result: Result<TxHash, TxError>,
    pub log: Arc<Mutex<Vec<String>>>,
}

impl ScriptedEnvelope {
    pub fn boxed(
        title: &str,
        delay_ms: u64,
        result: Result<TxHash, TxError>,
        log: &Arc<Mutex<Vec<String>>>,
    ) -> Box<dyn TxEnvelope> {
        Box::new(Self {
            title: title.to_string(),
            delay: Duration::from_millis(delay_ms),
            result,
            log: log.clone(),
        })
    }
}

#[async_trait]
impl TxEnvelope for ScriptedEnvelope {
    async fn submit(&self) -> Result<TxHash, TxError> {
        tokio::time::sleep(self.delay).await;
        self.log.lock().unwrap().push(self.title.clone());
        self.result.clone()
    }
}
