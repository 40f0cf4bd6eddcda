/// Builders that turn a user action into pipeline stages
///
/// Each builder first checks the input against fresh chain state and
/// returns [`SdkError::Disabled`] with the reason the action cannot be sent.
/// Stages are built for one account at one instant; nothing is reused
/// across account or chain changes.

pub mod approval;
pub mod close;
pub mod deposit;
pub mod open;
pub mod withdraw;

pub use approval::*;
pub use close::*;
pub use deposit::*;
pub use open::*;
pub use withdraw::*;

use std::fmt;
use std::sync::Arc;

use num_bigint::{BigInt, BigUint};

use lendgine_types::{to_uint256, Address, Amount, Lendgine};

use crate::beet::{ContractEnvelope, TxEnvelope};
use crate::cache::QueryKey;
use crate::client::{unix_now, LendgineClient};
use crate::config::{ChainConfig, Settings};
use crate::contracts::{Account, ContractCall, ContractWriter, TransactionRequest};
use crate::errors::{SdkError, SdkResult};

/// Why an action cannot be submitted yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableReason {
    EnterAmount,
    Loading,
    InsufficientBalance,
    InsufficientLiquidity,
    SlideToAmount,
}

impl fmt::Display for DisableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DisableReason::EnterAmount => "Enter an amount",
            DisableReason::Loading => "Loading",
            DisableReason::InsufficientBalance => "Insufficient balance",
            DisableReason::InsufficientLiquidity => "Insufficient liquidity",
            DisableReason::SlideToAmount => "Slide to amount",
        };
        f.write_str(text)
    }
}

pub(crate) fn disabled<T>(reason: DisableReason) -> SdkResult<T> {
    Err(SdkError::Disabled(reason))
}

/// Everything a builder needs about who sends what, and when
pub struct BuildContext<'a> {
    pub client: &'a LendgineClient,
    pub writer: Arc<dyn ContractWriter>,
    pub account: Account,
    pub settings: Settings,
    /// Unix seconds used for accrual and deadlines
    pub now: u64,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        client: &'a LendgineClient,
        writer: Arc<dyn ContractWriter>,
        account: Account,
        settings: Settings,
    ) -> SdkResult<Self> {
        client.ensure_chain(&account)?;
        Ok(Self {
            client,
            writer,
            account,
            settings,
            now: unix_now(),
        })
    }

    pub fn at(mut self, now: u64) -> Self {
        self.now = now;
        self
    }

    pub fn config(&self) -> &ChainConfig {
        self.client.config()
    }

    pub fn owner(&self) -> Address {
        self.account.address
    }

    pub fn deadline(&self) -> u64 {
        self.settings.deadline(self.now)
    }

    /// Raw slippage-adjusted minimum of `amount`, as a contract word
    pub fn minimum(&self, amount: &Amount) -> SdkResult<BigUint> {
        word(&self.settings.minimum(amount))
    }

    pub fn envelope(&self, to: Address, call: ContractCall) -> Box<dyn TxEnvelope> {
        Box::new(ContractEnvelope::new(
            self.writer.clone(),
            self.account,
            TransactionRequest { to, call },
        ))
    }

    pub fn balance_key(&self, token: &Address) -> QueryKey {
        QueryKey::Balance {
            chain_id: self.account.chain_id,
            token: *token,
            owner: self.owner(),
        }
    }

    pub fn allowance_key(&self, token: &Address, spender: &Address) -> QueryKey {
        QueryKey::Allowance {
            chain_id: self.account.chain_id,
            token: *token,
            owner: self.owner(),
            spender: *spender,
        }
    }

    pub fn position_key(&self, lendgine: &Lendgine) -> QueryKey {
        QueryKey::Position {
            chain_id: self.account.chain_id,
            owner: self.owner(),
            lendgine: lendgine.address,
        }
    }

    pub fn info_key(&self, lendgine: &Lendgine) -> QueryKey {
        QueryKey::LendgineInfo {
            chain_id: self.account.chain_id,
            lendgine: lendgine.address,
        }
    }
}

pub(crate) fn word(value: &BigInt) -> SdkResult<BigUint> {
    Ok(to_uint256(value)?)
}

pub(crate) fn raw_word(amount: &Amount) -> SdkResult<BigUint> {
    word(&amount.quotient())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disable_reason_text() {
        assert_eq!(DisableReason::EnterAmount.to_string(), "Enter an amount");
        assert_eq!(DisableReason::SlideToAmount.to_string(), "Slide to amount");
        assert_eq!(
            SdkError::Disabled(DisableReason::InsufficientLiquidity).to_string(),
            "Transaction disabled: Insufficient liquidity"
        );
    }
}
