use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use tracing::debug;

use lendgine_math::{accrued_lendgine_info, accrued_position, JumpRateModel};
use lendgine_types::{
    Address, Amount, ChainValue, Lendgine, LendgineError, LendgineInfo, LendginePosition, Token,
};

use crate::cache::{QueryCache, QueryKey};
use crate::config::ChainConfig;
use crate::contracts::{Account, ContractReader};
use crate::errors::{SdkError, SdkResult};
use crate::indexer::{normalize_lendgines, Subgraph};
use crate::tokens::TokenList;

/// Current unix time in seconds
pub fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

/// Typed, cached reads of lendgine state on one chain
pub struct LendgineClient {
    reader: Arc<dyn ContractReader>,
    cache: Arc<QueryCache>,
    config: ChainConfig,
    model: JumpRateModel,
}

impl LendgineClient {
    pub fn new(reader: Arc<dyn ContractReader>, cache: Arc<QueryCache>, config: ChainConfig) -> Self {
        Self {
            reader,
            cache,
            config,
            model: JumpRateModel::default(),
        }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Refuse to act for an account connected to another chain
    pub fn ensure_chain(&self, account: &Account) -> SdkResult<()> {
        if account.chain_id != self.config.chain_id {
            return Err(SdkError::Lendgine(LendgineError::UnsupportedChain {
                chain_id: account.chain_id,
            }));
        }
        Ok(())
    }

    async fn cached<F, Fut>(&self, key: QueryKey, fetch: F) -> SdkResult<ChainValue>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SdkResult<ChainValue>>,
    {
        if let Some(value) = self.cache.get_fresh(&key).await {
            return Ok(value);
        }
        debug!(key = %key, "Fetching contract read");
        let value = fetch().await?;
        self.cache.insert(key, value.clone()).await;
        Ok(value)
    }

    // ------------------------------------------------------------------------
    // Lendgine state
    // ------------------------------------------------------------------------

    pub async fn lendgine_info(&self, lendgine: &Lendgine) -> SdkResult<LendgineInfo> {
        let key = QueryKey::LendgineInfo {
            chain_id: self.config.chain_id,
            lendgine: lendgine.address,
        };
        let value = self
            .cached(key, move || async move {
                let words = self.reader.lendgine_words(&lendgine.address).await?;
                Ok::<ChainValue, SdkError>(LendgineInfo::from_words(lendgine, &words)?.into())
            })
            .await?;

        match value {
            ChainValue::LendgineInfo(info) => Ok(info),
            other => Err(unexpected(&key, &other)),
        }
    }

    /// Snapshots of all `lendgines`, fetched concurrently
    pub async fn lendgine_infos(&self, lendgines: &[Lendgine]) -> SdkResult<Vec<LendgineInfo>> {
        try_join_all(lendgines.iter().map(|l| self.lendgine_info(l))).await
    }

    /// Snapshot projected to the current time
    pub async fn accrued_info(&self, lendgine: &Lendgine) -> SdkResult<LendgineInfo> {
        let info = self.lendgine_info(lendgine).await?;
        Ok(accrued_lendgine_info(lendgine, &info, unix_now(), &self.model))
    }

    pub async fn position(&self, owner: &Address, lendgine: &Lendgine) -> SdkResult<LendginePosition> {
        let key = QueryKey::Position {
            chain_id: self.config.chain_id,
            owner: *owner,
            lendgine: lendgine.address,
        };
        let value = self
            .cached(key, move || async move {
                let words = self
                    .reader
                    .position_words(&self.config.liquidity_manager, owner, &lendgine.address)
                    .await?;
                Ok::<ChainValue, SdkError>(LendginePosition::from_words(lendgine, &words).into())
            })
            .await?;

        match value {
            ChainValue::LendginePosition(position) => Ok(position),
            other => Err(unexpected(&key, &other)),
        }
    }

    /// Position with rewards accrued up to now
    pub async fn accrued_position(&self, owner: &Address, lendgine: &Lendgine) -> SdkResult<LendginePosition> {
        let (position, info) = futures::try_join!(self.position(owner, lendgine), self.accrued_info(lendgine))?;
        Ok(accrued_position(&position, &info))
    }

    // ------------------------------------------------------------------------
    // ERC20 state
    // ------------------------------------------------------------------------

    pub async fn balance(&self, token: &Token, owner: &Address) -> SdkResult<Amount> {
        let key = QueryKey::Balance {
            chain_id: self.config.chain_id,
            token: token.address,
            owner: *owner,
        };
        let value = self
            .cached(key, move || async move {
                let raw = self.reader.balance_of(&token.address, owner).await?;
                Ok::<ChainValue, SdkError>(Amount::from_raw(token.clone(), raw).into())
            })
            .await?;
        expect_amount(&key, value)
    }

    pub async fn allowance(&self, token: &Token, owner: &Address, spender: &Address) -> SdkResult<Amount> {
        let key = QueryKey::Allowance {
            chain_id: self.config.chain_id,
            token: token.address,
            owner: *owner,
            spender: *spender,
        };
        let value = self
            .cached(key, move || async move {
                let raw = self.reader.allowance(&token.address, owner, spender).await?;
                Ok::<ChainValue, SdkError>(Amount::from_raw(token.clone(), raw).into())
            })
            .await?;
        expect_amount(&key, value)
    }

    // ------------------------------------------------------------------------
    // Indexer
    // ------------------------------------------------------------------------

    /// Valid lendgines known to the subgraph
    pub async fn load_lendgines(&self, subgraph: &dyn Subgraph, tokens: &TokenList) -> SdkResult<Vec<Lendgine>> {
        let raws = subgraph.lendgines().await?;
        Ok(normalize_lendgines(&raws, tokens, &self.config))
    }

    /// Invalidate and refetch the snapshots of `lendgines`
    pub async fn refresh(&self, lendgines: &[Lendgine]) -> SdkResult<Vec<LendgineInfo>> {
        let keys: Vec<QueryKey> = lendgines
            .iter()
            .map(|l| QueryKey::LendgineInfo {
                chain_id: self.config.chain_id,
                lendgine: l.address,
            })
            .collect();
        self.cache.invalidate(&keys).await;
        self.lendgine_infos(lendgines).await
    }
}

fn expect_amount(key: &QueryKey, value: ChainValue) -> SdkResult<Amount> {
    match value {
        ChainValue::Amount(amount) => Ok(amount),
        other => Err(unexpected(key, &other)),
    }
}

fn unexpected(key: &QueryKey, value: &ChainValue) -> SdkError {
    SdkError::UnexpectedValue {
        key: key.to_string(),
        found: value.kind(),
    }
}
