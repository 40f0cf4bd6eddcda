/// Chain deployments, client settings and their TOML loading

use anyhow::Context;
use lendgine_types::{
    Address, Amount, Fraction, LendgineError, Token, ARBITRUM_CHAIN_ID, BPS_DENOMINATOR,
    DEFAULT_MAX_SLIPPAGE_BPS, DEFAULT_STALE_TIME_MS, DEFAULT_TIMEOUT_MINUTES,
};
use lendgine_math::slippage_minimum;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::time::Duration;

use crate::errors::{SdkError, SdkResult};

// ============================================================================
// Chain Configuration
// ============================================================================

/// Contracts, endpoints and tokens of one chain deployment
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,

    pub factory: Address,
    pub lendgine_router: Address,
    pub liquidity_manager: Address,

    pub numoen_subgraph: String,
    pub uniswap_v2_subgraph: String,
    pub uniswap_v3_subgraph: String,

    pub wrapped_native: Token,

    /// Pairs allowed even though neither side is the wrapped native token
    #[serde(default)]
    pub specialty_markets: Vec<MarketPair>,

    /// Known token list; lendgines over unknown tokens are dropped
    #[serde(default)]
    pub tokens: Vec<Token>,
}

/// Unordered pair of token addresses
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MarketPair {
    pub base: Address,
    pub quote: Address,
}

impl MarketPair {
    pub fn matches(&self, a: &Address, b: &Address) -> bool {
        (&self.base == a && &self.quote == b) || (&self.base == b && &self.quote == a)
    }
}

impl ChainConfig {
    /// Built-in Arbitrum One deployment
    pub fn arbitrum() -> SdkResult<Self> {
        let weth = Token::new(
            ARBITRUM_CHAIN_ID,
            "0x82af49447d8a07e3bd95bd0d56f35241523fbab1".parse()?,
            18,
            "WETH",
            "Wrapped Ether",
        );
        let usdc = Token::new(
            ARBITRUM_CHAIN_ID,
            "0xff970a61a04b1ca14834a43f5de4533ebddb5cc8".parse()?,
            6,
            "USDC",
            "USD Coin (Arb1)",
        );
        let arb = Token::new(
            ARBITRUM_CHAIN_ID,
            "0x912ce59144191c1204e64559fe8253a0e49e6548".parse()?,
            18,
            "ARB",
            "Arbitrum",
        );

        Ok(Self {
            chain_id: ARBITRUM_CHAIN_ID,
            name: "Arbitrum One".to_string(),
            factory: "0x8396a792510a402681812ece6ad3ff19261928ba".parse()?,
            lendgine_router: "0x6a931466f6c79724cb5e78eab6e493b6af189ff0".parse()?,
            liquidity_manager: "0x6b0c66824c39766f554f07481b66ca24a54a90e0".parse()?,
            numoen_subgraph: "https://api.thegraph.com/subgraphs/name/kyscott18/numoen-arbitrum".to_string(),
            uniswap_v2_subgraph: "https://api.thegraph.com/subgraphs/name/sushiswap/exchange-arbitrum-backup"
                .to_string(),
            uniswap_v3_subgraph: "https://api.thegraph.com/subgraphs/name/ianlapham/arbitrum-dev".to_string(),
            wrapped_native: weth.clone(),
            specialty_markets: Vec::new(),
            tokens: vec![weth, usdc, arb],
        })
    }

    pub fn is_wrapped_native(&self, token: &Token) -> bool {
        self.wrapped_native.equals(token)
    }

    /// Validate chain configuration
    fn validate(&self) -> SdkResult<()> {
        if self.name.is_empty() {
            return Err(invalid("name", "empty", "non-empty string"));
        }

        for (field, address) in [
            ("factory", &self.factory),
            ("lendgine_router", &self.lendgine_router),
            ("liquidity_manager", &self.liquidity_manager),
        ] {
            if address.is_zero() {
                return Err(invalid(field, &address.to_string(), "non-zero address"));
            }
        }

        for (field, url) in [
            ("numoen_subgraph", &self.numoen_subgraph),
            ("uniswap_v2_subgraph", &self.uniswap_v2_subgraph),
            ("uniswap_v3_subgraph", &self.uniswap_v3_subgraph),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(invalid(field, url, "http(s) URL"));
            }
        }

        for token in self.tokens.iter().chain(std::iter::once(&self.wrapped_native)) {
            if token.chain_id != self.chain_id {
                return Err(invalid(
                    "tokens",
                    &format!("{} on chain {}", token.symbol, token.chain_id),
                    &format!("tokens on chain {}", self.chain_id),
                ));
            }
            if token.decimals > 18 {
                return Err(invalid("tokens", &format!("{} decimals", token.decimals), "at most 18"));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Settings
// ============================================================================

/// User transaction preferences
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Maximum slippage in basis points
    pub max_slippage_bps: u64,
    /// Minutes until a submitted transaction expires
    pub timeout_minutes: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_slippage_bps: DEFAULT_MAX_SLIPPAGE_BPS,
            timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
        }
    }
}

impl Settings {
    /// Maximum slippage as a fraction of one
    pub fn max_slippage(&self) -> Fraction {
        Fraction::from_bps(self.max_slippage_bps)
    }

    /// Smallest raw amount accepted for `amount`
    pub fn minimum(&self, amount: &Amount) -> BigInt {
        slippage_minimum(amount, &self.max_slippage())
    }

    /// Unix deadline for a transaction built at `now`
    pub fn deadline(&self, now: u64) -> u64 {
        now + self.timeout_minutes * 60
    }

    fn validate(&self) -> SdkResult<()> {
        if self.max_slippage_bps > BPS_DENOMINATOR {
            return Err(invalid(
                "max_slippage_bps",
                &self.max_slippage_bps.to_string(),
                "at most 10000 (100%)",
            ));
        }
        if self.timeout_minutes == 0 {
            return Err(invalid("timeout_minutes", "0", "greater than 0"));
        }
        Ok(())
    }
}

// ============================================================================
// Client Configuration
// ============================================================================

/// Client configuration loaded from a TOML file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub settings: Settings,

    /// Staleness window of cached contract reads, in milliseconds
    #[serde(default = "default_stale_time_ms")]
    pub stale_time_ms: u64,

    /// Interval between snapshot refreshes, in seconds
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    pub chains: Vec<ChainConfig>,
}

fn default_stale_time_ms() -> u64 {
    DEFAULT_STALE_TIME_MS
}

fn default_poll_interval_secs() -> u64 {
    12
}

impl ClientConfig {
    /// Load configuration from TOML file
    pub fn load(path: &str) -> SdkResult<Self> {
        Self::read(path).map_err(|e| SdkError::Config(format!("{:#}", e)))?.validated()
    }

    fn read(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path))?;
        let config = toml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path))?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> SdkResult<Self> {
        let config: ClientConfig = toml::from_str(content).map_err(|e| SdkError::Config(e.to_string()))?;
        config.validated()
    }

    fn validated(self) -> SdkResult<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration
    fn validate(&self) -> SdkResult<()> {
        if self.chains.is_empty() {
            return Err(invalid("chains", "empty", "at least one chain"));
        }
        if self.stale_time_ms == 0 {
            return Err(invalid("stale_time_ms", "0", "greater than 0"));
        }
        if self.poll_interval_secs == 0 {
            return Err(invalid("poll_interval_secs", "0", "greater than 0"));
        }
        self.settings.validate()?;

        let mut seen = HashSet::new();
        for chain in &self.chains {
            chain.validate()?;
            if !seen.insert(chain.chain_id) {
                return Err(invalid("chain_id", &chain.chain_id.to_string(), "unique chain ids"));
            }
        }
        Ok(())
    }

    pub fn stale_time(&self) -> Duration {
        Duration::from_millis(self.stale_time_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Deployment for `chain_id`; unconfigured chains fail fast
    pub fn for_chain(&self, chain_id: u64) -> SdkResult<&ChainConfig> {
        self.chains
            .iter()
            .find(|c| c.chain_id == chain_id)
            .ok_or(SdkError::Lendgine(LendgineError::UnsupportedChain { chain_id }))
    }

    /// Built-in configuration covering Arbitrum One
    pub fn builtin() -> SdkResult<Self> {
        Ok(Self {
            settings: Settings::default(),
            stale_time_ms: default_stale_time_ms(),
            poll_interval_secs: default_poll_interval_secs(),
            chains: vec![ChainConfig::arbitrum()?],
        })
    }
}

fn invalid(parameter: &str, value: &str, expected: &str) -> SdkError {
    SdkError::Lendgine(LendgineError::invalid_parameter(parameter, value, expected))
}
