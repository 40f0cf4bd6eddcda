/// Subgraph access and normalization of indexed lendgines
///
/// Indexer rows are untrusted: a row that names an unknown token, a pair
/// outside the allowed markets or a bound that is not a power of two is
/// dropped with a debug log and never reaches callers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use lendgine_types::{
    parse_uint, wad_to_fraction, Address, Fraction, Lendgine, LendgineError, LendgineResult, Token,
};

use crate::config::ChainConfig;
use crate::errors::{SdkError, SdkResult};
use crate::tokens::TokenList;

// ============================================================================
// Raw Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawTokenRef {
    pub id: String,
}

/// Lendgine row as returned by the numoen subgraph
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLendgine {
    pub id: String,
    pub token0: RawTokenRef,
    pub token1: RawTokenRef,
    pub token0_exp: String,
    pub token1_exp: String,
    /// Bound as a decimal wad string
    pub upper_bound: String,
}

/// Hourly or daily pair reserves, as decimal strings of whole tokens
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawPricePoint {
    pub date: u64,
    pub reserve0: String,
    pub reserve1: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricePoint {
    pub timestamp: u64,
    /// token1 per token0 of the pair
    pub price: Fraction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryInterval {
    Hour,
    Day,
}

// ============================================================================
// Validation
// ============================================================================

/// A market must pair the wrapped native token or be a configured specialty pair
pub fn is_valid_market(config: &ChainConfig, token0: &Token, token1: &Token) -> bool {
    config.is_wrapped_native(token0)
        || config.is_wrapped_native(token1)
        || config
            .specialty_markets
            .iter()
            .any(|m| m.matches(&token0.address, &token1.address))
}

fn parse_exp(text: &str) -> LendgineResult<u8> {
    text.parse::<u8>()
        .map_err(|_| LendgineError::parse_error(&format!("token exponent {}", text)))
}

/// Validate one indexer row into a lendgine
pub fn parse_lendgine(raw: &RawLendgine, tokens: &TokenList, config: &ChainConfig) -> LendgineResult<Lendgine> {
    let address: Address = raw.id.parse()?;
    let label = address.to_string();

    let lookup = |id: &str| -> LendgineResult<Token> {
        let token_address: Address = id.parse()?;
        tokens
            .get(&token_address)
            .cloned()
            .ok_or_else(|| LendgineError::invalid_lendgine(&label, &format!("unknown token {}", token_address)))
    };
    let token0 = lookup(&raw.token0.id)?;
    let token1 = lookup(&raw.token1.id)?;

    if !is_valid_market(config, &token0, &token1) {
        return Err(LendgineError::invalid_lendgine(
            &label,
            &format!("{}/{} is not an allowed market", token0.symbol, token1.symbol),
        ));
    }

    let bound = wad_to_fraction(&parse_uint(&raw.upper_bound)?);

    Lendgine::new(
        token0,
        token1,
        parse_exp(&raw.token0_exp)?,
        parse_exp(&raw.token1_exp)?,
        bound,
        address,
    )
}

/// Keep the rows that validate, in order
pub fn normalize_lendgines(raws: &[RawLendgine], tokens: &TokenList, config: &ChainConfig) -> Vec<Lendgine> {
    let lendgines: Vec<Lendgine> = raws
        .iter()
        .filter_map(|raw| match parse_lendgine(raw, tokens, config) {
            Ok(lendgine) => Some(lendgine),
            Err(e) => {
                debug!(lendgine = %raw.id, error = %e, "Dropping indexed lendgine");
                None
            }
        })
        .collect();

    info!(
        chain_id = config.chain_id,
        indexed = raws.len(),
        valid = lendgines.len(),
        "Normalized lendgines"
    );
    lendgines
}

/// Lendgines over the pair `(a, b)` in either order
pub fn lendgines_for_tokens<'a>(lendgines: &'a [Lendgine], a: &Token, b: &Token) -> Vec<&'a Lendgine> {
    lendgines
        .iter()
        .filter(|l| {
            (l.token0.equals(a) && l.token1.equals(b)) || (l.token0.equals(b) && l.token1.equals(a))
        })
        .collect()
}

/// Exact `reserve0 / reserve1` of each point; points with an empty reserve1
/// are skipped and negative reserves are rejected
pub fn parse_price_history(points: &[RawPricePoint]) -> SdkResult<Vec<PricePoint>> {
    let mut parsed = Vec::with_capacity(points.len());
    for point in points {
        let reserve0 = parse_reserve(point.date, "reserve0", &point.reserve0)?;
        let reserve1 = parse_reserve(point.date, "reserve1", &point.reserve1)?;
        if reserve1.is_zero() {
            continue;
        }
        parsed.push(PricePoint {
            timestamp: point.date,
            price: reserve0 / reserve1,
        });
    }
    Ok(parsed)
}

fn parse_reserve(date: u64, field: &str, text: &str) -> SdkResult<Fraction> {
    let reserve = Fraction::from_decimal_str(text)?;
    if reserve.is_negative() {
        return Err(SdkError::ParseError(format!(
            "negative {} '{}' in price point at {}",
            field, text, date
        )));
    }
    Ok(reserve)
}

// ============================================================================
// Subgraph Port
// ============================================================================

/// Query interface of the indexers
#[async_trait]
pub trait Subgraph: Send + Sync {
    async fn lendgines(&self) -> SdkResult<Vec<RawLendgine>>;

    /// Reserve history of a Uniswap V2 pair; `None` when the pair is unknown
    async fn price_history(
        &self,
        pair: &Address,
        interval: HistoryInterval,
    ) -> SdkResult<Option<Vec<RawPricePoint>>>;
}

const LENDGINES_QUERY: &str = "query Lendgines { lendgines(first: 1000) { id token0 { id } token1 { id } token0Exp token1Exp upperBound } }";

const HOUR_HISTORY_QUERY: &str = "query PriceHistoryHourV2($id: ID!) { pair(id: $id) { hourData: pairHourData(first: 168, orderBy: hourStartUnix, orderDirection: desc) { date: hourStartUnix reserve0 reserve1 } } }";

const DAY_HISTORY_QUERY: &str = "query PriceHistoryDayV2($id: ID!) { pair(id: $id) { dayData(first: 365, orderBy: date, orderDirection: desc) { date reserve0 reserve1 } } }";

/// GraphQL-over-HTTP client for the numoen and uniswap subgraphs
pub struct HttpSubgraph {
    client: reqwest::Client,
    numoen_url: String,
    uniswap_v2_url: String,
}

impl HttpSubgraph {
    pub fn new(config: &ChainConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            numoen_url: config.numoen_subgraph.clone(),
            uniswap_v2_url: config.uniswap_v2_subgraph.clone(),
        }
    }

    async fn request(&self, url: &str, query: &str, variables: Value) -> SdkResult<Value> {
        let response: Value = self
            .client
            .post(url)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        graphql_data(response)
    }
}

/// Unwrap the `data` member of a GraphQL response
fn graphql_data(mut response: Value) -> SdkResult<Value> {
    if let Some(errors) = response.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect();
            return Err(SdkError::SubgraphError(messages.join("; ")));
        }
    }
    match response.get_mut("data") {
        Some(data) if !data.is_null() => Ok(data.take()),
        _ => Err(SdkError::SubgraphError("response has no data".to_string())),
    }
}

fn take_field(mut value: Value, field: &str) -> Value {
    value.get_mut(field).map(Value::take).unwrap_or(Value::Null)
}

#[async_trait]
impl Subgraph for HttpSubgraph {
    async fn lendgines(&self) -> SdkResult<Vec<RawLendgine>> {
        let data = self.request(&self.numoen_url, LENDGINES_QUERY, json!({})).await?;
        Ok(serde_json::from_value(take_field(data, "lendgines"))?)
    }

    async fn price_history(
        &self,
        pair: &Address,
        interval: HistoryInterval,
    ) -> SdkResult<Option<Vec<RawPricePoint>>> {
        let (query, field) = match interval {
            HistoryInterval::Hour => (HOUR_HISTORY_QUERY, "hourData"),
            HistoryInterval::Day => (DAY_HISTORY_QUERY, "dayData"),
        };
        let data = self
            .request(&self.uniswap_v2_url, query, json!({ "id": pair.to_string() }))
            .await?;

        let pair_data = take_field(data, "pair");
        if pair_data.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(take_field(pair_data, field))?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarketPair;

    fn raw(id: &str, token0: &str, token1: &str, upper_bound: &str) -> RawLendgine {
        RawLendgine {
            id: id.to_string(),
            token0: RawTokenRef { id: token0.to_string() },
            token1: RawTokenRef { id: token1.to_string() },
            token0_exp: "18".to_string(),
            token1_exp: "6".to_string(),
            upper_bound: upper_bound.to_string(),
        }
    }

    const WETH: &str = "0x82af49447d8a07e3bd95bd0d56f35241523fbab1";
    const USDC: &str = "0xff970a61a04b1ca14834a43f5de4533ebddb5cc8";
    const ARB: &str = "0x912ce59144191c1204e64559fe8253a0e49e6548";

    #[test]
    fn test_parse_subgraph_json() {
        let body = r#"{"data":{"lendgines":[{"id":"0x1111111111111111111111111111111111111111",
            "token0":{"id":"0x82af49447d8a07e3bd95bd0d56f35241523fbab1"},
            "token1":{"id":"0xff970a61a04b1ca14834a43f5de4533ebddb5cc8"},
            "token0Exp":"18","token1Exp":"6","upperBound":"4096000000000000000000"}]}}"#;

        let data = graphql_data(serde_json::from_str(body).unwrap()).unwrap();
        let raws: Vec<RawLendgine> = serde_json::from_value(take_field(data, "lendgines")).unwrap();
        assert_eq!(raws.len(), 1);
        assert_eq!(raws[0].token1_exp, "6");

        let config = ChainConfig::arbitrum().unwrap();
        let lendgine = parse_lendgine(&raws[0], &TokenList::from_config(&config), &config).unwrap();
        assert_eq!(lendgine.bound, Fraction::from_integer(4096));
        assert_eq!(lendgine.token1.symbol, "USDC");
    }

    #[test]
    fn test_graphql_errors_are_reported() {
        let body = json!({ "errors": [{ "message": "indexing error" }], "data": null });
        assert!(matches!(
            graphql_data(body),
            Err(SdkError::SubgraphError(message)) if message == "indexing error"
        ));
    }

    #[test]
    fn test_invalid_rows_are_dropped() {
        let config = ChainConfig::arbitrum().unwrap();
        let tokens = TokenList::from_config(&config);
        let unknown = "0x0000000000000000000000000000000000000042";

        let rows = vec![
            raw("0x1111111111111111111111111111111111111111", WETH, USDC, "4096000000000000000000"),
            // non power of two
            raw("0x2222222222222222222222222222222222222222", WETH, USDC, "3000000000000000000000"),
            // unknown token
            raw("0x3333333333333333333333333333333333333333", unknown, USDC, "1000000000000000000"),
            // neither side wrapped native
            raw("0x4444444444444444444444444444444444444444", ARB, USDC, "2000000000000000000"),
            // bad exponent
            RawLendgine { token0_exp: "x".to_string(), ..raw("0x5555555555555555555555555555555555555555", WETH, USDC, "1000000000000000000") },
            // fractional bound
            raw("0x6666666666666666666666666666666666666666", USDC, WETH, "500000000000000000"),
        ];

        let lendgines = normalize_lendgines(&rows, &tokens, &config);
        let addresses: Vec<String> = lendgines.iter().map(|l| l.address.to_string()).collect();
        assert_eq!(
            addresses,
            vec![
                "0x1111111111111111111111111111111111111111".to_string(),
                "0x6666666666666666666666666666666666666666".to_string(),
            ]
        );
    }

    #[test]
    fn test_specialty_market_is_allowed() {
        let mut config = ChainConfig::arbitrum().unwrap();
        let tokens = TokenList::from_config(&config);
        let row = raw("0x4444444444444444444444444444444444444444", ARB, USDC, "2000000000000000000");
        assert!(parse_lendgine(&row, &tokens, &config).is_err());

        config.specialty_markets.push(MarketPair {
            base: USDC.parse().unwrap(),
            quote: ARB.parse().unwrap(),
        });
        assert!(parse_lendgine(&row, &tokens, &config).is_ok());
    }

    #[test]
    fn test_price_history_is_exact() {
        let points = vec![
            RawPricePoint { date: 100, reserve0: "1500.25".to_string(), reserve1: "0.5".to_string() },
            RawPricePoint { date: 200, reserve0: "10".to_string(), reserve1: "0".to_string() },
        ];
        let parsed = parse_price_history(&points).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].timestamp, 100);
        assert_eq!(parsed[0].price, Fraction::new(300_050, 100));
    }

    #[test]
    fn test_negative_reserves_are_rejected() {
        let points = vec![
            RawPricePoint { date: 100, reserve0: "10".to_string(), reserve1: "2".to_string() },
            RawPricePoint { date: 200, reserve0: "-10".to_string(), reserve1: "2".to_string() },
        ];
        assert!(matches!(parse_price_history(&points), Err(SdkError::ParseError(_))));

        let points = vec![RawPricePoint { date: 300, reserve0: "10".to_string(), reserve1: "-0.5".to_string() }];
        assert!(matches!(parse_price_history(&points), Err(SdkError::ParseError(_))));
    }

    #[test]
    fn test_price_history_accepts_exponent_notation() {
        let points = vec![RawPricePoint { date: 100, reserve0: "3e-6".to_string(), reserve1: "1.5E-6".to_string() }];
        let parsed = parse_price_history(&points).unwrap();
        assert_eq!(parsed[0].price, Fraction::from_integer(2));
    }

    #[test]
    fn test_lendgines_for_tokens_matches_either_order() {
        let config = ChainConfig::arbitrum().unwrap();
        let tokens = TokenList::from_config(&config);
        let rows = vec![
            raw("0x1111111111111111111111111111111111111111", WETH, USDC, "4096000000000000000000"),
            raw("0x6666666666666666666666666666666666666666", USDC, WETH, "500000000000000000"),
        ];
        let lendgines = normalize_lendgines(&rows, &tokens, &config);
        let weth = tokens.get(&WETH.parse().unwrap()).unwrap();
        let usdc = tokens.get(&USDC.parse().unwrap()).unwrap();
        let arb = tokens.get(&ARB.parse().unwrap()).unwrap();
        assert_eq!(lendgines_for_tokens(&lendgines, usdc, weth).len(), 2);
        assert!(lendgines_for_tokens(&lendgines, arb, weth).is_empty());
    }
}
