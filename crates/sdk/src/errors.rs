use lendgine_types::LendgineError;
use thiserror::Error;

use crate::transactions::DisableReason;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Lendgine(#[from] LendgineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Subgraph error: {0}")]
    SubgraphError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    /// A cached entry held a different kind of value than the key implies
    #[error("Unexpected {found} value cached for {key}")]
    UnexpectedValue { key: String, found: &'static str },

    /// Transaction cannot be built from the current input
    #[error("Transaction disabled: {0}")]
    Disabled(DisableReason),

    #[error("Transaction failed: {0}")]
    Transaction(#[from] TxError),
}

/// Why a submitted transaction did not reach a receipt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxError {
    #[error("User rejected the request")]
    UserRejected,

    #[error("Transaction reverted: {0}")]
    Reverted(String),

    #[error("RPC failure: {0}")]
    Rpc(String),
}

impl From<reqwest::Error> for SdkError {
    fn from(err: reqwest::Error) -> Self {
        SdkError::SubgraphError(err.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::ParseError(err.to_string())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
