use thiserror::Error;

// ============================================================================
// Main Error Enum
// ============================================================================

/// Recoverable errors raised while building or decoding lendgine values.
///
/// Precondition violations (mixed currencies, zero denominators) are not
/// represented here; those panic at the call site.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LendgineError {
    // ========================================================================
    // Validation Errors
    // ========================================================================

    /// Invalid parameter
    #[error("Invalid parameter '{parameter}': got '{value}', expected '{expected}'")]
    InvalidParameter { parameter: String, value: String, expected: String },

    /// Indexer record rejected during normalization
    #[error("Invalid lendgine {address}: {reason}")]
    InvalidLendgine { address: String, reason: String },

    /// Address could not be parsed
    #[error("Invalid address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },

    // ========================================================================
    // Encoding Errors
    // ========================================================================

    /// Value does not fit the chain's 256-bit word
    #[error("Value {value} does not fit in a uint256")]
    Uint256Overflow { value: String },

    /// Negative value where an unsigned chain word is required
    #[error("Negative value {value} cannot be encoded as an unsigned word")]
    NegativeValue { value: String },

    /// Number could not be parsed
    #[error("Parse error: {message}")]
    Parse { message: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================

    /// Chain id has no configuration entry
    #[error("Unsupported chain id {chain_id}")]
    UnsupportedChain { chain_id: u64 },
}

impl LendgineError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: &str, value: &str, expected: &str) -> Self {
        Self::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Create an invalid lendgine error
    pub fn invalid_lendgine(address: &str, reason: &str) -> Self {
        Self::InvalidLendgine {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid address error
    pub fn invalid_address(value: &str, reason: &str) -> Self {
        Self::InvalidAddress {
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a parse error
    pub fn parse_error(message: &str) -> Self {
        Self::Parse {
            message: message.to_string(),
        }
    }
}

/// Result type alias using the shared error type
pub type LendgineResult<T> = std::result::Result<T, LendgineError>;
