/// Conversions between exact values and the chain's unsigned 256-bit words

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{Num, One};
use std::str::FromStr;

use crate::errors::{LendgineError, LendgineResult};
use crate::fraction::Fraction;

/// Largest value a uint256 can hold
pub fn uint256_max() -> BigUint {
    (BigUint::one() << 256u32) - 1u8
}

/// Encode a non-negative integer as a chain word
pub fn to_uint256(value: &BigInt) -> LendgineResult<BigUint> {
    match value.sign() {
        Sign::Minus => Err(LendgineError::NegativeValue {
            value: value.to_string(),
        }),
        _ => {
            let magnitude = value.magnitude().clone();
            if magnitude > uint256_max() {
                return Err(LendgineError::Uint256Overflow {
                    value: value.to_string(),
                });
            }
            Ok(magnitude)
        }
    }
}

/// Floor a fraction and encode it as a chain word
pub fn fraction_to_uint256(value: &Fraction) -> LendgineResult<BigUint> {
    to_uint256(&value.quotient())
}

/// Decode a word that represents a `1e18`-scaled fixed-point value
pub fn wad_to_fraction(word: &BigUint) -> Fraction {
    Fraction::new(BigInt::from(word.clone()), crate::constants::scale())
}

/// Parse a decimal or `0x`-prefixed hexadecimal unsigned integer, as
/// returned by JSON-RPC nodes and subgraphs
pub fn parse_uint(text: &str) -> LendgineResult<BigUint> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex_digits) => BigUint::from_str_radix(hex_digits, 16),
        None => BigUint::from_str(text),
    };
    parsed.map_err(|e| LendgineError::parse_error(&format!("'{}' is not an unsigned integer: {}", text, e)))
}
