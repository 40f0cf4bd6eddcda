/// Lendgine markets and their on-chain snapshots
///
/// A [`Lendgine`] is the immutable description of one market instance.
/// [`LendgineInfo`] and [`LendginePosition`] are point-in-time reads of its
/// storage; newer snapshots replace older ones wholesale.

use num_bigint::{BigInt, BigUint};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::amount::Amount;
use crate::constants::{ten_pow, LENDGINE_TOKEN_DECIMALS, MAX_TOKEN_EXP, SCALE_DECIMALS};
use crate::encoding::wad_to_fraction;
use crate::errors::{LendgineError, LendgineResult};
use crate::fraction::Fraction;
use crate::token::{Address, Token};

// ============================================================================
// Lendgine
// ============================================================================

/// One deployed lendgine instance
#[derive(Debug, Clone)]
pub struct Lendgine {
    /// Speculative (numeraire) token
    pub token0: Token,
    /// Base (collateral) token
    pub token1: Token,
    pub token0_exp: u8,
    pub token1_exp: u8,
    /// Upper bound of the price, token0 per token1, always a power of two
    pub bound: Fraction,
    pub address: Address,
    /// Position/share token issued by the instance
    pub lendgine_token: Token,
}

impl Lendgine {
    /// Build a validated lendgine description
    pub fn new(
        token0: Token,
        token1: Token,
        token0_exp: u8,
        token1_exp: u8,
        bound: Fraction,
        address: Address,
    ) -> LendgineResult<Self> {
        let label = address.to_string();

        if token0.equals(&token1) {
            return Err(LendgineError::invalid_lendgine(&label, "token0 and token1 are identical"));
        }
        if token0.chain_id != token1.chain_id {
            return Err(LendgineError::invalid_lendgine(&label, "tokens live on different chains"));
        }
        for (name, exp) in [("token0_exp", token0_exp), ("token1_exp", token1_exp)] {
            if exp > MAX_TOKEN_EXP {
                return Err(LendgineError::invalid_parameter(
                    name,
                    &exp.to_string(),
                    &format!("<= {}", MAX_TOKEN_EXP),
                ));
            }
        }
        if !bound.is_power_of_two() {
            return Err(LendgineError::invalid_lendgine(
                &label,
                &format!("bound {} is not a power of two", bound),
            ));
        }

        let lendgine_token = Token::new(
            token0.chain_id,
            address,
            LENDGINE_TOKEN_DECIMALS,
            &format!("{}+{}", token0.symbol, token1.symbol),
            "Numoen Lendgine",
        );

        Ok(Self {
            token0,
            token1,
            token0_exp,
            token1_exp,
            bound,
            address,
            lendgine_token,
        })
    }

    /// Multiplier that lifts raw token0 units to 18-decimal fixed point
    pub fn token0_scale(&self) -> BigInt {
        ten_pow(SCALE_DECIMALS - self.token0_exp as u32)
    }

    /// Multiplier that lifts raw token1 units to 18-decimal fixed point
    pub fn token1_scale(&self) -> BigInt {
        ten_pow(SCALE_DECIMALS - self.token1_exp as u32)
    }

    /// Bound as the contracts store it (`bound * 1e18`, floored)
    pub fn bound_wad(&self) -> BigInt {
        (&self.bound * Fraction::from_integer(ten_pow(SCALE_DECIMALS))).quotient()
    }

    /// Whether the lendgine pairs the same two tokens as `other`, in order
    pub fn same_pair(&self, other: &Lendgine) -> bool {
        self.token0.equals(&other.token0) && self.token1.equals(&other.token1)
    }

    /// Whether `token` is one side of the pair
    pub fn contains(&self, token: &Token) -> bool {
        self.token0.equals(token) || self.token1.equals(token)
    }
}

impl PartialEq for Lendgine {
    fn eq(&self, other: &Self) -> bool {
        self.token0.chain_id == other.token0.chain_id && self.address == other.address
    }
}

impl Eq for Lendgine {}

impl Hash for Lendgine {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token0.chain_id.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Lendgine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} x{} ({})",
            self.token0.symbol, self.token1.symbol, self.bound, self.address
        )
    }
}

// ============================================================================
// Snapshots
// ============================================================================

/// Raw storage words of a lendgine, in contract order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LendgineWords {
    pub total_position_size: BigUint,
    pub total_liquidity_borrowed: BigUint,
    pub reward_per_position_stored: BigUint,
    pub last_update: BigUint,
    pub total_supply: BigUint,
    pub reserve0: BigUint,
    pub reserve1: BigUint,
    pub total_liquidity: BigUint,
}

/// Raw words of a liquidity-manager position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionWords {
    pub size: BigUint,
    pub reward_per_position_paid: BigUint,
    pub tokens_owed: BigUint,
}

/// Snapshot of a lendgine's global state
#[derive(Debug, Clone, PartialEq)]
pub struct LendgineInfo {
    pub total_position_size: Amount,
    pub total_liquidity: Amount,
    pub total_liquidity_borrowed: Amount,
    pub total_supply: Amount,
    pub reserve0: Amount,
    pub reserve1: Amount,
    /// Raw token1 per raw position unit
    pub reward_per_position_stored: Fraction,
    /// Unix seconds of the last accrual
    pub last_update: u64,
}

impl LendgineInfo {
    pub fn from_words(lendgine: &Lendgine, words: &LendgineWords) -> LendgineResult<Self> {
        let share = &lendgine.lendgine_token;
        Ok(Self {
            total_position_size: Amount::from_raw(share.clone(), words.total_position_size.clone()),
            total_liquidity: Amount::from_raw(share.clone(), words.total_liquidity.clone()),
            total_liquidity_borrowed: Amount::from_raw(
                share.clone(),
                words.total_liquidity_borrowed.clone(),
            ),
            total_supply: Amount::from_raw(share.clone(), words.total_supply.clone()),
            reserve0: Amount::from_raw(lendgine.token0.clone(), words.reserve0.clone()),
            reserve1: Amount::from_raw(lendgine.token1.clone(), words.reserve1.clone()),
            reward_per_position_stored: wad_to_fraction(&words.reward_per_position_stored),
            last_update: word_to_timestamp(&words.last_update)?,
        })
    }

    /// Snapshot of a lendgine that has never been used
    pub fn empty(lendgine: &Lendgine) -> Self {
        let share = &lendgine.lendgine_token;
        Self {
            total_position_size: Amount::zero(share.clone()),
            total_liquidity: Amount::zero(share.clone()),
            total_liquidity_borrowed: Amount::zero(share.clone()),
            total_supply: Amount::zero(share.clone()),
            reserve0: Amount::zero(lendgine.token0.clone()),
            reserve1: Amount::zero(lendgine.token1.clone()),
            reward_per_position_stored: Fraction::zero(),
            last_update: 0,
        }
    }
}

/// An owner's liquidity position in one lendgine
#[derive(Debug, Clone, PartialEq)]
pub struct LendginePosition {
    pub size: Amount,
    pub reward_per_position_paid: Fraction,
    /// Interest owed to the provider, in token1
    pub tokens_owed: Amount,
}

impl LendginePosition {
    pub fn from_words(lendgine: &Lendgine, words: &PositionWords) -> Self {
        Self {
            size: Amount::from_raw(lendgine.lendgine_token.clone(), words.size.clone()),
            reward_per_position_paid: wad_to_fraction(&words.reward_per_position_paid),
            tokens_owed: Amount::from_raw(lendgine.token1.clone(), words.tokens_owed.clone()),
        }
    }

    pub fn empty(lendgine: &Lendgine) -> Self {
        Self::from_words(lendgine, &PositionWords::default())
    }
}

fn word_to_timestamp(word: &BigUint) -> LendgineResult<u64> {
    u64::try_from(word).map_err(|_| LendgineError::invalid_parameter("last_update", &word.to_string(), "u64 timestamp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(byte: u8, decimals: u8, symbol: &str) -> Token {
        Token::new(42_161, Address::new([byte; 20]), decimals, symbol, symbol)
    }

    fn lendgine(bound: Fraction) -> LendgineResult<Lendgine> {
        Lendgine::new(
            token(1, 18, "WETH"),
            token(2, 6, "USDC"),
            18,
            6,
            bound,
            Address::new([9; 20]),
        )
    }

    #[test]
    fn test_lendgine_validation() {
        assert!(lendgine(Fraction::from_integer(3000)).is_err());
        assert!(lendgine(Fraction::new(1, 4)).is_ok());

        let same = Lendgine::new(
            token(1, 18, "WETH"),
            token(1, 18, "WETH"),
            18,
            18,
            Fraction::one(),
            Address::new([9; 20]),
        );
        assert!(matches!(same, Err(LendgineError::InvalidLendgine { .. })));

        let bad_exp = Lendgine::new(
            token(1, 18, "WETH"),
            token(2, 6, "USDC"),
            19,
            6,
            Fraction::one(),
            Address::new([9; 20]),
        );
        assert!(matches!(bad_exp, Err(LendgineError::InvalidParameter { .. })));
    }

    #[test]
    fn test_token_scales() {
        let l = lendgine(Fraction::from_integer(4096)).unwrap();
        assert_eq!(l.token0_scale(), BigInt::from(1));
        assert_eq!(l.token1_scale(), ten_pow(12));
        assert_eq!(l.bound_wad(), BigInt::from(4096) * ten_pow(18));
        assert_eq!(l.lendgine_token.address, l.address);
        assert_eq!(l.lendgine_token.decimals, 18);
    }

    #[test]
    fn test_info_from_words() {
        let l = lendgine(Fraction::from_integer(4)).unwrap();
        let words = LendgineWords {
            total_position_size: BigUint::from(10u8),
            total_liquidity_borrowed: BigUint::from(2u8),
            reward_per_position_stored: BigUint::from(5u64) * BigUint::from(10u64).pow(17),
            last_update: BigUint::from(1_700_000_000u64),
            total_supply: BigUint::from(2u8),
            reserve0: BigUint::from(100u8),
            reserve1: BigUint::from(50u8),
            total_liquidity: BigUint::from(8u8),
        };
        let info = LendgineInfo::from_words(&l, &words).unwrap();
        assert_eq!(info.reward_per_position_stored, Fraction::new(1, 2));
        assert_eq!(info.last_update, 1_700_000_000);
        assert_eq!(info.reserve0.token(), &l.token0);
        assert_eq!(info.total_liquidity.token(), &l.lendgine_token);

        let overflowing = LendgineWords {
            last_update: BigUint::from(u64::MAX) + 1u8,
            ..words
        };
        assert!(LendgineInfo::from_words(&l, &overflowing).is_err());
    }

    #[test]
    fn test_identity_by_address() {
        let a = lendgine(Fraction::one()).unwrap();
        let mut b = a.clone();
        b.bound = Fraction::from_integer(2);
        assert_eq!(a, b);
    }
}
