/// Token-tagged exact quantities

use num_bigint::BigInt;
use std::fmt;
use std::ops::{Add, Sub};

use crate::constants::ten_pow;
use crate::fraction::Fraction;
use crate::token::Token;

/// Exact quantity of a token, held in raw (smallest) units.
///
/// Arithmetic and comparison between amounts of different tokens is a
/// programming error and panics.
#[derive(Debug, Clone)]
pub struct Amount {
    token: Token,
    value: Fraction,
}

impl Amount {
    /// Amount from an integer count of raw units
    pub fn from_raw(token: Token, raw: impl Into<BigInt>) -> Self {
        Self {
            token,
            value: Fraction::from_integer(raw),
        }
    }

    /// Amount from a possibly fractional count of raw units
    pub fn from_fraction(token: Token, value: Fraction) -> Self {
        Self { token, value }
    }

    /// Amount from a value in whole token units (`1.5` WETH)
    pub fn from_whole(token: Token, whole: &Fraction) -> Self {
        let value = whole * Fraction::from_integer(ten_pow(token.decimals as u32));
        Self { token, value }
    }

    pub fn zero(token: Token) -> Self {
        Self::from_raw(token, 0u8)
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Raw units, possibly fractional
    pub fn value(&self) -> &Fraction {
        &self.value
    }

    /// Raw units floored to an integer, as sent to a contract
    pub fn quotient(&self) -> BigInt {
        self.value.quotient()
    }

    /// Value in whole token units
    pub fn to_exact(&self) -> Fraction {
        &self.value / Fraction::from_integer(ten_pow(self.token.decimals as u32))
    }

    /// Whole-unit rendering with `digits` decimals
    pub fn to_fixed(&self, digits: u32) -> String {
        self.to_exact().to_fixed(digits)
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn multiply(&self, factor: &Fraction) -> Amount {
        Amount::from_fraction(self.token.clone(), &self.value * factor)
    }

    /// Panics when dividing by zero.
    pub fn divide(&self, divisor: &Fraction) -> Amount {
        Amount::from_fraction(self.token.clone(), &self.value / divisor)
    }

    /// Ratio of two amounts of the same token
    pub fn ratio(&self, other: &Amount) -> Fraction {
        self.assert_same_token(other);
        &self.value / &other.value
    }

    /// Convert into `to` at `rate` whole units of `to` per whole unit of this token
    pub fn convert(&self, rate: &Fraction, to: &Token) -> Amount {
        Amount::from_whole(to.clone(), &(self.to_exact() * rate))
    }

    /// Reinterpret the raw value as another token (same raw count)
    pub fn with_token(&self, token: &Token) -> Amount {
        Amount::from_fraction(token.clone(), self.value.clone())
    }

    pub fn greater_than(&self, other: &Amount) -> bool {
        self.assert_same_token(other);
        self.value > other.value
    }

    pub fn less_than(&self, other: &Amount) -> bool {
        self.assert_same_token(other);
        self.value < other.value
    }

    pub fn equal_to(&self, other: &Amount) -> bool {
        self.assert_same_token(other);
        self.value == other.value
    }

    fn assert_same_token(&self, other: &Amount) {
        assert!(
            self.token.equals(&other.token),
            "currency mismatch: {} ({}) vs {} ({})",
            self.token.symbol,
            self.token.address,
            other.token.symbol,
            other.token.address,
        );
    }
}

impl<'a, 'b> Add<&'b Amount> for &'a Amount {
    type Output = Amount;

    fn add(self, other: &'b Amount) -> Amount {
        self.assert_same_token(other);
        Amount::from_fraction(self.token.clone(), &self.value + &other.value)
    }
}

impl<'a, 'b> Sub<&'b Amount> for &'a Amount {
    type Output = Amount;

    fn sub(self, other: &'b Amount) -> Amount {
        self.assert_same_token(other);
        Amount::from_fraction(self.token.clone(), &self.value - &other.value)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, other: Amount) -> Amount {
        &self + &other
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, other: Amount) -> Amount {
        &self - &other
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.token.equals(&other.token) && self.value == other.value
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_fixed(6), self.token.symbol)
    }
}
