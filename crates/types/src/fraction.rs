/// Exact rational numbers for prices, ratios and amounts
///
/// Fractions are kept unreduced as produced by arithmetic; equality and
/// ordering compare exact values, so `1/2 == 2/4`. Nothing here ever goes
/// through floating point.

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use crate::constants::ten_pow;
use crate::errors::{LendgineError, LendgineResult};

/// Exact rational number with an arbitrary-precision numerator and a
/// strictly positive denominator.
#[derive(Clone)]
pub struct Fraction {
    numerator: BigInt,
    denominator: BigInt,
}

impl Fraction {
    /// Create a fraction. Panics on a zero denominator.
    pub fn new(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Self {
        let numerator = numerator.into();
        let denominator = denominator.into();
        assert!(!denominator.is_zero(), "fraction denominator must be non-zero");

        if denominator.is_negative() {
            Self {
                numerator: -numerator,
                denominator: -denominator,
            }
        } else {
            Self { numerator, denominator }
        }
    }

    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self::new(value, 1u8)
    }

    pub fn zero() -> Self {
        Self::from_integer(0u8)
    }

    pub fn one() -> Self {
        Self::from_integer(1u8)
    }

    /// `bps / 10_000`
    pub fn from_bps(bps: u64) -> Self {
        Self::new(bps, crate::constants::BPS_DENOMINATOR)
    }

    pub fn numerator(&self) -> &BigInt {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    /// Floor of the value
    pub fn quotient(&self) -> BigInt {
        self.numerator.div_floor(&self.denominator)
    }

    /// Value minus its floor
    pub fn remainder(&self) -> Fraction {
        Fraction::new(self.numerator.mod_floor(&self.denominator), self.denominator.clone())
    }

    /// Swap numerator and denominator. Panics when the value is zero.
    pub fn invert(&self) -> Fraction {
        Fraction::new(self.denominator.clone(), self.numerator.clone())
    }

    /// Same value with numerator and denominator divided by their gcd
    pub fn reduced(&self) -> Fraction {
        let gcd = self.numerator.gcd(&self.denominator);
        if gcd.is_zero() || gcd.is_one() {
            return self.clone();
        }
        Fraction::new(&self.numerator / &gcd, &self.denominator / &gcd)
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.numerator.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.numerator.is_negative()
    }

    pub fn abs(&self) -> Fraction {
        Fraction::new(self.numerator.abs(), self.denominator.clone())
    }

    pub fn min(self, other: Fraction) -> Fraction {
        if other < self { other } else { self }
    }

    pub fn max(self, other: Fraction) -> Fraction {
        if other > self { other } else { self }
    }

    /// True when the value is exactly `2^k` for some integer `k`,
    /// negative exponents included. Zero and negative values are never
    /// powers of two; one is `2^0`.
    pub fn is_power_of_two(&self) -> bool {
        self.power_of_two_exponent().is_some()
    }

    /// `k` such that the value equals `2^k`, if any
    pub fn power_of_two_exponent(&self) -> Option<i64> {
        if !self.is_positive() {
            return None;
        }
        let reduced = self.reduced();
        let numerator = reduced.numerator.magnitude();
        let denominator = reduced.denominator.magnitude();

        if denominator.is_one() {
            biguint_log2_exact(numerator).map(|k| k as i64)
        } else if numerator.is_one() {
            biguint_log2_exact(denominator).map(|k| -(k as i64))
        } else {
            None
        }
    }

    /// Decimal rendering rounded half away from zero to `decimals` places
    pub fn to_fixed(&self, decimals: u32) -> String {
        let scaled = &self.numerator.abs() * ten_pow(decimals);
        let (mut digits, rest) = scaled.div_rem(&self.denominator);
        if rest.clone() * 2u8 >= self.denominator {
            digits += 1u8;
        }

        let mut text = digits.to_string();
        if decimals > 0 {
            let width = decimals as usize + 1;
            if text.len() < width {
                text = format!("{}{}", "0".repeat(width - text.len()), text);
            }
            text.insert(text.len() - decimals as usize, '.');
        }

        if self.is_negative() && digits.sign() != Sign::NoSign {
            format!("-{}", text)
        } else {
            text
        }
    }

    /// Parse a decimal string such as `"1234.5678"`, `"-0.25"` or `"1e-7"`
    /// into the exact value it denotes.
    pub fn from_decimal_str(text: &str) -> LendgineResult<Fraction> {
        let text = text.trim();
        let decimal = BigDecimal::from_str(text)
            .map_err(|e| LendgineError::parse_error(&format!("'{}' is not a decimal number: {}", text, e)))?;

        let (digits, scale) = decimal.into_bigint_and_exponent();
        if scale.unsigned_abs() > MAX_DECIMAL_SCALE {
            return Err(LendgineError::parse_error(&format!("exponent of '{}' is out of range", text)));
        }
        // bounded by MAX_DECIMAL_SCALE
        let power = ten_pow(scale.unsigned_abs() as u32);
        if scale >= 0 {
            Ok(Fraction::new(digits, power))
        } else {
            Ok(Fraction::from_integer(digits * power))
        }
    }
}

/// Largest decimal exponent accepted when parsing
const MAX_DECIMAL_SCALE: u64 = 1_000;

fn biguint_log2_exact(value: &BigUint) -> Option<u64> {
    if value.is_zero() {
        return None;
    }
    let below = value - 1u8;
    if (value & &below).is_zero() {
        Some(value.bits() - 1)
    } else {
        None
    }
}

// ============================================================================
// Comparison
// ============================================================================

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive, so cross multiplication preserves order.
        (&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator))
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

impl<'a, 'b> Add<&'b Fraction> for &'a Fraction {
    type Output = Fraction;

    fn add(self, other: &'b Fraction) -> Fraction {
        if self.denominator == other.denominator {
            return Fraction::new(&self.numerator + &other.numerator, self.denominator.clone());
        }
        Fraction::new(
            &self.numerator * &other.denominator + &other.numerator * &self.denominator,
            &self.denominator * &other.denominator,
        )
    }
}

impl<'a, 'b> Sub<&'b Fraction> for &'a Fraction {
    type Output = Fraction;

    fn sub(self, other: &'b Fraction) -> Fraction {
        if self.denominator == other.denominator {
            return Fraction::new(&self.numerator - &other.numerator, self.denominator.clone());
        }
        Fraction::new(
            &self.numerator * &other.denominator - &other.numerator * &self.denominator,
            &self.denominator * &other.denominator,
        )
    }
}

impl<'a, 'b> Mul<&'b Fraction> for &'a Fraction {
    type Output = Fraction;

    fn mul(self, other: &'b Fraction) -> Fraction {
        Fraction::new(&self.numerator * &other.numerator, &self.denominator * &other.denominator)
    }
}

impl<'a, 'b> Div<&'b Fraction> for &'a Fraction {
    type Output = Fraction;

    /// Panics when dividing by zero.
    fn div(self, other: &'b Fraction) -> Fraction {
        Fraction::new(&self.numerator * &other.denominator, &self.denominator * &other.numerator)
    }
}

macro_rules! forward_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<Fraction> for Fraction {
            type Output = Fraction;
            fn $method(self, other: Fraction) -> Fraction {
                (&self).$method(&other)
            }
        }

        impl<'a> $imp<&'a Fraction> for Fraction {
            type Output = Fraction;
            fn $method(self, other: &'a Fraction) -> Fraction {
                (&self).$method(other)
            }
        }

        impl<'a> $imp<Fraction> for &'a Fraction {
            type Output = Fraction;
            fn $method(self, other: Fraction) -> Fraction {
                self.$method(&other)
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);
forward_binop!(Div, div);

impl Neg for Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction::new(-self.numerator, self.denominator)
    }
}

impl<'a> Neg for &'a Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction::new(-self.numerator.clone(), self.denominator.clone())
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<u64> for Fraction {
    fn from(value: u64) -> Self {
        Fraction::from_integer(value)
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Fraction::from_integer(value)
    }
}

impl From<u128> for Fraction {
    fn from(value: u128) -> Self {
        Fraction::from_integer(value)
    }
}

impl From<BigInt> for Fraction {
    fn from(value: BigInt) -> Self {
        Fraction::from_integer(value)
    }
}

impl From<BigUint> for Fraction {
    fn from(value: BigUint) -> Self {
        Fraction::from_integer(BigInt::from(value))
    }
}

impl fmt::Debug for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fraction({}/{})", self.numerator, self.denominator)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator.is_one() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl FromStr for Fraction {
    type Err = LendgineError;

    /// Accepts `"n/d"`, integers and plain decimals.
    fn from_str(text: &str) -> LendgineResult<Self> {
        match text.split_once('/') {
            Some((n, d)) => {
                let numerator = BigInt::from_str(n.trim())
                    .map_err(|e| LendgineError::parse_error(&format!("numerator '{}': {}", n, e)))?;
                let denominator = BigInt::from_str(d.trim())
                    .map_err(|e| LendgineError::parse_error(&format!("denominator '{}': {}", d, e)))?;
                if denominator.is_zero() {
                    return Err(LendgineError::invalid_parameter("denominator", "0", "non-zero"));
                }
                Ok(Fraction::new(numerator, denominator))
            }
            None => Fraction::from_decimal_str(text),
        }
    }
}

impl Serialize for Fraction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}/{}", self.numerator, self.denominator))
    }
}

impl<'de> Deserialize<'de> for Fraction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Fraction::from_str(&text).map_err(serde::de::Error::custom)
    }
}
