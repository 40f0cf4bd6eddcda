/// Tagged container for cached chain reads

use crate::amount::Amount;
use crate::fraction::Fraction;
use crate::lendgine::{Lendgine, LendgineInfo, LendginePosition};

/// Every cached read is stored as one of these variants
#[derive(Debug, Clone, PartialEq)]
pub enum ChainValue {
    Amount(Amount),
    Fraction(Fraction),
    Lendgine(Lendgine),
    LendgineInfo(LendgineInfo),
    LendginePosition(LendginePosition),
}

impl ChainValue {
    /// Variant name, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            ChainValue::Amount(_) => "amount",
            ChainValue::Fraction(_) => "fraction",
            ChainValue::Lendgine(_) => "lendgine",
            ChainValue::LendgineInfo(_) => "lendgine_info",
            ChainValue::LendginePosition(_) => "lendgine_position",
        }
    }

    pub fn as_amount(&self) -> Option<&Amount> {
        match self {
            ChainValue::Amount(amount) => Some(amount),
            _ => None,
        }
    }

    pub fn as_fraction(&self) -> Option<&Fraction> {
        match self {
            ChainValue::Fraction(fraction) => Some(fraction),
            _ => None,
        }
    }

    pub fn as_lendgine(&self) -> Option<&Lendgine> {
        match self {
            ChainValue::Lendgine(lendgine) => Some(lendgine),
            _ => None,
        }
    }

    pub fn as_lendgine_info(&self) -> Option<&LendgineInfo> {
        match self {
            ChainValue::LendgineInfo(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_lendgine_position(&self) -> Option<&LendginePosition> {
        match self {
            ChainValue::LendginePosition(position) => Some(position),
            _ => None,
        }
    }
}

impl From<Amount> for ChainValue {
    fn from(value: Amount) -> Self {
        ChainValue::Amount(value)
    }
}

impl From<Fraction> for ChainValue {
    fn from(value: Fraction) -> Self {
        ChainValue::Fraction(value)
    }
}

impl From<Lendgine> for ChainValue {
    fn from(value: Lendgine) -> Self {
        ChainValue::Lendgine(value)
    }
}

impl From<LendgineInfo> for ChainValue {
    fn from(value: LendgineInfo) -> Self {
        ChainValue::LendgineInfo(value)
    }
}

impl From<LendginePosition> for ChainValue {
    fn from(value: LendginePosition) -> Self {
        ChainValue::LendginePosition(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_variant() {
        let value: ChainValue = Fraction::new(1, 3).into();
        assert_eq!(value.kind(), "fraction");
        assert_eq!(value.as_fraction(), Some(&Fraction::new(2, 6)));
        assert!(value.as_amount().is_none());
        assert!(value.as_lendgine_info().is_none());
    }
}
