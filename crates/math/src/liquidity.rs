/// Conversions between liquidity, positions, shares and collateral

use lendgine_types::{Amount, Fraction, Lendgine, LendgineInfo};

// ============================================================================
// Position and Share Ratios
// ============================================================================

/// Liquidity redeemable per unit of position size.
///
/// Borrowed liquidity still belongs to providers, so it counts toward the
/// numerator. One when no positions exist.
pub fn liquidity_per_position(info: &LendgineInfo) -> Fraction {
    let size = info.total_position_size.value();
    if size.is_zero() {
        return Fraction::one();
    }
    (info.total_liquidity.value() + info.total_liquidity_borrowed.value()) / size
}

/// Borrowed liquidity backing each share. One when no shares exist.
pub fn liquidity_per_share(info: &LendgineInfo) -> Fraction {
    let supply = info.total_supply.value();
    if supply.is_zero() {
        return Fraction::one();
    }
    info.total_liquidity_borrowed.value() / supply
}

/// Liquidity held by a position of `size`
pub fn position_liquidity(info: &LendgineInfo, size: &Amount) -> Amount {
    size.multiply(&liquidity_per_position(info))
}

/// Position size minted for depositing `liquidity`
pub fn liquidity_to_position_size(info: &LendgineInfo, liquidity: &Amount) -> Amount {
    liquidity.divide(&liquidity_per_position(info))
}

/// Shares minted for borrowing `liquidity`. The first borrower receives
/// shares one-for-one.
pub fn liquidity_to_shares(info: &LendgineInfo, liquidity: &Amount) -> Amount {
    let borrowed = info.total_liquidity_borrowed.value();
    if borrowed.is_zero() {
        return liquidity.clone();
    }
    liquidity.multiply(&(info.total_supply.value() / borrowed))
}

/// Liquidity owed back when burning `shares`
pub fn shares_to_liquidity(info: &LendgineInfo, shares: &Amount) -> Amount {
    shares.multiply(&liquidity_per_share(info))
}

// ============================================================================
// Collateral
// ============================================================================

/// Whole units of liquidity backed by one whole unit of token1: `1 / (2·bound)`
pub fn liquidity_per_collateral(lendgine: &Lendgine) -> Fraction {
    (Fraction::from_integer(2) * &lendgine.bound).invert()
}

/// Token1 collateral required to borrow `liquidity`
pub fn liquidity_to_collateral(lendgine: &Lendgine, liquidity: &Amount) -> Amount {
    let raw = liquidity.value() * Fraction::from_integer(2) * &lendgine.bound
        / Fraction::from_integer(lendgine.token1_scale());
    Amount::from_fraction(lendgine.token1.clone(), raw)
}

/// Liquidity that `collateral` of token1 can back
pub fn collateral_to_liquidity(lendgine: &Lendgine, collateral: &Amount) -> Amount {
    let raw = collateral.value() * Fraction::from_integer(lendgine.token1_scale())
        / (Fraction::from_integer(2) * &lendgine.bound);
    Amount::from_fraction(lendgine.lendgine_token.clone(), raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lendgine_types::{Address, LendgineWords, Token};
    use num_bigint::BigInt;

    fn lendgine() -> Lendgine {
        Lendgine::new(
            Token::new(1, Address::new([1; 20]), 18, "A", "A"),
            Token::new(1, Address::new([2; 20]), 6, "B", "B"),
            18,
            6,
            Fraction::from_integer(8),
            Address::new([3; 20]),
        )
        .unwrap()
    }

    fn share_amount(l: &Lendgine, raw: u64) -> Amount {
        Amount::from_raw(l.lendgine_token.clone(), raw)
    }

    fn info(l: &Lendgine) -> LendgineInfo {
        let mut info = LendgineInfo::from_words(l, &LendgineWords::default()).unwrap();
        info.total_position_size = share_amount(l, 50);
        info.total_liquidity = share_amount(l, 80);
        info.total_liquidity_borrowed = share_amount(l, 20);
        info.total_supply = share_amount(l, 40);
        info
    }

    #[test]
    fn test_ratios_default_to_one() {
        let l = lendgine();
        let empty = LendgineInfo::empty(&l);
        assert_eq!(liquidity_per_position(&empty), Fraction::one());
        assert_eq!(liquidity_per_share(&empty), Fraction::one());
        assert_eq!(liquidity_to_shares(&empty, &share_amount(&l, 7)), share_amount(&l, 7));
    }

    #[test]
    fn test_ratios_are_exact() {
        let l = lendgine();
        let i = info(&l);
        assert_eq!(liquidity_per_position(&i), Fraction::from_integer(2));
        assert_eq!(liquidity_per_share(&i), Fraction::new(1, 2));

        let liquidity = position_liquidity(&i, &share_amount(&l, 3));
        assert_eq!(liquidity, share_amount(&l, 6));
        assert_eq!(liquidity_to_position_size(&i, &liquidity), share_amount(&l, 3));

        let shares = liquidity_to_shares(&i, &share_amount(&l, 5));
        assert_eq!(shares, share_amount(&l, 10));
        assert_eq!(shares_to_liquidity(&i, &shares), share_amount(&l, 5));
    }

    #[test]
    fn test_collateral_conversion() {
        let l = lendgine();
        assert_eq!(liquidity_per_collateral(&l), Fraction::new(1, 16));

        // 1 whole liquidity at bound 8 needs 16 whole token1 (6 decimals)
        let one = Amount::from_raw(l.lendgine_token.clone(), 1_000_000_000_000_000_000u64);
        let collateral = liquidity_to_collateral(&l, &one);
        assert_eq!(collateral.quotient(), BigInt::from(16_000_000u64));
        assert_eq!(collateral_to_liquidity(&l, &collateral), one);
    }
}
