/// Market-wide totals across several lendgines, in a chosen base token

use lendgine_types::{Amount, Fraction, Lendgine, LendgineInfo, LendginePosition, Token};

use crate::jump_rate::JumpRateModel;
use crate::liquidity::liquidity_per_position;
use crate::price::{marginal_price, price_per_liquidity};

/// Express a whole-unit token0 value of `lendgine` in `base`.
///
/// When base is token1 the value goes through the exact inverse of the
/// marginal price; absent if that price is zero.
///
/// # Panics
///
/// When `base` is neither token of the lendgine.
fn token0_value_in_base(lendgine: &Lendgine, price: &Fraction, value: Fraction, base: &Token) -> Option<Amount> {
    if lendgine.token0.equals(base) {
        return Some(Amount::from_whole(base.clone(), &value));
    }
    assert!(
        lendgine.token1.equals(base),
        "base {} is not part of lendgine {}",
        base,
        lendgine
    );
    if price.is_zero() {
        return None;
    }
    Some(Amount::from_whole(base.clone(), &(value * price.invert())))
}

/// Token0 value of `liquidity` whole units, priced at its collateral
fn collateral_value(lendgine: &Lendgine, price: &Fraction, liquidity: &Fraction) -> Fraction {
    liquidity * Fraction::from_integer(2) * &lendgine.bound * price
}

fn sum_in_base<'a, F>(
    lendgines: &'a [Lendgine],
    infos: &'a [LendgineInfo],
    base: &Token,
    mut value0: F,
) -> Option<Amount>
where
    F: FnMut(&'a Lendgine, &'a LendgineInfo, &Fraction) -> Fraction,
{
    assert_eq!(lendgines.len(), infos.len(), "one snapshot per lendgine");
    lendgines
        .iter()
        .zip(infos)
        .try_fold(Amount::zero(base.clone()), |acc, (lendgine, info)| {
            let price = marginal_price(lendgine, info);
            let value = value0(lendgine, info, &price);
            let converted = token0_value_in_base(lendgine, &price, value, base)?;
            Some(&acc + &converted)
        })
}

/// Value of all borrowed liquidity
pub fn open_interest(lendgines: &[Lendgine], infos: &[LendgineInfo], base: &Token) -> Option<Amount> {
    sum_in_base(lendgines, infos, base, |lendgine, info, price| {
        collateral_value(lendgine, price, &info.total_liquidity_borrowed.to_exact())
    })
}

/// Value of all liquidity, borrowed or not, plus the collateral posted
/// against the borrowed part
pub fn total_value_locked(lendgines: &[Lendgine], infos: &[LendgineInfo], base: &Token) -> Option<Amount> {
    sum_in_base(lendgines, infos, base, |lendgine, info, price| {
        let borrowed = info.total_liquidity_borrowed.to_exact();
        let liquidity = info.total_liquidity.to_exact() + &borrowed;
        let collateral = &borrowed * Fraction::from_integer(2) * &lendgine.bound;
        collateral_value(lendgine, price, &liquidity) + collateral * price
    })
}

/// Value of provided liquidity at its reserve value, as shown to providers
pub fn liquidity_value_locked(lendgines: &[Lendgine], infos: &[LendgineInfo], base: &Token) -> Option<Amount> {
    sum_in_base(lendgines, infos, base, |lendgine, info, _| {
        let liquidity = info.total_liquidity.to_exact() + info.total_liquidity_borrowed.to_exact();
        liquidity * price_per_liquidity(lendgine, info)
    })
}

/// Value of an owner's liquidity positions, one per lendgine
pub fn position_value(
    lendgines: &[Lendgine],
    infos: &[LendgineInfo],
    positions: &[LendginePosition],
    base: &Token,
) -> Option<Amount> {
    assert_eq!(lendgines.len(), positions.len(), "one position per lendgine");
    let mut positions = positions.iter();
    sum_in_base(lendgines, infos, base, |lendgine, info, _| {
        let size = positions
            .next()
            .map(|p| p.size.to_exact())
            .unwrap_or_else(Fraction::zero);
        size * liquidity_per_position(info) * price_per_liquidity(lendgine, info)
    })
}

/// Highest provider rate among the snapshots; zero when there are none
pub fn best_supply_rate(infos: &[LendgineInfo], model: &JumpRateModel) -> Fraction {
    infos
        .iter()
        .map(|info| model.supply_rate(info))
        .max()
        .unwrap_or_else(Fraction::zero)
}
