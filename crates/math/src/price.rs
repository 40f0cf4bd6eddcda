/// Prices derived from lendgine reserves

use lendgine_types::{Fraction, Lendgine, LendgineInfo};

// ============================================================================
// Reserve Prices
// ============================================================================

/// Exchange rate implied by the reserves, `reserve1 / reserve0` with each
/// reserve lifted to 18-decimal fixed point by its token scale.
///
/// Absent when reserve0 is zero.
pub fn price(lendgine: &Lendgine, info: &LendgineInfo) -> Option<Fraction> {
    let scaled0 = info.reserve0.value() * Fraction::from_integer(lendgine.token0_scale());
    if scaled0.is_zero() {
        return None;
    }
    let scaled1 = info.reserve1.value() * Fraction::from_integer(lendgine.token1_scale());
    Some(scaled1 / scaled0)
}

/// Reserves held by one unit of liquidity, as `(token0, token1)` in whole
/// units. Absent for a pool with no liquidity.
pub fn reserves_per_liquidity(lendgine: &Lendgine, info: &LendgineInfo) -> Option<(Fraction, Fraction)> {
    let total = info.total_liquidity.value();
    if total.is_zero() {
        return None;
    }
    let per0 = info.reserve0.value() * Fraction::from_integer(lendgine.token0_scale()) / total;
    let per1 = info.reserve1.value() * Fraction::from_integer(lendgine.token1_scale()) / total;
    Some((per0, per1))
}

// ============================================================================
// Invariant Prices
// ============================================================================

/// Marginal price of the capped-power invariant, token0 per token1:
/// `bound - reserve1_per_liquidity / 2`. An empty pool sits at the bound.
pub fn marginal_price(lendgine: &Lendgine, info: &LendgineInfo) -> Fraction {
    match reserves_per_liquidity(lendgine, info) {
        Some((_, per1)) => &lendgine.bound - per1 / Fraction::from_integer(2),
        None => lendgine.bound.clone(),
    }
}

/// Token0 value of one unit of liquidity at price `p`: `2·bound·p − p²`
pub fn price_per_liquidity_at(lendgine: &Lendgine, price: &Fraction) -> Fraction {
    Fraction::from_integer(2) * &lendgine.bound * price - price * price
}

/// Token0 value of one unit of liquidity at the pool's marginal price
pub fn price_per_liquidity(lendgine: &Lendgine, info: &LendgineInfo) -> Fraction {
    price_per_liquidity_at(lendgine, &marginal_price(lendgine, info))
}
