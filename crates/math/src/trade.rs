/// Sizing of deposits, withdrawals and leveraged positions
///
/// Callers pass snapshots that were already brought forward with
/// [`crate::accrual::accrued_lendgine_info`].

use num_bigint::BigInt;

use lendgine_types::{
    Amount, Fraction, Lendgine, LendgineError, LendgineInfo, LendginePosition, LendgineResult,
};

use crate::liquidity::{
    liquidity_to_position_size, liquidity_to_shares, position_liquidity, shares_to_liquidity,
};
use crate::price::{marginal_price, reserves_per_liquidity};

// ============================================================================
// Result Types
// ============================================================================

/// Amounts released by removing part of a liquidity position
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawAmounts {
    pub size: Amount,
    pub liquidity: Amount,
    pub amount0: Amount,
    pub amount1: Amount,
}

/// Amounts required to add liquidity in the pool's current ratio
#[derive(Debug, Clone, PartialEq)]
pub struct DepositAmounts {
    pub amount0: Amount,
    pub amount1: Amount,
    pub liquidity: Amount,
    pub size: Amount,
}

/// Sizing of a leveraged position opened with token1 collateral
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAmounts {
    /// Liquidity borrowed from providers
    pub liquidity: Amount,
    /// Token1 raised by selling the borrowed liquidity's reserves
    pub amount_borrowed: Amount,
    pub shares: Amount,
}

/// Sizing of a partial close that returns `amount_out` of token1
#[derive(Debug, Clone, PartialEq)]
pub struct CloseAmounts {
    pub shares: Amount,
    pub liquidity: Amount,
    pub amount0: Amount,
    pub amount1: Amount,
}

// ============================================================================
// Liquidity Provision
// ============================================================================

/// Token amounts released by withdrawing `percent` (0 to 100) of a position.
///
/// Zero percent yields zero amounts. An empty pool yields zero amounts for
/// any percent.
pub fn withdraw_amounts(
    lendgine: &Lendgine,
    position: &LendginePosition,
    info: &LendgineInfo,
    percent: &Fraction,
) -> LendgineResult<WithdrawAmounts> {
    if percent.is_negative() || percent > &Fraction::from_integer(100) {
        return Err(LendgineError::invalid_parameter(
            "percent",
            &percent.to_string(),
            "between 0 and 100",
        ));
    }

    let size = position.size.multiply(&(percent / Fraction::from_integer(100)));
    let liquidity = position_liquidity(info, &size);

    let total = info.total_liquidity.value();
    let (amount0, amount1) = if total.is_zero() {
        (
            Amount::zero(lendgine.token0.clone()),
            Amount::zero(lendgine.token1.clone()),
        )
    } else {
        let share = liquidity.value() / total;
        (info.reserve0.multiply(&share), info.reserve1.multiply(&share))
    };

    Ok(WithdrawAmounts {
        size,
        liquidity,
        amount0,
        amount1,
    })
}

/// Amounts for depositing `input` (either side of the pair) in the pool's
/// current ratio. Absent for a pool with no liquidity or an empty reserve
/// on the input side.
///
/// # Panics
///
/// When `input` is in neither token of the lendgine.
pub fn deposit_amounts(lendgine: &Lendgine, info: &LendgineInfo, input: &Amount) -> Option<DepositAmounts> {
    let input_reserve = if input.token().equals(&lendgine.token0) {
        &info.reserve0
    } else {
        assert!(
            input.token().equals(&lendgine.token1),
            "{} is not part of lendgine {}",
            input.token(),
            lendgine
        );
        &info.reserve1
    };

    if info.total_liquidity.is_zero() || input_reserve.is_zero() {
        return None;
    }

    let liquidity = info.total_liquidity.multiply(&input.ratio(input_reserve));
    let share = liquidity.value() / info.total_liquidity.value();
    let size = liquidity_to_position_size(info, &liquidity);

    Some(DepositAmounts {
        amount0: info.reserve0.multiply(&share),
        amount1: info.reserve1.multiply(&share),
        liquidity,
        size,
    })
}

// ============================================================================
// Leveraged Positions
// ============================================================================

/// Token1 value locked per unit of borrowed liquidity: collateral minus the
/// liquidity's own reserves valued in token1.
fn equity_per_liquidity(lendgine: &Lendgine, info: &LendgineInfo) -> Option<Fraction> {
    let (per0, per1) = reserves_per_liquidity(lendgine, info)?;
    let price = marginal_price(lendgine, info);
    if !price.is_positive() {
        return None;
    }
    let debt = per1 + per0 / price;
    Some(Fraction::from_integer(2) * &lendgine.bound - debt)
}

/// Liquidity, borrowed token1 and shares for opening a position with
/// `amount_in` of token1 collateral. Absent for an empty pool.
pub fn open_amounts(lendgine: &Lendgine, info: &LendgineInfo, amount_in: &Amount) -> Option<OpenAmounts> {
    let equity = equity_per_liquidity(lendgine, info)?;
    if !equity.is_positive() {
        return None;
    }

    let whole_liquidity = amount_in.to_exact() / &equity;
    let collateral = &whole_liquidity * Fraction::from_integer(2) * &lendgine.bound;
    let liquidity = Amount::from_whole(lendgine.lendgine_token.clone(), &whole_liquidity);
    let amount_borrowed = Amount::from_whole(lendgine.token1.clone(), &(collateral - amount_in.to_exact()));
    let shares = liquidity_to_shares(info, &liquidity);

    Some(OpenAmounts {
        liquidity,
        amount_borrowed,
        shares,
    })
}

/// Token1 a holder of `shares` would receive by closing them entirely
pub fn share_value(lendgine: &Lendgine, info: &LendgineInfo, shares: &Amount) -> Option<Amount> {
    let equity = equity_per_liquidity(lendgine, info)?;
    let liquidity = shares_to_liquidity(info, shares);
    Some(Amount::from_whole(
        lendgine.token1.clone(),
        &(liquidity.to_exact() * equity),
    ))
}

/// Shares to burn, and the liquidity and reserves repaid, for withdrawing
/// `amount_out` of token1 from a `balance` of shares
pub fn close_amounts(
    lendgine: &Lendgine,
    info: &LendgineInfo,
    balance: &Amount,
    amount_out: &Amount,
) -> Option<CloseAmounts> {
    let value = share_value(lendgine, info, balance)?;
    if value.is_zero() {
        return None;
    }

    let shares = balance.multiply(&amount_out.ratio(&value));
    let liquidity = shares_to_liquidity(info, &shares);
    let share = liquidity.value() / info.total_liquidity.value();

    Some(CloseAmounts {
        amount0: info.reserve0.multiply(&share),
        amount1: info.reserve1.multiply(&share),
        shares,
        liquidity,
    })
}

// ============================================================================
// Slippage
// ============================================================================

/// Smallest acceptable raw amount after `max_slippage` (fraction of one)
pub fn slippage_minimum(amount: &Amount, max_slippage: &Fraction) -> BigInt {
    amount.multiply(&(Fraction::one() - max_slippage)).quotient()
}
