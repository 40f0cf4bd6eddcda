use lendgine_math::{withdraw_amounts, WithdrawAmounts};
use lendgine_types::{Address, Fraction, Lendgine, LendgineInfo};
use num_bigint::BigUint;

use crate::beet::{TransactionStage, TransactionTask};
use crate::contracts::{ContractCall, MarketKey, RemoveLiquidityParams};
use crate::errors::SdkResult;

use super::{disabled, raw_word, BuildContext, DisableReason};

pub fn withdraw_title(lendgine: &Lendgine) -> String {
    format!("Remove {} / {} liquidity", lendgine.token0.symbol, lendgine.token1.symbol)
}

/// Reason a withdrawal of `percent` sized as `amounts` cannot be sent
pub fn withdraw_disable_reason(percent: &Fraction, amounts: &WithdrawAmounts, info: &LendgineInfo) -> Option<DisableReason> {
    if percent.is_zero() {
        Some(DisableReason::SlideToAmount)
    } else if amounts.size.is_zero() {
        Some(DisableReason::InsufficientBalance)
    } else if amounts.liquidity.greater_than(&info.total_liquidity) {
        Some(DisableReason::InsufficientLiquidity)
    } else {
        None
    }
}

/// `removeLiquidity` of `percent` of the account's position. When either
/// side is the wrapped native token the manager keeps the tokens and a
/// multicall unwraps and sweeps them to the account.
pub async fn build_withdraw(
    ctx: &BuildContext<'_>,
    lendgine: &Lendgine,
    percent: &Fraction,
) -> SdkResult<Vec<TransactionStage>> {
    if percent.is_zero() {
        return disabled(DisableReason::SlideToAmount);
    }

    let owner = ctx.owner();
    let (position, info) = futures::try_join!(
        ctx.client.position(&owner, lendgine),
        ctx.client.accrued_info(lendgine),
    )?;

    let amounts = withdraw_amounts(lendgine, &position, &info, percent)?;
    if let Some(reason) = withdraw_disable_reason(percent, &amounts, &info) {
        return disabled(reason);
    }

    let native0 = ctx.config().is_wrapped_native(&lendgine.token0);
    let native1 = ctx.config().is_wrapped_native(&lendgine.token1);
    let native = native0 || native1;

    let remove = ContractCall::RemoveLiquidity(RemoveLiquidityParams {
        market: MarketKey::from_lendgine(lendgine),
        size: raw_word(&amounts.size)?,
        amount0_min: ctx.minimum(&amounts.amount0)?,
        amount1_min: ctx.minimum(&amounts.amount1)?,
        recipient: if native { Address::ZERO } else { owner },
        deadline: ctx.deadline(),
    });

    // zero minimums are safe: the removal itself enforces the bounds
    let call = if native {
        let other = if native0 { &lendgine.token1 } else { &lendgine.token0 };
        ContractCall::Multicall(vec![
            remove,
            ContractCall::UnwrapWeth {
                amount_min: BigUint::default(),
                recipient: owner,
            },
            ContractCall::SweepToken {
                token: other.address,
                amount_min: BigUint::default(),
                recipient: owner,
            },
        ])
    } else {
        remove
    };

    let title = withdraw_title(lendgine);
    let manager = ctx.config().liquidity_manager;
    let task = TransactionTask::new(title.clone(), title.clone(), ctx.envelope(manager, call)).invalidating([
        ctx.position_key(lendgine),
        ctx.balance_key(&lendgine.token0.address),
        ctx.balance_key(&lendgine.token1.address),
        ctx.info_key(lendgine),
    ]);

    Ok(vec![TransactionStage::new(title, vec![task])])
}
