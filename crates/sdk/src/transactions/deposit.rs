use lendgine_math::{deposit_amounts, DepositAmounts};
use lendgine_types::{Amount, Lendgine};

use crate::beet::{TransactionStage, TransactionTask};
use crate::contracts::{AddLiquidityParams, ContractCall, MarketKey};
use crate::errors::SdkResult;

use super::{approval_stage, disabled, raw_word, BuildContext, DisableReason};

pub const DEPOSIT_TITLE: &str = "Add liquidity to pool";

/// Reason a deposit sized as `amounts` cannot be sent from these balances
pub fn deposit_disable_reason(
    amounts: Option<&DepositAmounts>,
    balance0: &Amount,
    balance1: &Amount,
) -> Option<DisableReason> {
    let amounts = match amounts {
        Some(amounts) => amounts,
        None => return Some(DisableReason::InsufficientLiquidity),
    };
    if amounts.amount0.is_zero() && amounts.amount1.is_zero() {
        Some(DisableReason::EnterAmount)
    } else if amounts.amount0.greater_than(balance0) || amounts.amount1.greater_than(balance1) {
        Some(DisableReason::InsufficientBalance)
    } else {
        None
    }
}

/// Approvals for both tokens, then `addLiquidity` on the liquidity manager.
/// `input` is the amount of either token; the other side follows the
/// pool's ratio.
pub async fn build_deposit(
    ctx: &BuildContext<'_>,
    lendgine: &Lendgine,
    input: &Amount,
) -> SdkResult<Vec<TransactionStage>> {
    if input.is_zero() {
        return disabled(DisableReason::EnterAmount);
    }

    let owner = ctx.owner();
    let (info, balance0, balance1) = futures::try_join!(
        ctx.client.accrued_info(lendgine),
        ctx.client.balance(&lendgine.token0, &owner),
        ctx.client.balance(&lendgine.token1, &owner),
    )?;

    let amounts = deposit_amounts(lendgine, &info, input);
    if let Some(reason) = deposit_disable_reason(amounts.as_ref(), &balance0, &balance1) {
        return disabled(reason);
    }
    let amounts = match amounts {
        Some(amounts) => amounts,
        None => return disabled(DisableReason::InsufficientLiquidity),
    };

    let manager = ctx.config().liquidity_manager;
    let approvals = approval_stage(ctx, &[&amounts.amount0, &amounts.amount1], &manager).await?;

    let call = ContractCall::AddLiquidity(AddLiquidityParams {
        market: MarketKey::from_lendgine(lendgine),
        liquidity: raw_word(&amounts.liquidity)?,
        amount0_min: ctx.minimum(&amounts.amount0)?,
        amount1_min: ctx.minimum(&amounts.amount1)?,
        size_min: ctx.minimum(&amounts.size)?,
        recipient: owner,
        deadline: ctx.deadline(),
    });

    let task = TransactionTask::new(DEPOSIT_TITLE, DEPOSIT_TITLE, ctx.envelope(manager, call)).invalidating([
        ctx.balance_key(&lendgine.token0.address),
        ctx.balance_key(&lendgine.token1.address),
        ctx.allowance_key(&lendgine.token0.address, &manager),
        ctx.allowance_key(&lendgine.token1.address, &manager),
        ctx.position_key(lendgine),
        ctx.info_key(lendgine),
    ]);

    Ok(vec![approvals, TransactionStage::new(DEPOSIT_TITLE, vec![task])])
}
