use lendgine_math::{close_amounts, CloseAmounts};
use lendgine_types::{Address, Amount, Lendgine};

use crate::beet::{TransactionStage, TransactionTask};
use crate::contracts::{BurnParams, ContractCall, MarketKey, SwapRoute};
use crate::errors::SdkResult;

use super::{approval_stage, disabled, raw_word, BuildContext, DisableReason};

pub fn close_title(lendgine: &Lendgine) -> String {
    format!("Sell {}+", lendgine.token1.symbol)
}

pub fn close_disable_reason(amount_out: &Amount, amounts: Option<&CloseAmounts>, balance: &Amount) -> Option<DisableReason> {
    if amount_out.is_zero() {
        return Some(DisableReason::EnterAmount);
    }
    match amounts {
        Some(amounts) if !amounts.shares.greater_than(balance) => None,
        _ => Some(DisableReason::InsufficientBalance),
    }
}

/// Approval of the shares to the router, then `burn`. A wrapped native
/// output is unwrapped to the account in the same multicall.
pub async fn build_close(
    ctx: &BuildContext<'_>,
    lendgine: &Lendgine,
    amount_out: &Amount,
    route: SwapRoute,
) -> SdkResult<Vec<TransactionStage>> {
    if amount_out.is_zero() {
        return disabled(DisableReason::EnterAmount);
    }

    let owner = ctx.owner();
    let (info, balance) = futures::try_join!(
        ctx.client.accrued_info(lendgine),
        ctx.client.balance(&lendgine.lendgine_token, &owner),
    )?;

    let amounts = close_amounts(lendgine, &info, &balance, amount_out);
    if let Some(reason) = close_disable_reason(amount_out, amounts.as_ref(), &balance) {
        return disabled(reason);
    }
    let amounts = match amounts {
        Some(amounts) => amounts,
        None => return disabled(DisableReason::InsufficientBalance),
    };

    let router = ctx.config().lendgine_router;
    let approvals = approval_stage(ctx, &[&amounts.shares], &router).await?;

    let native = ctx.config().is_wrapped_native(amount_out.token());
    let collateral_min = ctx.minimum(amount_out)?;

    let burn = ContractCall::Burn(BurnParams {
        market: MarketKey::from_lendgine(lendgine),
        shares: raw_word(&amounts.shares)?,
        collateral_min: collateral_min.clone(),
        amount0_min: ctx.minimum(&amounts.amount0)?,
        amount1_min: ctx.minimum(&amounts.amount1)?,
        route,
        recipient: if native { Address::ZERO } else { owner },
        deadline: ctx.deadline(),
    });

    let call = if native {
        ContractCall::Multicall(vec![
            burn,
            ContractCall::UnwrapWeth {
                amount_min: collateral_min,
                recipient: owner,
            },
        ])
    } else {
        burn
    };

    let title = close_title(lendgine);
    let task = TransactionTask::new(title.clone(), title.clone(), ctx.envelope(router, call)).invalidating([
        ctx.balance_key(&lendgine.lendgine_token.address),
        ctx.balance_key(&lendgine.token1.address),
        ctx.allowance_key(&lendgine.lendgine_token.address, &router),
        ctx.info_key(lendgine),
    ]);

    Ok(vec![approvals, TransactionStage::new(title, vec![task])])
}
