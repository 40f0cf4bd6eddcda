use lendgine_math::{open_amounts, OpenAmounts};
use lendgine_types::{Amount, Lendgine, LendgineInfo};

use crate::beet::{TransactionStage, TransactionTask};
use crate::contracts::{ContractCall, MarketKey, MintParams, SwapRoute};
use crate::errors::SdkResult;

use super::{approval_stage, disabled, raw_word, BuildContext, DisableReason};

pub fn open_title(lendgine: &Lendgine) -> String {
    format!("Buy {}+", lendgine.token1.symbol)
}

pub fn open_disable_reason(
    amount_in: &Amount,
    amounts: Option<&OpenAmounts>,
    info: &LendgineInfo,
    balance: &Amount,
) -> Option<DisableReason> {
    if amount_in.is_zero() {
        return Some(DisableReason::EnterAmount);
    }
    match amounts {
        None => Some(DisableReason::InsufficientLiquidity),
        Some(amounts) if amounts.liquidity.greater_than(&info.total_liquidity) => {
            Some(DisableReason::InsufficientLiquidity)
        }
        Some(_) if amount_in.greater_than(balance) => Some(DisableReason::InsufficientBalance),
        Some(_) => None,
    }
}

/// Approval of the token1 collateral, then router `mint` borrowing the
/// liquidity sized by [`open_amounts`]
pub async fn build_open(
    ctx: &BuildContext<'_>,
    lendgine: &Lendgine,
    amount_in: &Amount,
    route: SwapRoute,
) -> SdkResult<Vec<TransactionStage>> {
    if amount_in.is_zero() {
        return disabled(DisableReason::EnterAmount);
    }

    let owner = ctx.owner();
    let (info, balance) = futures::try_join!(
        ctx.client.accrued_info(lendgine),
        ctx.client.balance(&lendgine.token1, &owner),
    )?;

    let amounts = open_amounts(lendgine, &info, amount_in);
    if let Some(reason) = open_disable_reason(amount_in, amounts.as_ref(), &info, &balance) {
        return disabled(reason);
    }
    let amounts = match amounts {
        Some(amounts) => amounts,
        None => return disabled(DisableReason::InsufficientLiquidity),
    };

    let router = ctx.config().lendgine_router;
    let approvals = approval_stage(ctx, &[amount_in], &router).await?;

    let call = ContractCall::Mint(MintParams {
        market: MarketKey::from_lendgine(lendgine),
        amount_in: raw_word(amount_in)?,
        amount_borrow: ctx.minimum(&amounts.amount_borrowed)?,
        shares_min: ctx.minimum(&amounts.shares)?,
        route,
        recipient: owner,
        deadline: ctx.deadline(),
    });

    let title = open_title(lendgine);
    let task = TransactionTask::new(title.clone(), title.clone(), ctx.envelope(router, call)).invalidating([
        ctx.balance_key(&lendgine.token1.address),
        ctx.balance_key(&lendgine.lendgine_token.address),
        ctx.allowance_key(&lendgine.token1.address, &router),
        ctx.info_key(lendgine),
    ]);

    Ok(vec![approvals, TransactionStage::new(title, vec![task])])
}
