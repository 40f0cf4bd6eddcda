use lendgine_types::{Address, Amount};
use tracing::debug;

use crate::beet::{TransactionStage, TransactionTask};
use crate::contracts::ContractCall;
use crate::errors::SdkResult;

use super::{raw_word, BuildContext};

pub const APPROVE_STAGE_TITLE: &str = "Approve tokens";

/// Whether `allowance` does not yet cover `amount`
pub fn needs_approval(allowance: &Amount, amount: &Amount) -> bool {
    !amount.is_zero() && allowance.less_than(amount)
}

/// One stage approving `spender` for every amount the current allowance
/// does not cover. The stage is empty when nothing needs approval.
pub async fn approval_stage(
    ctx: &BuildContext<'_>,
    amounts: &[&Amount],
    spender: &Address,
) -> SdkResult<TransactionStage> {
    let owner = ctx.owner();
    let mut tasks = Vec::new();

    for amount in amounts {
        let token = amount.token();
        let allowance = ctx.client.allowance(token, &owner, spender).await?;
        if !needs_approval(&allowance, amount) {
            debug!(token = %token.symbol, "Allowance already sufficient");
            continue;
        }

        let title = format!("Approve {}", token.symbol);
        let call = ContractCall::Approve {
            spender: *spender,
            amount: raw_word(amount)?,
        };
        tasks.push(
            TransactionTask::new(title.clone(), title, ctx.envelope(token.address, call))
                .invalidating([ctx.allowance_key(&token.address, spender)]),
        );
    }

    Ok(TransactionStage::new(APPROVE_STAGE_TITLE, tasks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lendgine_types::Token;

    #[test]
    fn test_needs_approval() {
        let token = Token::new(1, Address::new([1; 20]), 18, "A", "A");
        let amount = Amount::from_raw(token.clone(), 100u64);

        assert!(needs_approval(&Amount::from_raw(token.clone(), 99u64), &amount));
        assert!(!needs_approval(&Amount::from_raw(token.clone(), 100u64), &amount));
        assert!(!needs_approval(&Amount::zero(token.clone()), &Amount::zero(token)));
    }
}
