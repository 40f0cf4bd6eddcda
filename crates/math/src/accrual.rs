/// Client-side projection of interest accrual
///
/// Mirrors the contract's accrual step so that a snapshot read a few seconds
/// ago can be brought forward to "now" before pricing a transaction.

use lendgine_types::{Amount, Fraction, Lendgine, LendgineInfo, LendginePosition, ONE_YEAR_SECS};

use crate::jump_rate::JumpRateModel;
use crate::liquidity::liquidity_to_collateral;

/// Project `info` forward to `now`.
///
/// Borrowed liquidity is diluted by `borrow_rate · borrowed · elapsed / year`,
/// capped at everything borrowed. The collateral backing the diluted
/// liquidity becomes a reward for position holders. The input is returned
/// unchanged when no time has passed, nothing is borrowed, or no position
/// exists.
pub fn accrued_lendgine_info(
    lendgine: &Lendgine,
    info: &LendgineInfo,
    now: u64,
    model: &JumpRateModel,
) -> LendgineInfo {
    if now <= info.last_update
        || info.total_liquidity_borrowed.is_zero()
        || info.total_position_size.is_zero()
    {
        return info.clone();
    }

    let elapsed = Fraction::new(now - info.last_update, ONE_YEAR_SECS);
    let borrowed = &info.total_liquidity_borrowed;
    let requested = borrowed.multiply(&(model.borrow_rate(info) * elapsed));
    let dilution = if requested.greater_than(borrowed) {
        borrowed.clone()
    } else {
        requested
    };

    let reward = liquidity_to_collateral(lendgine, &dilution);
    let reward_per_position = reward.value() / info.total_position_size.value();

    LendgineInfo {
        total_liquidity_borrowed: borrowed - &dilution,
        reward_per_position_stored: &info.reward_per_position_stored + reward_per_position,
        last_update: now,
        ..info.clone()
    }
}

/// Bring a position's owed interest up to the snapshot's reward index
pub fn accrued_position(position: &LendginePosition, info: &LendgineInfo) -> LendginePosition {
    let delta = &info.reward_per_position_stored - &position.reward_per_position_paid;
    let owed = position.tokens_owed.value() + position.size.value() * delta;

    LendginePosition {
        size: position.size.clone(),
        reward_per_position_paid: info.reward_per_position_stored.clone(),
        tokens_owed: Amount::from_fraction(position.tokens_owed.token().clone(), owed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lendgine_types::{Address, Token};
    use num_bigint::BigInt;

    fn lendgine() -> Lendgine {
        Lendgine::new(
            Token::new(1, Address::new([1; 20]), 18, "A", "A"),
            Token::new(1, Address::new([2; 20]), 18, "B", "B"),
            18,
            18,
            Fraction::one(),
            Address::new([3; 20]),
        )
        .unwrap()
    }

    fn info(l: &Lendgine, borrowed: u64) -> LendgineInfo {
        let mut info = LendgineInfo::empty(l);
        info.total_position_size = Amount::from_raw(l.lendgine_token.clone(), 1_000u64);
        info.total_liquidity = Amount::from_raw(l.lendgine_token.clone(), 1_000u64 - borrowed);
        info.total_liquidity_borrowed = Amount::from_raw(l.lendgine_token.clone(), borrowed);
        info.total_supply = Amount::from_raw(l.lendgine_token.clone(), borrowed);
        info.last_update = 1_000;
        info
    }

    #[test]
    fn test_no_elapsed_time_is_identity() {
        let l = lendgine();
        let i = info(&l, 500);
        let model = JumpRateModel::default();
        assert_eq!(accrued_lendgine_info(&l, &i, i.last_update, &model), i);
        assert_eq!(accrued_lendgine_info(&l, &i, i.last_update - 1, &model), i);
    }

    #[test]
    fn test_nothing_borrowed_is_identity() {
        let l = lendgine();
        let i = info(&l, 0);
        let model = JumpRateModel::default();
        assert_eq!(accrued_lendgine_info(&l, &i, i.last_update + 86_400, &model), i);
    }

    #[test]
    fn test_one_year_at_half_utilization() {
        let l = lendgine();
        let i = info(&l, 500);
        let model = JumpRateModel::default();

        // rate 0.6875 over one year dilutes 343.75 of the 500 borrowed
        let accrued = accrued_lendgine_info(&l, &i, i.last_update + ONE_YEAR_SECS, &model);
        assert_eq!(accrued.total_liquidity_borrowed.value(), &Fraction::new(625, 4));
        assert_eq!(accrued.last_update, i.last_update + ONE_YEAR_SECS);
        // collateral 2·343.75 spread over 1000 position units
        assert_eq!(accrued.reward_per_position_stored, Fraction::new(6875, 10_000));
    }

    #[test]
    fn test_dilution_is_capped_at_borrowed() {
        let l = lendgine();
        let i = info(&l, 900);
        let model = JumpRateModel::default();
        let accrued = accrued_lendgine_info(&l, &i, i.last_update + 10 * ONE_YEAR_SECS, &model);
        assert!(accrued.total_liquidity_borrowed.is_zero());
        // all 900 liquidity converted to 1800 collateral
        assert_eq!(accrued.reward_per_position_stored, Fraction::new(9, 5));
    }

    #[test]
    fn test_accrued_position_collects_rewards() {
        let l = lendgine();
        let mut i = info(&l, 500);
        i.reward_per_position_stored = Fraction::new(3, 2);
        let position = LendginePosition {
            size: Amount::from_raw(l.lendgine_token.clone(), 10u64),
            reward_per_position_paid: Fraction::new(1, 2),
            tokens_owed: Amount::from_raw(l.token1.clone(), 4u64),
        };

        let accrued = accrued_position(&position, &i);
        assert_eq!(accrued.tokens_owed.quotient(), BigInt::from(14));
        assert_eq!(accrued.reward_per_position_paid, Fraction::new(3, 2));
    }
}
