/// Property-based tests for the accounting functions.
/// Checks price homogeneity, accrual monotonicity and bound selection.

use lendgine_math::*;
use lendgine_types::{Address, Amount, Fraction, Lendgine, LendgineInfo, Token};
use proptest::prelude::*;

// ============================================================================
// Fixtures
// ============================================================================

fn lendgine(decimals1: u8) -> Lendgine {
    Lendgine::new(
        Token::new(42_161, Address::new([0xaa; 20]), 18, "WETH", "Wrapped Ether"),
        Token::new(42_161, Address::new([0xbb; 20]), decimals1, "USDC", "USD Coin"),
        18,
        decimals1,
        Fraction::from_integer(4096),
        Address::new([0xcc; 20]),
    )
    .unwrap()
}

fn snapshot(l: &Lendgine, liquidity: u64, borrowed: u64, positions: u64, last_update: u64) -> LendgineInfo {
    let mut info = LendgineInfo::empty(l);
    info.total_liquidity = Amount::from_raw(l.lendgine_token.clone(), liquidity);
    info.total_liquidity_borrowed = Amount::from_raw(l.lendgine_token.clone(), borrowed);
    info.total_position_size = Amount::from_raw(l.lendgine_token.clone(), positions);
    info.total_supply = Amount::from_raw(l.lendgine_token.clone(), borrowed);
    info.last_update = last_update;
    info
}

// ============================================================================
// Test Strategies
// ============================================================================

fn reserves() -> impl Strategy<Value = (u64, u64)> {
    (1u64..u64::MAX / 2, 0u64..u64::MAX / 2)
}

/// Liquidity, borrowed liquidity and position size with a non-empty pool
fn pool_state() -> impl Strategy<Value = (u64, u64, u64)> {
    (1u64..1_000_000_000_000, 1u64..1_000_000_000_000, 1u64..1_000_000_000_000)
}

fn elapsed_pair() -> impl Strategy<Value = (u64, u64)> {
    (0u64..100_000_000, 0u64..100_000_000).prop_map(|(a, b)| (a.min(b), a.max(b)))
}

// ============================================================================
// Price Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_price_is_homogeneous(
        (reserve0, reserve1) in reserves(),
        factor in 1u64..1_000_000,
        decimals1 in prop::sample::select(vec![6u8, 8, 18]),
    ) {
        let l = lendgine(decimals1);
        let mut info = LendgineInfo::empty(&l);
        info.reserve0 = Amount::from_raw(l.token0.clone(), reserve0);
        info.reserve1 = Amount::from_raw(l.token1.clone(), reserve1);

        let mut scaled = info.clone();
        scaled.reserve0 = info.reserve0.multiply(&Fraction::from_integer(factor));
        scaled.reserve1 = info.reserve1.multiply(&Fraction::from_integer(factor));

        prop_assert_eq!(price(&l, &info), price(&l, &scaled));
    }

    #[test]
    fn prop_price_requires_reserve0(reserve1 in 0u64..u64::MAX) {
        let l = lendgine(18);
        let mut info = LendgineInfo::empty(&l);
        info.reserve1 = Amount::from_raw(l.token1.clone(), reserve1);
        prop_assert!(price(&l, &info).is_none());
    }
}

// ============================================================================
// Accrual Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_accrual_without_elapsed_time_is_identity(
        (liquidity, borrowed, positions) in pool_state(),
        last_update in 0u64..2_000_000_000,
    ) {
        let l = lendgine(6);
        let info = snapshot(&l, liquidity, borrowed, positions, last_update);
        let accrued = accrued_lendgine_info(&l, &info, last_update, &JumpRateModel::default());
        prop_assert_eq!(accrued, info);
    }

    #[test]
    fn prop_owed_interest_is_monotonic(
        (liquidity, borrowed, positions) in pool_state(),
        (earlier, later) in elapsed_pair(),
    ) {
        let l = lendgine(6);
        let start = 1_600_000_000u64;
        let info = snapshot(&l, liquidity, borrowed, positions, start);
        let model = JumpRateModel::default();

        let first = accrued_lendgine_info(&l, &info, start + earlier, &model);
        let second = accrued_lendgine_info(&l, &info, start + later, &model);

        prop_assert!(first.reward_per_position_stored <= second.reward_per_position_stored);
        prop_assert!(!second.total_liquidity_borrowed.greater_than(&first.total_liquidity_borrowed));
        prop_assert!(!second.total_liquidity_borrowed.value().is_negative());
    }
}

// ============================================================================
// Bound Selection
// ============================================================================

proptest! {
    #[test]
    fn prop_next_highest_is_strictly_above(exponent in -8i32..8) {
        let l = lendgine(18);
        let lendgines: Vec<Lendgine> = (-6i32..=6)
            .map(|k| {
                let bound = if k >= 0 {
                    Fraction::from_integer(1u64 << k)
                } else {
                    Fraction::new(1, 1u64 << -k)
                };
                Lendgine { bound, address: Address::new([(k + 100) as u8; 20]), ..l.clone() }
            })
            .collect();

        let price = if exponent >= 0 {
            Fraction::from_integer(1u64 << exponent)
        } else {
            Fraction::new(1, 1u64 << -exponent)
        };

        if let Some(next) = next_highest_lendgine(&price, &lendgines) {
            prop_assert!(next.bound > price);
            prop_assert!(lendgines.iter().all(|c| c.bound <= price || c.bound >= next.bound));
        } else {
            prop_assert!(lendgines.iter().all(|c| c.bound <= price));
        }
    }
}
