/// Jump-rate interest model
///
/// Piecewise-linear borrow rate keyed on utilization: one slope up to the
/// kink, a steeper one beyond it. Rates are annualized fractions.

use lendgine_types::{
    Fraction, LendgineInfo, JUMP_MULTIPLIER_PER_MILLE, KINK_PER_MILLE, MULTIPLIER_PER_MILLE,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpRateModel {
    pub base_rate: Fraction,
    pub kink: Fraction,
    pub multiplier: Fraction,
    pub jump_multiplier: Fraction,
}

impl Default for JumpRateModel {
    fn default() -> Self {
        Self {
            base_rate: Fraction::zero(),
            kink: Fraction::new(KINK_PER_MILLE, 1_000u64),
            multiplier: Fraction::new(MULTIPLIER_PER_MILLE, 1_000u64),
            jump_multiplier: Fraction::new(JUMP_MULTIPLIER_PER_MILLE, 1_000u64),
        }
    }
}

impl JumpRateModel {
    /// Borrow rate at a given utilization
    pub fn borrow_rate_at(&self, utilization: &Fraction) -> Fraction {
        if utilization <= &self.kink {
            &self.base_rate + utilization * &self.multiplier
        } else {
            let normal = &self.base_rate + &self.kink * &self.multiplier;
            let excess = utilization - &self.kink;
            normal + excess * &self.jump_multiplier
        }
    }

    pub fn borrow_rate(&self, info: &LendgineInfo) -> Fraction {
        self.borrow_rate_at(&utilization(info))
    }

    /// Rate earned by providers: borrowers' rate spread over all liquidity
    pub fn supply_rate(&self, info: &LendgineInfo) -> Fraction {
        let utilization = utilization(info);
        self.borrow_rate_at(&utilization) * utilization
    }
}

/// Share of all liquidity currently borrowed; zero for an empty pool
pub fn utilization(info: &LendgineInfo) -> Fraction {
    let borrowed = info.total_liquidity_borrowed.value();
    let total = info.total_liquidity.value() + borrowed;
    if total.is_zero() {
        return Fraction::zero();
    }
    borrowed / total
}
