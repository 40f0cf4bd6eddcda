/// Protocol constants used across the lendgine client crates

use num_bigint::BigInt;
use num_traits::pow;

// ============================================================================
// Fixed-Point Constants
// ============================================================================

/// Decimal exponent of the contracts' fixed-point scale (1e18)
pub const SCALE_DECIMALS: u32 = 18;

/// Decimals of every lendgine position/share token
pub const LENDGINE_TOKEN_DECIMALS: u8 = 18;

/// Largest token exponent a lendgine accepts
pub const MAX_TOKEN_EXP: u8 = 18;

/// Fixed-point scale used by the contracts: 10^18
pub fn scale() -> BigInt {
    pow(BigInt::from(10u8), SCALE_DECIMALS as usize)
}

/// 10^exp as a big integer
pub fn ten_pow(exp: u32) -> BigInt {
    pow(BigInt::from(10u8), exp as usize)
}

// ============================================================================
// Interest Constants
// ============================================================================

/// Seconds in the contracts' interest year (365 days)
pub const ONE_YEAR_SECS: u64 = 365 * 24 * 60 * 60;

/// Default jump-rate kink utilization (0.8), as numerator over 1000
pub const KINK_PER_MILLE: u64 = 800;

/// Default slope below the kink (1.375), as numerator over 1000
pub const MULTIPLIER_PER_MILLE: u64 = 1_375;

/// Default slope above the kink (44.5), as numerator over 1000
pub const JUMP_MULTIPLIER_PER_MILLE: u64 = 44_500;

// ============================================================================
// Client Defaults
// ============================================================================

/// Basis points denominator (10,000 = 100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Default maximum slippage (0.5%)
pub const DEFAULT_MAX_SLIPPAGE_BPS: u64 = 50;

/// Default transaction deadline in minutes
pub const DEFAULT_TIMEOUT_MINUTES: u64 = 20;

/// Staleness window for cached contract reads
pub const DEFAULT_STALE_TIME_MS: u64 = 3_000;

/// Age after which cached reads are dropped on the next insert
pub const DEFAULT_GC_TIME_MS: u64 = 300_000;

/// Chain id of Arbitrum One
pub const ARBITRUM_CHAIN_ID: u64 = 42_161;

/// Chain id of Celo
pub const CELO_CHAIN_ID: u64 = 42_220;

/// Chain id of Polygon PoS
pub const POLYGON_CHAIN_ID: u64 = 137;
