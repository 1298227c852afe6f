/// Sovereignty Checker Constants
///
/// Fixed thresholds and weights shared by the scorer, the planner and the
/// readiness evaluator. All amounts are in satoshis, all fee rates in sat/vB.

/// Satoshis per whole bitcoin
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Outputs strictly below this value are counted as dust
pub const DUST_THRESHOLD_SATS: u64 = 1_000;

/// Virtual size of one legacy-style input in the sweep size model
pub const INPUT_VBYTES: u64 = 148;

/// Virtual size of one output in the sweep size model
pub const OUTPUT_VBYTES: u64 = 34;

/// Fixed transaction overhead in the sweep size model
pub const TX_OVERHEAD_VBYTES: u64 = 10;

/// Starting value for both the sovereignty score and the readiness score
pub const BASE_SCORE: i32 = 50;

/// Upper bound of every score
pub const MAX_SCORE: i32 = 100;

/// UTXO count above which the set is considered "very high"
pub const HIGH_UTXO_COUNT: usize = 50;

/// UTXO count above which the set is considered "moderate"
pub const MODERATE_UTXO_COUNT: usize = 10;

/// Sweep fee share of the balance above which a sweep is "expensive" (5%)
pub const EXPENSIVE_SWEEP_PERCENT: u64 = 5;

/// Planner pressure thresholds on UTXO count
pub const PLAN_PRESSURE_COUNT_LOW: usize = 10;
pub const PLAN_PRESSURE_COUNT_HIGH: usize = 30;

/// Confirmation target passed to the node's fee estimator
pub const DEFAULT_FEE_TARGET_BLOCKS: u32 = 6;

/// `listunspent` confirmation window used for node-only lookups
pub const LISTUNSPENT_MIN_CONF: u32 = 0;
pub const LISTUNSPENT_MAX_CONF: u32 = 9_999_999;

/// Check whether an output value counts as dust
#[inline]
pub fn is_dust(value_sats: u64) -> bool {
    value_sats < DUST_THRESHOLD_SATS
}
