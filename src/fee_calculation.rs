/// Fee Calculation Module
///
/// Sweep-cost estimation and fee-rate conversion for the sovereignty checker.
///
/// Every input is priced as a legacy P2PKH spend and every output as a P2PKH
/// output.
///
/// size (vB) = inputs * 148 + outputs * 34 + 10
/// fee (sat) = size * fee_rate (sat/vB)

use crate::constants::{INPUT_VBYTES, OUTPUT_VBYTES, SATS_PER_BTC, TX_OVERHEAD_VBYTES};

/// Virtual size of a transaction spending `num_inputs` into `num_outputs`.
///
/// Returns 0 when either side is empty.
pub fn estimate_vsize(num_inputs: usize, num_outputs: usize) -> u64 {
    if num_inputs == 0 || num_outputs == 0 {
        return 0;
    }
    (num_inputs as u64)
        .saturating_mul(INPUT_VBYTES)
        .saturating_add((num_outputs as u64).saturating_mul(OUTPUT_VBYTES))
        .saturating_add(TX_OVERHEAD_VBYTES)
}

/// Estimated fee in satoshis to sweep `num_inputs` into `num_outputs`.
pub fn estimate_sweep_fee(num_inputs: usize, num_outputs: usize, fee_rate_sat_vb: u64) -> u64 {
    estimate_vsize(num_inputs, num_outputs).saturating_mul(fee_rate_sat_vb)
}

/// Convert a node fee estimate (BTC/kvB) to an integer sat/vB rate.
///
/// Rounds to the nearest integer and never returns less than 1.
pub fn btc_per_kb_to_sat_per_vb(btc_per_kb: f64) -> u64 {
    let sat_per_vb = btc_per_kb * SATS_PER_BTC as f64 / 1000.0;
    if !(sat_per_vb >= 1.0) {
        return 1;
    }
    sat_per_vb.round() as u64
}

/// Pick the effective fee rate: the node estimate when usable, else the fallback.
pub fn effective_fee_rate(estimate_btc_per_kb: Option<f64>, fallback_sat_vb: u64) -> u64 {
    match estimate_btc_per_kb {
        Some(rate) if rate > 0.0 => btc_per_kb_to_sat_per_vb(rate),
        _ => fallback_sat_vb,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vsize_model() {
        assert_eq!(estimate_vsize(1, 1), 148 + 34 + 10);
        assert_eq!(estimate_vsize(10, 1), 10 * 148 + 34 + 10);
        assert_eq!(estimate_vsize(2, 3), 2 * 148 + 3 * 34 + 10);
    }

    #[test]
    fn test_sweep_fee_zero_cases() {
        assert_eq!(estimate_sweep_fee(0, 1, 10), 0);
        assert_eq!(estimate_sweep_fee(5, 0, 10), 0);
        assert_eq!(estimate_sweep_fee(5, 1, 0), 0);
    }

    #[test]
    fn test_sweep_fee_monotonic() {
        let mut previous = 0;
        for rate in 0..50u64 {
            let fee = estimate_sweep_fee(7, 1, rate);
            assert!(fee >= previous, "fee must not decrease with rate");
            previous = fee;
        }

        let mut previous = 0;
        for inputs in 0..200usize {
            let fee = estimate_sweep_fee(inputs, 1, 3);
            assert!(fee >= previous, "fee must not decrease with input count");
            previous = fee;
        }
    }

    #[test]
    fn test_sweep_fee_saturates() {
        assert_eq!(estimate_sweep_fee(usize::MAX, 1, u64::MAX), u64::MAX);
    }

    #[test]
    fn test_btc_per_kb_conversion() {
        // 0.00012 BTC/kvB = 12000 sat/kvB = 12 sat/vB
        assert_eq!(btc_per_kb_to_sat_per_vb(0.00012), 12);
        // 0.0000255 BTC/kvB = 2.55 sat/vB -> 3
        assert_eq!(btc_per_kb_to_sat_per_vb(0.0000255), 3);
        // below 1 sat/vB is floored at 1
        assert_eq!(btc_per_kb_to_sat_per_vb(0.000005), 1);
        assert_eq!(btc_per_kb_to_sat_per_vb(0.0), 1);
    }

    #[test]
    fn test_effective_fee_rate() {
        assert_eq!(effective_fee_rate(None, 2), 2);
        assert_eq!(effective_fee_rate(Some(0.0), 2), 2);
        assert_eq!(effective_fee_rate(Some(-1.0), 2), 2);
        assert_eq!(effective_fee_rate(Some(0.0001), 2), 10);
    }
}
