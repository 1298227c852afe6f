//! # Sovereignty Scorer
//!
//! Derives balance totals, dust count, the estimated cost of sweeping every
//! output into one, and a 0-100 heuristic score with warnings and notes.
//!
//! Scoring rules (base 50):
//!
//! | Condition                         | Delta | Message  |
//! |-----------------------------------|-------|----------|
//! | no UTXOs                          | -10   | warning  |
//! | more than 50 UTXOs                | -20   | warning  |
//! | 11..=50 UTXOs                     | -10   | warning  |
//! | 1..=10 UTXOs                      | +10   | note     |
//! | any dust (< 1000 sat)             | -10   | warning  |
//! | sweep fee > 5% of balance         | -10   | warning  |
//! | sweep fee <= 5% of balance        | +5    | note     |
//!
//! The UTXO-count rows are exclusive. The sweep rows only apply when both the
//! estimated fee and the balance are non-zero.

use serde::{Deserialize, Serialize};

use crate::constants::{
    is_dust, BASE_SCORE, EXPENSIVE_SWEEP_PERCENT, HIGH_UTXO_COUNT, MAX_SCORE, MODERATE_UTXO_COUNT,
};
use crate::fee_calculation::estimate_sweep_fee;
use crate::types::{Network, SourceMode};
use crate::utxo::Utxo;

pub const WARN_NO_UTXOS: &str = "No UTXOs found for this address.";
pub const WARN_VERY_HIGH_COUNT: &str = "Very high UTXO count; sweeping could be expensive.";
pub const WARN_MODERATE_COUNT: &str = "Moderate UTXO count; consider consolidation when fees are low.";
pub const NOTE_COUNT_REASONABLE: &str = "UTXO count looks reasonable.";
pub const WARN_DUST: &str = "Dust UTXOs (< 1000 sats) detected; may be uneconomical to spend.";
pub const WARN_EXPENSIVE_SWEEP: &str = "Estimated sweep fee is >5% of total balance.";
pub const NOTE_SWEEP_SMALL: &str = "Sweep fee looks small relative to balance.";
pub const NOTE_FRESH_ADDRESSES: &str = "Use fresh addresses for incoming payments to reduce address reuse.";
pub const NOTE_CONSOLIDATION_PRIVACY: &str = "Be careful: consolidation can reduce privacy by linking UTXOs.";

/// Everything the scorer needs for one evaluation
#[derive(Debug, Clone)]
pub struct ScoreInput {
    pub address: String,
    pub network: Network,
    pub mode: SourceMode,
    pub utxos: Vec<Utxo>,
    pub fee_rate_sat_vb: u64,
}

/// Read-only summary of one address's UTXO set
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SovereigntyResult {
    pub address: String,
    pub network: Network,
    pub mode: SourceMode,
    pub total_balance_sats: u64,
    pub num_utxos: usize,
    pub dust_utxos: usize,
    #[serde(rename = "estimated_sweep_fee_sats")]
    pub estimated_sweep_fee: u64,
    pub fee_rate_sat_vb: u64,
    pub sovereignty_score: u8,
    pub warnings: Vec<String>,
    pub notes: Vec<String>,
    pub utxos: Vec<Utxo>,
}

/// Sum of all output values.
pub fn total_balance(utxos: &[Utxo]) -> u64 {
    utxos.iter().fold(0u64, |acc, u| acc.saturating_add(u.value_sats))
}

/// Number of outputs strictly below the dust threshold.
pub fn count_dust(utxos: &[Utxo]) -> usize {
    utxos.iter().filter(|u| is_dust(u.value_sats)).count()
}

/// Whether sweeping costs more than 5% of the balance.
fn sweep_is_expensive(fee: u64, balance: u64) -> bool {
    (fee as u128) * 100 > (balance as u128) * EXPENSIVE_SWEEP_PERCENT as u128
}

/// Score one UTXO set. Pure and deterministic.
pub fn compute_score(input: ScoreInput) -> SovereigntyResult {
    let total = total_balance(&input.utxos);
    let num_utxos = input.utxos.len();
    let dust = count_dust(&input.utxos);
    let estimated_fee = estimate_sweep_fee(num_utxos, 1, input.fee_rate_sat_vb);

    let mut score = BASE_SCORE;
    let mut warnings: Vec<String> = Vec::new();
    let mut notes: Vec<String> = Vec::new();

    if num_utxos == 0 {
        score -= 10;
        warnings.push(WARN_NO_UTXOS.to_string());
    } else if num_utxos > HIGH_UTXO_COUNT {
        score -= 20;
        warnings.push(WARN_VERY_HIGH_COUNT.to_string());
    } else if num_utxos > MODERATE_UTXO_COUNT {
        score -= 10;
        warnings.push(WARN_MODERATE_COUNT.to_string());
    } else {
        score += 10;
        notes.push(NOTE_COUNT_REASONABLE.to_string());
    }

    if dust > 0 {
        score -= 10;
        warnings.push(WARN_DUST.to_string());
    }

    if estimated_fee > 0 && total > 0 {
        if sweep_is_expensive(estimated_fee, total) {
            score -= 10;
            warnings.push(WARN_EXPENSIVE_SWEEP.to_string());
        } else {
            score += 5;
            notes.push(NOTE_SWEEP_SMALL.to_string());
        }
    }

    notes.push(NOTE_FRESH_ADDRESSES.to_string());
    notes.push(NOTE_CONSOLIDATION_PRIVACY.to_string());

    SovereigntyResult {
        address: input.address,
        network: input.network,
        mode: input.mode,
        total_balance_sats: total,
        num_utxos,
        dust_utxos: dust,
        estimated_sweep_fee: estimated_fee,
        fee_rate_sat_vb: input.fee_rate_sat_vb,
        sovereignty_score: clamp_score(score),
        warnings,
        notes,
        utxos: input.utxos,
    }
}

/// Clamp a raw score into [0, 100].
pub fn clamp_score(raw: i32) -> u8 {
    raw.clamp(0, MAX_SCORE) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Provenance;

    fn utxo(value_sats: u64) -> Utxo {
        Utxo {
            txid: format!("{:064x}", value_sats),
            vout: 0,
            value_sats,
            confirmed: true,
            block_height: Some(100),
            source: Provenance::Explorer,
        }
    }

    fn input(utxos: Vec<Utxo>, fee_rate_sat_vb: u64) -> ScoreInput {
        ScoreInput {
            address: "tb1qexample".to_string(),
            network: Network::Testnet,
            mode: SourceMode::Explorer,
            utxos,
            fee_rate_sat_vb,
        }
    }

    #[test]
    fn test_empty_set() {
        let res = compute_score(input(vec![], 10));

        assert_eq!(res.num_utxos, 0);
        assert_eq!(res.total_balance_sats, 0);
        assert_eq!(res.estimated_sweep_fee, 0);
        assert_eq!(res.sovereignty_score, 40);
        assert!(res.warnings.iter().any(|w| w.contains("No UTXOs found")));
        assert_eq!(
            res.notes,
            vec![NOTE_FRESH_ADDRESSES.to_string(), NOTE_CONSOLIDATION_PRIVACY.to_string()]
        );
    }

    #[test]
    fn test_small_healthy_set() {
        // 3 large outputs, cheap sweep: 50 + 10 + 5
        let res = compute_score(input(vec![utxo(1_000_000), utxo(2_000_000), utxo(3_000_000)], 2));

        assert_eq!(res.total_balance_sats, 6_000_000);
        assert_eq!(res.dust_utxos, 0);
        assert_eq!(res.estimated_sweep_fee, (3 * 148 + 34 + 10) * 2);
        assert_eq!(res.sovereignty_score, 65);
        assert!(res.warnings.is_empty());
        assert_eq!(res.notes[0], NOTE_COUNT_REASONABLE);
        assert_eq!(res.notes[1], NOTE_SWEEP_SMALL);
        assert_eq!(res.notes.len(), 4);
    }

    #[test]
    fn test_sixty_utxos_with_dust() {
        let mut utxos: Vec<Utxo> = (0..55).map(|_| utxo(50_000)).collect();
        utxos.extend((0..5).map(|_| utxo(500)));

        let res = compute_score(input(utxos, 10));

        assert_eq!(res.num_utxos, 60);
        assert_eq!(res.dust_utxos, 5);
        // sweep: (60*148+44)*10 = 89_240 sat vs 2_752_500 balance -> ~3.2%, so +5
        assert_eq!(res.estimated_sweep_fee, 89_240);
        assert_eq!(res.sovereignty_score, 25);
        assert_eq!(res.warnings[0], WARN_VERY_HIGH_COUNT);
        assert_eq!(res.warnings[1], WARN_DUST);
    }

    #[test]
    fn test_expensive_sweep() {
        // One 10k-sat output at 10 sat/vB: fee 1920 sat = 19.2% of balance
        let res = compute_score(input(vec![utxo(10_000)], 10));

        assert_eq!(res.sovereignty_score, 50);
        assert!(res.warnings.contains(&WARN_EXPENSIVE_SWEEP.to_string()));
    }

    #[test]
    fn test_sweep_ratio_boundary() {
        // Exactly 5% is not expensive
        assert!(!sweep_is_expensive(5, 100));
        assert!(sweep_is_expensive(6, 100));
        // u128 widening: no overflow at the extremes
        assert!(sweep_is_expensive(u64::MAX, u64::MAX));
        assert!(!sweep_is_expensive(5, u64::MAX));
    }

    #[test]
    fn test_zero_fee_rate_skips_sweep_rules() {
        let res = compute_score(input(vec![utxo(10_000)], 0));

        assert_eq!(res.estimated_sweep_fee, 0);
        assert_eq!(res.sovereignty_score, 60);
    }

    #[test]
    fn test_moderate_count() {
        let utxos: Vec<Utxo> = (0..15).map(|_| utxo(1_000_000)).collect();
        let res = compute_score(input(utxos, 1));

        assert_eq!(res.warnings, vec![WARN_MODERATE_COUNT.to_string()]);
        assert_eq!(res.sovereignty_score, 45);
    }

    #[test]
    fn test_score_floor_clamp() {
        // Worst case: 50 - 20 - 10 - 10 = 10, still within range
        // compute_score cannot reach the floor, so the clamp is checked directly below
        let utxos: Vec<Utxo> = (0..500).map(|_| utxo(1)).collect();
        let res = compute_score(input(utxos, 1_000));
        assert_eq!(res.sovereignty_score, 10);

        assert_eq!(clamp_score(-250), 0);
        assert_eq!(clamp_score(250), 100);
        assert_eq!(clamp_score(42), 42);
    }

    #[test]
    fn test_totals_match_values() {
        let values = [1u64, 999, 1_000, 1_001, 546, 250_000];
        let utxos: Vec<Utxo> = values.iter().map(|v| utxo(*v)).collect();

        assert_eq!(total_balance(&utxos), values.iter().sum::<u64>());
        assert_eq!(count_dust(&utxos), values.iter().filter(|v| **v < 1000).count());
    }

    #[test]
    fn test_deterministic() {
        let utxos = vec![utxo(1_500), utxo(800), utxo(90_000)];
        let a = compute_score(input(utxos.clone(), 4));
        let b = compute_score(input(utxos, 4));
        assert_eq!(a, b);
    }
}
