//! # Consolidation Planner
//!
//! Decides whether merging the UTXO set into fewer outputs is advisable right
//! now. First matching rule wins:
//!
//! 1. at most one UTXO: nothing to do
//! 2. no pressure (few outputs, no dust): optional
//! 3. pressure and current fee <= low-fee threshold: consolidate now
//! 4. pressure and current fee above the threshold: wait
//!
//! Pressure is +1 above 10 outputs, +1 above 30 outputs, +1 for any dust.

use serde::{Deserialize, Serialize};

use crate::constants::{PLAN_PRESSURE_COUNT_HIGH, PLAN_PRESSURE_COUNT_LOW};

pub const TARGET_NONE: &str = "N/A";
pub const TARGET_CONSOLIDATE: &str = "Consolidate to 1–3 UTXOs";
pub const TARGET_WAIT: &str = "Wait for a low-fee window";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanInputs {
    pub num_utxos: usize,
    pub dust_count: usize,
    pub fee_now_sat_vb: u64,
    pub fee_low_sat_vb: u64,
}

/// The four possible planner outcomes
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlanOutcome {
    AlreadyMinimal,
    Optional,
    ConsolidateNow,
    WaitForLowFees,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConsolidationPlan {
    pub outcome: PlanOutcome,
    pub recommended: bool,
    pub reason: String,
    pub suggested_target: String,
    pub notes: Vec<String>,
    pub fee_now_sat_vb: u64,
    pub fee_low_sat_vb: u64,
}

/// Fragmentation pressure in 0..=3.
pub fn pressure(num_utxos: usize, dust_count: usize) -> u8 {
    let mut p = 0;
    if num_utxos > PLAN_PRESSURE_COUNT_LOW {
        p += 1;
    }
    if num_utxos > PLAN_PRESSURE_COUNT_HIGH {
        p += 1;
    }
    if dust_count > 0 {
        p += 1;
    }
    p
}

/// Classify the inputs into exactly one outcome.
pub fn classify(inputs: &PlanInputs) -> PlanOutcome {
    if inputs.num_utxos <= 1 {
        return PlanOutcome::AlreadyMinimal;
    }
    if pressure(inputs.num_utxos, inputs.dust_count) == 0 {
        return PlanOutcome::Optional;
    }
    if inputs.fee_now_sat_vb <= inputs.fee_low_sat_vb {
        PlanOutcome::ConsolidateNow
    } else {
        PlanOutcome::WaitForLowFees
    }
}

/// Build the consolidation plan. Pure, total and deterministic.
pub fn decide_plan(inputs: PlanInputs) -> ConsolidationPlan {
    let outcome = classify(&inputs);

    let (recommended, reason, target, notes): (bool, &str, &str, Vec<&str>) = match outcome {
        PlanOutcome::AlreadyMinimal => (
            false,
            "Already 0–1 UTXOs; consolidation not needed.",
            TARGET_NONE,
            vec![],
        ),
        PlanOutcome::Optional => (
            false,
            "UTXO set looks manageable; consolidation optional.",
            TARGET_NONE,
            vec!["Consolidate only when fees are low if you want to simplify future spending."],
        ),
        PlanOutcome::ConsolidateNow => (
            true,
            "Fees look low and UTXO fragmentation is high; consolidate now to reduce future fees.",
            TARGET_CONSOLIDATE,
            vec![
                "Consolidation can reduce privacy by linking coins.",
                "Consider privacy tools before consolidating large amounts.",
            ],
        ),
        PlanOutcome::WaitForLowFees => (
            false,
            "Fees look elevated; waiting for cheaper fees is likely better unless you must move coins soon.",
            TARGET_WAIT,
            vec![
                "If you must spend soon, consider consolidating only the smallest UTXOs.",
                "Re-check fee estimates from your node periodically.",
            ],
        ),
    };

    ConsolidationPlan {
        outcome,
        recommended,
        reason: reason.to_string(),
        suggested_target: target.to_string(),
        notes: notes.into_iter().map(String::from).collect(),
        fee_now_sat_vb: inputs.fee_now_sat_vb,
        fee_low_sat_vb: inputs.fee_low_sat_vb,
    }
}
