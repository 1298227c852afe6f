//! # Report Composer
//!
//! Merges the scorer, planner and optional readiness results into one report
//! with a single-line summary.

use serde::{Deserialize, Serialize};

use crate::lightning::Readiness;
use crate::planner::ConsolidationPlan;
use crate::score::SovereigntyResult;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub sovereignty_summary: String,
    pub onchain: SovereigntyResult,
    pub consolidation_plan: ConsolidationPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ln_readiness: Option<Readiness>,
}

/// On-chain part of a report, returned by `/check`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OnchainCheck {
    pub onchain: SovereigntyResult,
    pub consolidation_plan: ConsolidationPlan,
}

/// `Score 65/100 • 3 UTXOs (0 dust) • Fee 2 sat/vB • Plan: WAIT • LN: n/a`
pub fn summary_line(
    onchain: &SovereigntyResult,
    plan: &ConsolidationPlan,
    ln: Option<&Readiness>,
) -> String {
    let plan_part = if plan.recommended { "CONSOLIDATE" } else { "WAIT" };

    let ln_part = match ln {
        None => "n/a".to_string(),
        Some(r) if r.ready => format!("READY ({}/100)", r.score),
        Some(r) => format!("NOT READY ({}/100)", r.score),
    };

    format!(
        "Score {}/100 • {} UTXOs ({} dust) • Fee {} sat/vB • Plan: {} • LN: {}",
        onchain.sovereignty_score,
        onchain.num_utxos,
        onchain.dust_utxos,
        onchain.fee_rate_sat_vb,
        plan_part,
        ln_part,
    )
}

pub fn compose_report(
    onchain: SovereigntyResult,
    plan: ConsolidationPlan,
    ln: Option<Readiness>,
) -> Report {
    Report {
        sovereignty_summary: summary_line(&onchain, &plan, ln.as_ref()),
        onchain,
        consolidation_plan: plan,
        ln_readiness: ln,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lightning::{compute_readiness, NodeInfoSnapshot};
    use crate::planner::{decide_plan, PlanInputs};
    use crate::score::{compute_score, ScoreInput};
    use crate::types::{Network, Provenance, SourceMode};
    use crate::utxo::Utxo;

    fn onchain(values: &[u64], fee_rate: u64) -> SovereigntyResult {
        let utxos = values
            .iter()
            .enumerate()
            .map(|(i, v)| Utxo {
                txid: format!("{:064x}", i),
                vout: i as u32,
                value_sats: *v,
                confirmed: true,
                block_height: None,
                source: Provenance::Node,
            })
            .collect();
        compute_score(ScoreInput {
            address: "bc1qexample".to_string(),
            network: Network::Mainnet,
            mode: SourceMode::NodeOnly,
            utxos,
            fee_rate_sat_vb: fee_rate,
        })
    }

    fn plan_for(result: &SovereigntyResult, fee_low: u64) -> ConsolidationPlan {
        decide_plan(PlanInputs {
            num_utxos: result.num_utxos,
            dust_count: result.dust_utxos,
            fee_now_sat_vb: result.fee_rate_sat_vb,
            fee_low_sat_vb: fee_low,
        })
    }

    #[test]
    fn test_summary_without_lightning() {
        let result = onchain(&[1_000_000, 2_000_000, 3_000_000], 2);
        let plan = plan_for(&result, 2);
        let report = compose_report(result, plan, None);

        assert_eq!(
            report.sovereignty_summary,
            "Score 65/100 • 3 UTXOs (0 dust) • Fee 2 sat/vB • Plan: WAIT • LN: n/a"
        );
        assert!(report.ln_readiness.is_none());
    }

    #[test]
    fn test_summary_with_lightning() {
        let values: Vec<u64> = (0..15).map(|_| 100_000).collect();
        let result = onchain(&values, 2);
        let plan = plan_for(&result, 5);

        let ready = compute_readiness(NodeInfoSnapshot {
            synced_to_chain: true,
            num_peers: 1,
            ..Default::default()
        });
        let report = compose_report(result.clone(), plan.clone(), Some(ready));
        assert!(report.sovereignty_summary.contains("Plan: CONSOLIDATE"));
        assert!(report.sovereignty_summary.ends_with("LN: READY (85/100)"));

        let not_ready = compute_readiness(NodeInfoSnapshot::default());
        let report = compose_report(result, plan, Some(not_ready));
        assert!(report.sovereignty_summary.ends_with("LN: NOT READY (15/100)"));
    }

    #[test]
    fn test_absent_readiness_not_serialized() {
        let result = onchain(&[], 1);
        let plan = plan_for(&result, 1);
        let json = serde_json::to_value(compose_report(result, plan, None)).unwrap();

        assert!(json.get("ln_readiness").is_none());
        assert_eq!(json["onchain"]["num_utxos"], 0);
        assert_eq!(json["onchain"]["sovereignty_score"], 40);
        assert_eq!(json["consolidation_plan"]["suggested_target"], "N/A");
    }

    #[test]
    fn test_plan_reproducible_from_report() {
        let values: Vec<u64> = (0..40).map(|i| if i % 8 == 0 { 300 } else { 75_000 }).collect();
        let result = onchain(&values, 9);
        let plan = plan_for(&result, 4);
        let report = compose_report(result, plan, None);

        let replayed = decide_plan(PlanInputs {
            num_utxos: report.onchain.num_utxos,
            dust_count: report.onchain.dust_utxos,
            fee_now_sat_vb: report.consolidation_plan.fee_now_sat_vb,
            fee_low_sat_vb: report.consolidation_plan.fee_low_sat_vb,
        });
        assert_eq!(replayed, report.consolidation_plan);
    }
}
