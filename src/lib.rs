//! Bitcoin self-custody health checks.
//!
//! Scores an address's UTXO set, recommends whether to consolidate, and
//! optionally reports whether an LND node is ready to pay. The scoring engine
//! (`utxo`, `score`, `planner`, `lightning`, `report`) is pure; `sources` and
//! `checker` do the I/O around it.

pub mod api;
pub mod checker;
pub mod config;
pub mod constants;
pub mod error;
pub mod fee_calculation;
pub mod lightning;
pub mod metrics;
pub mod planner;
pub mod report;
pub mod score;
pub mod sources;
pub mod telemetry;
pub mod types;
pub mod utxo;

#[cfg(test)]
mod test_support;

pub use checker::Checker;
pub use config::{load_settings, Settings};
pub use error::{Error, Result};
pub use lightning::{compute_readiness, NodeInfoSnapshot, Readiness};
pub use planner::{decide_plan, ConsolidationPlan, PlanInputs, PlanOutcome};
pub use report::{compose_report, summary_line, OnchainCheck, Report};
pub use score::{compute_score, ScoreInput, SovereigntyResult};
pub use types::{Network, Provenance, SourceMode};
pub use utxo::{Utxo, UtxoRecords};
