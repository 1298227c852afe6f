//! # Checker
//!
//! Runs one evaluation end to end: validate the address, fetch UTXOs (and the
//! fee rate) from the configured backend, score, plan, and optionally attach
//! Lightning readiness. Both the CLI and the HTTP server go through here.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::lightning::{compute_readiness, Readiness};
use crate::metrics::{self, Timer};
use crate::planner::{decide_plan, ConsolidationPlan, PlanInputs};
use crate::report::{compose_report, OnchainCheck, Report};
use crate::score::{compute_score, ScoreInput, SovereigntyResult};
use crate::sources::{
    build_http_client, validate_address, BitcoindRpc, ExplorerClient, LndClient, UtxoBackend,
};
use crate::telemetry::truncate_middle;
use crate::types::Network;

/// Lightning collaborator state, resolved once at startup
#[derive(Debug, Clone)]
pub enum Lightning {
    Disabled,
    /// Enabled but could not be set up (missing or unreadable macaroon)
    Unavailable(String),
    Client(LndClient),
}

impl Lightning {
    pub fn from_settings(settings: &Settings) -> Self {
        if !settings.lnd.enabled {
            return Lightning::Disabled;
        }
        if !settings.lnd.is_usable() {
            tracing::warn!("LND enabled without a url and macaroon path; readiness checks will be skipped");
            return Lightning::Unavailable("lnd url or macaroon path not set".to_string());
        }
        match LndClient::new(&settings.lnd) {
            Ok(client) => Lightning::Client(client),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to set up LND client; readiness checks will be skipped");
                Lightning::Unavailable(e.to_string())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Checker {
    backend: UtxoBackend,
    lightning: Lightning,
    default_network: Network,
    fee_fallback_sat_vb: u64,
    fee_low_sat_vb: u64,
}

impl Checker {
    pub fn new(backend: UtxoBackend, default_network: Network, fee_fallback_sat_vb: u64, fee_low_sat_vb: u64) -> Self {
        Self {
            backend,
            lightning: Lightning::Disabled,
            default_network,
            fee_fallback_sat_vb,
            fee_low_sat_vb,
        }
    }

    pub fn with_lightning(mut self, lightning: Lightning) -> Self {
        self.lightning = lightning;
        self
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = build_http_client(&settings.http)?;

        let backend = if settings.node_only {
            tracing::info!(rpc = %settings.rpc.url, "Using bitcoind for UTXOs and fee estimates");
            UtxoBackend::Node {
                rpc: BitcoindRpc::new(client, &settings.rpc),
                fee_target_blocks: settings.fee_target_blocks,
            }
        } else {
            tracing::info!(
                explorer = %settings.explorer.base_url(settings.network),
                fee_rate = settings.fee_fallback_sat_vb,
                "Using block explorer for UTXOs"
            );
            UtxoBackend::Explorer(ExplorerClient::new(client, settings.explorer.clone()))
        };

        Ok(Self::new(
            backend,
            settings.network,
            settings.fee_fallback_sat_vb,
            settings.fee_low_sat_vb,
        )
        .with_lightning(Lightning::from_settings(settings)))
    }

    pub fn default_network(&self) -> Network {
        self.default_network
    }

    pub fn lightning_enabled(&self) -> bool {
        !matches!(self.lightning, Lightning::Disabled)
    }

    /// Fetch and score one address.
    pub async fn onchain(&self, address: &str, network: Network) -> Result<SovereigntyResult> {
        validate_address(address, network)?;

        let timer = Timer::new();
        let fetched = match self.backend.fetch(address, network, self.fee_fallback_sat_vb).await {
            Ok(fetched) => fetched,
            Err(e) => {
                if e.is_upstream() {
                    metrics::increment_upstream_errors(self.backend.source_label());
                }
                tracing::warn!(
                    address = %truncate_middle(address, 8),
                    %network,
                    source = self.backend.source_label(),
                    error = %e,
                    "UTXO fetch failed"
                );
                return Err(e);
            }
        };

        let result = compute_score(ScoreInput {
            address: address.to_string(),
            network,
            mode: fetched.mode,
            utxos: fetched.utxos,
            fee_rate_sat_vb: fetched.fee_rate_sat_vb,
        });
        metrics::record_evaluation(result.mode.as_str(), timer.elapsed_secs());

        tracing::info!(
            address = %truncate_middle(address, 8),
            %network,
            mode = %result.mode,
            utxos = result.num_utxos,
            dust = result.dust_utxos,
            fee_rate = result.fee_rate_sat_vb,
            score = result.sovereignty_score,
            "Evaluated address"
        );

        Ok(result)
    }

    pub fn plan_for(&self, onchain: &SovereigntyResult) -> ConsolidationPlan {
        decide_plan(PlanInputs {
            num_utxos: onchain.num_utxos,
            dust_count: onchain.dust_utxos,
            fee_now_sat_vb: onchain.fee_rate_sat_vb,
            fee_low_sat_vb: self.fee_low_sat_vb,
        })
    }

    /// Query LND and score the snapshot. Errors when Lightning is disabled
    /// or the node cannot be reached.
    pub async fn node_readiness(&self) -> Result<Readiness> {
        let client = match &self.lightning {
            Lightning::Disabled => return Err(Error::LightningDisabled),
            Lightning::Unavailable(reason) => {
                metrics::record_ln_snapshot("unavailable");
                return Err(Error::LightningUnavailable(reason.clone()));
            }
            Lightning::Client(client) => client,
        };

        match client.get_info().await {
            Ok(info) => {
                let readiness = compute_readiness(info);
                metrics::record_ln_snapshot(if readiness.ready { "ready" } else { "not_ready" });
                tracing::debug!(ready = readiness.ready, score = readiness.score, "LND readiness");
                Ok(readiness)
            }
            Err(e) => {
                metrics::record_ln_snapshot("unavailable");
                metrics::increment_upstream_errors("lnd");
                Err(e)
            }
        }
    }

    /// Readiness for inclusion in a report; any failure degrades to `None`.
    pub async fn readiness(&self) -> Option<Readiness> {
        match self.node_readiness().await {
            Ok(readiness) => Some(readiness),
            Err(Error::LightningDisabled) => None,
            Err(e) => {
                tracing::warn!(error = %e, "LND readiness unavailable, omitting from report");
                None
            }
        }
    }

    pub async fn check(&self, address: &str, network: Network) -> Result<OnchainCheck> {
        let onchain = self.onchain(address, network).await?;
        let consolidation_plan = self.plan_for(&onchain);
        Ok(OnchainCheck {
            onchain,
            consolidation_plan,
        })
    }

    /// Full report. Lightning readiness is attached when it is enabled and
    /// reachable.
    pub async fn report(&self, address: &str, network: Network) -> Result<Report> {
        let onchain = self.onchain(address, network).await?;
        let plan = self.plan_for(&onchain);
        let ln = self.readiness().await;
        Ok(compose_report(onchain, plan, ln))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExplorerSettings;
    use crate::planner::PlanOutcome;
    use crate::test_support::spawn_mock;
    use crate::types::SourceMode;
    use axum::{routing::get, Json, Router};
    use serde_json::json;

    async fn explorer_checker(fee_fallback: u64, fee_low: u64) -> Checker {
        let app = Router::new().route(
            "/address/{address}/utxo",
            get(|| async {
                let utxos: Vec<_> = (0..12)
                    .map(|i| json!({"txid": format!("{:02x}", i), "vout": 0, "value": if i == 0 { 500 } else { 40_000 }, "status": {"confirmed": true, "block_height": 800_000 + i}}))
                    .collect();
                Json(json!(utxos))
            }),
        );
        let base = spawn_mock(app).await;
        let backend = UtxoBackend::Explorer(ExplorerClient::new(
            reqwest::Client::new(),
            ExplorerSettings {
                mainnet_url: base.clone(),
                testnet_url: base,
            },
        ));
        Checker::new(backend, Network::Testnet, fee_fallback, fee_low)
    }

    async fn unreachable_base() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_check_scores_and_plans() {
        let checker = explorer_checker(3, 5).await;
        let check = checker.check("tb1qmock", Network::Testnet).await.unwrap();

        assert_eq!(check.onchain.mode, SourceMode::Explorer);
        assert_eq!(check.onchain.num_utxos, 12);
        assert_eq!(check.onchain.dust_utxos, 1);
        assert_eq!(check.onchain.fee_rate_sat_vb, 3);
        // 12 outputs and dust: pressure 2, fee 3 <= low 5
        assert_eq!(check.consolidation_plan.outcome, PlanOutcome::ConsolidateNow);
        assert_eq!(check.consolidation_plan.fee_low_sat_vb, 5);
    }

    #[tokio::test]
    async fn test_report_without_lightning() {
        let checker = explorer_checker(10, 2).await;
        assert!(!checker.lightning_enabled());

        let report = checker.report("tb1qmock", Network::Testnet).await.unwrap();
        assert!(report.ln_readiness.is_none());
        assert!(report.sovereignty_summary.contains("Plan: WAIT"));
        assert!(report.sovereignty_summary.ends_with("LN: n/a"));
    }

    #[tokio::test]
    async fn test_report_with_lightning() {
        let lnd_app = Router::new().route(
            "/v1/getinfo",
            get(|| async { Json(json!({"synced_to_chain": true, "num_peers": 3, "num_active_channels": 0})) }),
        );
        let lnd_base = spawn_mock(lnd_app).await;
        let lnd = LndClient::with_macaroon(&lnd_base, b"mac", reqwest::Client::new());
        let checker = explorer_checker(2, 2).await.with_lightning(Lightning::Client(lnd));

        let report = checker.report("tb1qmock", Network::Testnet).await.unwrap();
        let ln = report.ln_readiness.unwrap();
        assert!(ln.ready);
        assert_eq!(ln.score, 85);
        assert!(report.sovereignty_summary.ends_with("LN: READY (85/100)"));
    }

    #[tokio::test]
    async fn test_lightning_failure_degrades() {
        let lnd = LndClient::with_macaroon(&unreachable_base().await, b"mac", reqwest::Client::new());
        let checker = explorer_checker(2, 2).await.with_lightning(Lightning::Client(lnd));

        assert!(checker.node_readiness().await.unwrap_err().is_upstream());
        let report = checker.report("tb1qmock", Network::Testnet).await.unwrap();
        assert!(report.ln_readiness.is_none());
        assert_eq!(report.onchain.num_utxos, 12);
    }

    #[tokio::test]
    async fn test_lightning_disabled_and_unavailable() {
        let checker = explorer_checker(2, 2).await;
        assert!(matches!(checker.node_readiness().await, Err(Error::LightningDisabled)));

        let checker = checker.with_lightning(Lightning::Unavailable("no macaroon".to_string()));
        assert!(checker.lightning_enabled());
        assert!(matches!(checker.node_readiness().await, Err(Error::LightningUnavailable(_))));
        assert!(checker.readiness().await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_address_rejected_before_fetch() {
        let backend = UtxoBackend::Explorer(ExplorerClient::new(
            reqwest::Client::new(),
            ExplorerSettings {
                mainnet_url: unreachable_base().await,
                testnet_url: unreachable_base().await,
            },
        ));
        let checker = Checker::new(backend, Network::Testnet, 2, 2);

        let err = checker
            .onchain("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq", Network::Testnet)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));

        let err = checker.onchain("tb1qmock", Network::Testnet).await.unwrap_err();
        assert!(err.is_upstream());
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.node_only = true;
        settings.lnd.enabled = true;

        let checker = Checker::from_settings(&settings).unwrap();
        assert_eq!(checker.backend.mode(), SourceMode::NodeOnly);
        assert!(matches!(checker.lightning, Lightning::Unavailable(_)));
        assert_eq!(checker.default_network(), Network::Testnet);
    }
}
