// bitcoind JSON-RPC client (node-only mode)
//
// Only two calls are needed: `listunspent` filtered to one address and
// `estimatesmartfee`. The address must be imported into the node's wallet
// for `listunspent` to see it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::RpcSettings;
use crate::constants::{LISTUNSPENT_MAX_CONF, LISTUNSPENT_MIN_CONF};
use crate::error::{truncate_body, Error, Result};
use crate::fee_calculation::effective_fee_rate;
use crate::metrics;
use crate::utxo::{NodeUnspent, Utxo, UtxoRecords};

const RPC_ID: &str = "sovereign-checker";
const ERROR_BODY_LIMIT: usize = 1024;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: &'static str,
    method: &'a str,
    params: Vec<Value>,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// `estimatesmartfee` result; `feerate` is BTC/kvB and absent on error
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SmartFeeEstimate {
    #[serde(default)]
    pub feerate: Option<f64>,
    #[serde(default)]
    pub blocks: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BitcoindRpc {
    url: String,
    user: String,
    pass: String,
    client: reqwest::Client,
}

impl BitcoindRpc {
    pub fn new(client: reqwest::Client, settings: &RpcSettings) -> Self {
        Self {
            url: settings.url.clone(),
            user: settings.user.clone(),
            pass: settings.pass.clone(),
            client,
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &'static str, params: Vec<Value>) -> Result<T> {
        let request = RpcRequest {
            jsonrpc: "1.0",
            id: RPC_ID,
            method,
            params,
        };

        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.user, Some(&self.pass))
            .json(&request)
            .send()
            .await?;

        // bitcoind answers RPC errors with HTTP 500 and a JSON body, and auth
        // failures with 401 and no body.
        let status = response.status();
        let body = response.text().await?;
        let parsed: RpcResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(Error::UpstreamStatus {
                    service: "bitcoind",
                    status: status.as_u16(),
                    body: truncate_body(&body, ERROR_BODY_LIMIT),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(err) = parsed.error {
            return Err(Error::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        let result = parsed.result.ok_or(Error::EmptyRpcResult(method))?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn list_unspent(&self, min_conf: u32, max_conf: u32, addresses: &[&str]) -> Result<Vec<NodeUnspent>> {
        self.call("listunspent", vec![json!(min_conf), json!(max_conf), json!(addresses)])
            .await
    }

    pub async fn estimate_smart_fee(&self, conf_target: u32) -> Result<SmartFeeEstimate> {
        self.call("estimatesmartfee", vec![json!(conf_target)]).await
    }

    pub async fn utxos_for_address(&self, address: &str) -> Result<Vec<Utxo>> {
        let items = self
            .list_unspent(LISTUNSPENT_MIN_CONF, LISTUNSPENT_MAX_CONF, &[address])
            .await?;
        tracing::debug!(records = items.len(), "Fetched UTXOs from bitcoind");
        Ok(UtxoRecords::Node(items).normalize())
    }

    /// Node fee estimate in sat/vB, or `fallback` when the node has none.
    ///
    /// Never fails: an unavailable estimate is not an error for the caller.
    pub async fn fee_rate_or(&self, conf_target: u32, fallback: u64) -> u64 {
        let estimate = match self.estimate_smart_fee(conf_target).await {
            Ok(est) => {
                if !est.errors.is_empty() {
                    tracing::debug!(errors = ?est.errors, "estimatesmartfee reported errors");
                }
                est.feerate
            }
            Err(e) => {
                tracing::warn!(error = %e, "estimatesmartfee failed, using fallback fee rate");
                metrics::increment_upstream_errors("bitcoind");
                None
            }
        };

        if !matches!(estimate, Some(rate) if rate > 0.0) {
            metrics::increment_fee_fallbacks();
        }
        effective_fee_rate(estimate, fallback)
    }
}
