// Sources Module - Upstream Collaborators
//
// Everything that leaves the process lives here:
// - explorer: Esplora-style REST UTXO lookups
// - bitcoind: JSON-RPC listunspent / estimatesmartfee (node-only mode)
// - lnd: LND REST getinfo
// - http: shared outbound client (timeouts, Tor, TLS toggle)

pub mod bitcoind;
pub mod explorer;
pub mod http;
pub mod lnd;

pub use bitcoind::BitcoindRpc;
pub use explorer::ExplorerClient;
pub use http::build_http_client;
pub use lnd::LndClient;

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::{Network, SourceMode};
use crate::utxo::Utxo;

const MAX_ADDRESS_LEN: usize = 128;

/// Where UTXOs (and the fee rate) come from for an evaluation
#[derive(Debug, Clone)]
pub enum UtxoBackend {
    Explorer(ExplorerClient),
    Node {
        rpc: BitcoindRpc,
        fee_target_blocks: u32,
    },
}

/// UTXO set plus the fee rate it should be scored at
#[derive(Debug, Clone)]
pub struct Fetched {
    pub utxos: Vec<Utxo>,
    pub fee_rate_sat_vb: u64,
    pub mode: SourceMode,
}

impl UtxoBackend {
    pub fn mode(&self) -> SourceMode {
        match self {
            UtxoBackend::Explorer(_) => SourceMode::Explorer,
            UtxoBackend::Node { .. } => SourceMode::NodeOnly,
        }
    }

    pub fn source_label(&self) -> &'static str {
        match self {
            UtxoBackend::Explorer(_) => "explorer",
            UtxoBackend::Node { .. } => "bitcoind",
        }
    }

    /// Fetch the UTXO set. The explorer path has no fee estimate and always
    /// scores at `fee_fallback`; the node path asks `estimatesmartfee` first.
    pub async fn fetch(&self, address: &str, network: Network, fee_fallback: u64) -> Result<Fetched> {
        match self {
            UtxoBackend::Explorer(explorer) => {
                let utxos = explorer.fetch_utxos(address, network).await?;
                Ok(Fetched {
                    utxos,
                    fee_rate_sat_vb: fee_fallback,
                    mode: SourceMode::Explorer,
                })
            }
            UtxoBackend::Node { rpc, fee_target_blocks } => {
                let utxos = rpc.utxos_for_address(address).await?;
                let fee_rate_sat_vb = rpc.fee_rate_or(*fee_target_blocks, fee_fallback).await;
                Ok(Fetched {
                    utxos,
                    fee_rate_sat_vb,
                    mode: SourceMode::NodeOnly,
                })
            }
        }
    }
}

/// Reject obviously malformed addresses and network mismatches before any
/// upstream call.
///
/// Addresses the `bitcoin` crate cannot parse (e.g. newer encodings) are
/// passed through and left for the upstream to judge.
pub fn validate_address(address: &str, network: Network) -> Result<()> {
    if address.is_empty() {
        return Err(Error::InvalidAddress("address is empty".to_string()));
    }
    if address.len() > MAX_ADDRESS_LEN {
        return Err(Error::InvalidAddress("address is too long".to_string()));
    }
    if !address.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::InvalidAddress(format!("unexpected characters in {}", address)));
    }

    if let Ok(parsed) = bitcoin::Address::from_str(address) {
        let is_mainnet = parsed.network == bitcoin::Network::Bitcoin;
        let wants_mainnet = network == Network::Mainnet;
        if is_mainnet != wants_mainnet {
            return Err(Error::InvalidAddress(format!(
                "{} is not a {} address",
                address, network
            )));
        }
    }

    Ok(())
}
