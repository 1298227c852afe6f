//! # UTXO Normalization
//!
//! Converts the raw records returned by either data source into the one
//! canonical [`Utxo`] the scorer and planner work with.
//!
//! ## Sources
//!
//! - Explorer (Esplora REST): values are already integer satoshis, block
//!   height is reported for confirmed outputs.
//! - Node (`listunspent`): values are decimal BTC amounts and no block height
//!   is returned, only a confirmation count.
//!
//! ## Precision
//!
//! Node amounts are converted exactly once, here. The conversion works on the
//! decimal text of the amount (fixed point, 8 fractional digits) and truncates
//! anything beyond the 8th digit toward zero. That truncation is the only
//! accepted precision loss. Amounts that are not plain decimals (exponent
//! notation) fall back to a float multiply, which is lossy and logged.

use bitcoin::{Amount, Denomination};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::constants::SATS_PER_BTC;
use crate::types::Provenance;

/// Canonical unspent output. Immutable once built.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    pub txid: String,
    pub vout: u32,
    pub value_sats: u64,
    pub confirmed: bool,
    /// `None` when the source cannot tell (node-sourced or unconfirmed)
    pub block_height: Option<u32>,
    pub source: Provenance,
}

/// `GET /address/{address}/utxo` record
#[derive(Deserialize, Debug, Clone)]
pub struct ExplorerUtxo {
    pub txid: String,
    pub vout: u32,
    pub value: u64,
    #[serde(default)]
    pub status: ExplorerStatus,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ExplorerStatus {
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub block_height: Option<u32>,
}

/// `listunspent` item
#[derive(Deserialize, Debug, Clone)]
pub struct NodeUnspent {
    pub txid: String,
    pub vout: u32,
    #[serde(default)]
    pub address: Option<String>,
    pub amount: Number,
    #[serde(default)]
    pub confirmations: i64,
    #[serde(default)]
    pub spendable: bool,
    #[serde(default)]
    pub solvable: bool,
}

/// Source-tagged record batch, the ingestion boundary for normalization
#[derive(Debug, Clone)]
pub enum UtxoRecords {
    Explorer(Vec<ExplorerUtxo>),
    Node(Vec<NodeUnspent>),
}

impl UtxoRecords {
    /// Normalize every record, preserving source order.
    pub fn normalize(self) -> Vec<Utxo> {
        match self {
            UtxoRecords::Explorer(records) => records.into_iter().map(Utxo::from).collect(),
            UtxoRecords::Node(records) => records.into_iter().map(Utxo::from).collect(),
        }
    }
}

impl From<ExplorerUtxo> for Utxo {
    fn from(record: ExplorerUtxo) -> Self {
        Utxo {
            txid: record.txid,
            vout: record.vout,
            value_sats: record.value,
            confirmed: record.status.confirmed,
            block_height: record.status.block_height,
            source: Provenance::Explorer,
        }
    }
}

impl From<NodeUnspent> for Utxo {
    fn from(record: NodeUnspent) -> Self {
        Utxo {
            value_sats: btc_to_sats(&record.amount),
            txid: record.txid,
            vout: record.vout,
            confirmed: record.confirmations > 0,
            block_height: None,
            source: Provenance::Node,
        }
    }
}

/// Convert a node-reported BTC amount to satoshis, truncating toward zero.
pub fn btc_to_sats(amount: &Number) -> u64 {
    let text = amount.to_string();
    if let Some(sats) = decimal_btc_to_sats(&text) {
        return sats;
    }

    let btc = amount.as_f64().unwrap_or(0.0);
    if btc < 0.0 {
        tracing::warn!(amount = %text, "Negative amount, counting as 0 sats");
        return 0;
    }

    let lossy = btc * SATS_PER_BTC as f64;
    tracing::warn!(amount = %text, "Amount is not a plain decimal, using float conversion");
    if lossy.is_finite() && lossy > 0.0 {
        lossy.trunc() as u64
    } else {
        0
    }
}

/// Fixed-point parse of a plain decimal BTC string.
///
/// Digits past the 8th fractional place are dropped. Returns `None` for
/// negative values, exponent notation and anything `Amount` rejects.
pub fn decimal_btc_to_sats(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.starts_with('-') || text.contains(|c| c == 'e' || c == 'E') {
        return None;
    }

    let truncated = match text.split_once('.') {
        Some((whole, frac)) if frac.len() > 8 => format!("{}.{}", whole, frac.get(..8)?),
        _ => text.to_string(),
    };

    Amount::from_str_in(&truncated, Denomination::Bitcoin)
        .ok()
        .map(|amount| amount.as_sat())
}
