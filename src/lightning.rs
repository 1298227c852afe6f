//! # Lightning Readiness
//!
//! Maps an LND `getinfo` snapshot to a 0-100 readiness score.
//!
//! Base 50: chain sync +25 / -25, peers +10 / -10, active channels +15.
//! A node is "ready" when it is synced to chain and has at least one peer.
//! Channels only move the score.

use serde::{Deserialize, Serialize};

use crate::constants::BASE_SCORE;
use crate::score::clamp_score;

pub const REASON_NOT_SYNCED: &str = "LND not synced to chain";
pub const REASON_NO_PEERS: &str = "No peers connected";
pub const REASON_NO_CHANNELS: &str =
    "No active channels (opening a channel required for most outgoing LN payments)";

/// Subset of LND's `GET /v1/getinfo` response
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeInfoSnapshot {
    #[serde(default)]
    pub identity_pubkey: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub block_height: u32,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub num_active_channels: u32,
    #[serde(default)]
    pub num_peers: u32,
    #[serde(default)]
    pub synced_to_chain: bool,
    #[serde(default)]
    pub synced_to_graph: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    pub ready: bool,
    pub score: u8,
    pub reasons: Vec<String>,
    pub info: NodeInfoSnapshot,
}

pub fn compute_readiness(info: NodeInfoSnapshot) -> Readiness {
    let mut score = BASE_SCORE;
    let mut reasons = Vec::new();

    if info.synced_to_chain {
        score += 25;
    } else {
        score -= 25;
        reasons.push(REASON_NOT_SYNCED.to_string());
    }

    if info.num_peers > 0 {
        score += 10;
    } else {
        score -= 10;
        reasons.push(REASON_NO_PEERS.to_string());
    }

    if info.num_active_channels > 0 {
        score += 15;
    } else {
        reasons.push(REASON_NO_CHANNELS.to_string());
    }

    Readiness {
        ready: info.synced_to_chain && info.num_peers > 0,
        score: clamp_score(score),
        reasons,
        info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(synced: bool, peers: u32, channels: u32) -> NodeInfoSnapshot {
        NodeInfoSnapshot {
            identity_pubkey: "02abc".to_string(),
            alias: "test-node".to_string(),
            block_height: 2_500_000,
            version: "0.17.0-beta".to_string(),
            num_active_channels: channels,
            num_peers: peers,
            synced_to_chain: synced,
            synced_to_graph: synced,
        }
    }

    #[test]
    fn test_fully_ready() {
        let r = compute_readiness(snapshot(true, 4, 2));
        assert!(r.ready);
        assert_eq!(r.score, 100);
        assert!(r.reasons.is_empty());
    }

    #[test]
    fn test_ready_without_channels() {
        let r = compute_readiness(snapshot(true, 3, 0));
        assert!(r.ready);
        assert_eq!(r.score, 85);
        assert_eq!(r.reasons, vec![REASON_NO_CHANNELS.to_string()]);
    }

    #[test]
    fn test_nothing_working() {
        let r = compute_readiness(snapshot(false, 0, 0));
        assert!(!r.ready);
        assert_eq!(r.score, 15);
        assert_eq!(r.reasons.len(), 3);
    }

    #[test]
    fn test_ready_iff_synced_and_peers() {
        for synced in [false, true] {
            for peers in [0u32, 1, 8] {
                for channels in [0u32, 1, 5] {
                    let r = compute_readiness(snapshot(synced, peers, channels));
                    assert_eq!(r.ready, synced && peers > 0);
                    assert!(r.score <= 100);
                }
            }
        }
    }

    #[test]
    fn test_parses_lnd_getinfo() {
        let body = r#"{
            "identity_pubkey": "03deadbeef",
            "alias": "alice",
            "num_pending_channels": 0,
            "num_active_channels": 1,
            "num_inactive_channels": 0,
            "num_peers": 2,
            "block_height": 840000,
            "block_hash": "0000",
            "synced_to_chain": true,
            "synced_to_graph": false,
            "testnet": false,
            "version": "0.17.4-beta"
        }"#;
        let info: NodeInfoSnapshot = serde_json::from_str(body).unwrap();
        assert_eq!(info.num_peers, 2);
        assert_eq!(info.block_height, 840000);
        assert!(compute_readiness(info).ready);
    }
}
