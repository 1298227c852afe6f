// Shared value types
//
// Small enums that travel with every evaluation: which chain the address
// lives on, which data source produced the UTXO set, and where a single
// UTXO came from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bitcoin network selected for an evaluation
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }

    /// Lenient query-string parsing: unknown values fall back to `default`.
    pub fn from_query(value: Option<&str>, default: Network) -> Network {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(format!("unsupported network: {}", other)),
        }
    }
}

/// Which collaborator produced the UTXO set
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    Explorer,
    NodeOnly,
}

impl SourceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceMode::Explorer => "explorer",
            SourceMode::NodeOnly => "nodeonly",
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance tag carried by every normalized UTXO
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Explorer,
    Node,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_from_query() {
        assert_eq!(Network::from_query(Some("mainnet"), Network::Testnet), Network::Mainnet);
        assert_eq!(Network::from_query(Some("testnet"), Network::Mainnet), Network::Testnet);
        assert_eq!(Network::from_query(Some("signet"), Network::Mainnet), Network::Mainnet);
        assert_eq!(Network::from_query(None, Network::Testnet), Network::Testnet);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&SourceMode::NodeOnly).unwrap(), "\"nodeonly\"");
        assert_eq!(serde_json::to_string(&Provenance::Node).unwrap(), "\"node\"");
        assert_eq!(serde_json::to_string(&Network::Mainnet).unwrap(), "\"mainnet\"");
    }
}
