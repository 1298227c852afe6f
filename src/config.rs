// Layered settings
//
// Defaults, then an optional TOML file, then SOVEREIGN_* environment
// variables (nested keys use `__`, e.g. SOVEREIGN_RPC__USER). CLI flags are
// applied on top by the binary.

pub use config::{Config, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_FEE_TARGET_BLOCKS;
use crate::error::Result;
use crate::types::Network;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_NAME: &str = "sovereign";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub network: Network,
    pub fee_fallback_sat_vb: u64,
    pub fee_low_sat_vb: u64,
    pub fee_target_blocks: u32,
    pub node_only: bool,
    pub explorer: ExplorerSettings,
    pub http: HttpSettings,
    pub rpc: RpcSettings,
    pub lnd: LndSettings,
    pub server: ServerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            fee_fallback_sat_vb: 2,
            fee_low_sat_vb: 2,
            fee_target_blocks: DEFAULT_FEE_TARGET_BLOCKS,
            node_only: false,
            explorer: ExplorerSettings::default(),
            http: HttpSettings::default(),
            rpc: RpcSettings::default(),
            lnd: LndSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplorerSettings {
    pub mainnet_url: String,
    pub testnet_url: String,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            mainnet_url: "https://blockstream.info/api".to_string(),
            testnet_url: "https://blockstream.info/testnet/api".to_string(),
        }
    }
}

impl ExplorerSettings {
    pub fn base_url(&self, network: Network) -> &str {
        match network {
            Network::Mainnet => &self.mainnet_url,
            Network::Testnet => &self.testnet_url,
        }
    }
}

/// Outbound HTTP used for the explorer and bitcoind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// SOCKS5 address of a Tor daemon, e.g. 127.0.0.1:9050
    pub tor_socks5: Option<String>,
    /// Skip TLS verification (dev only)
    pub insecure_tls: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            connect_timeout_secs: 10,
            tor_socks5: None,
            insecure_tls: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RpcSettings {
    pub url: String,
    pub user: String,
    pub pass: String,
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:18332".to_string(),
            user: String::new(),
            pass: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LndSettings {
    pub enabled: bool,
    pub url: String,
    pub macaroon_path: Option<String>,
    pub insecure_tls: bool,
    pub timeout_secs: u64,
}

impl Default for LndSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "https://127.0.0.1:8080".to_string(),
            macaroon_path: None,
            insecure_tls: true,
            timeout_secs: 10,
        }
    }
}

impl LndSettings {
    /// Macaroon path with `~` and env vars expanded
    pub fn expanded_macaroon_path(&self) -> Option<PathBuf> {
        self.macaroon_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
    }

    /// Enabled and has everything needed to build a client
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.url.is_empty() && self.expanded_macaroon_path().is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Load settings from an explicit file (required) or `sovereign.toml` (optional).
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let file = match path {
        Some(p) => ConfigFile::from(p).required(true),
        None => ConfigFile::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let settings = Config::builder()
        .add_source(file)
        .add_source(Environment::with_prefix("SOVEREIGN").separator("__"))
        .build()?
        .try_deserialize::<Settings>()?;

    Ok(settings)
}
