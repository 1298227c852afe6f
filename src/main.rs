//! sovereign-checker
//!
//! ```text
//! sovereign-checker --network mainnet check --address bc1q... --summary
//! sovereign-checker --node-only --rpc-user alice --rpc-pass secret check --address tb1q...
//! sovereign-checker --macaroon ~/.lnd/readonly.macaroon serve --port 8080 --lnd-enabled
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use sovereign_checker::api::start_server;
use sovereign_checker::config::{load_settings, Settings};
use sovereign_checker::metrics::init_metrics;
use sovereign_checker::telemetry::{init_tracing, TelemetryConfig};
use sovereign_checker::{Checker, Network};

#[derive(Parser, Debug)]
#[clap(name = "sovereign-checker", version)]
#[clap(about = "Bitcoin UTXO health, consolidation advice and Lightning readiness", long_about = None)]
struct Cli {
    /// Settings file (default: ./sovereign.toml if present)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(long, value_enum, global = true)]
    network: Option<Network>,

    /// Fallback fee rate in sat/vB, used when no node estimate is available
    #[clap(long, global = true)]
    feerate: Option<u64>,

    /// Low-fee threshold in sat/vB for consolidation advice
    #[clap(long, global = true)]
    feelow: Option<u64>,

    /// Tor SOCKS5 proxy, e.g. 127.0.0.1:9050
    #[clap(long, global = true)]
    tor: Option<String>,

    /// Skip TLS verification for explorer / bitcoind (dev only)
    #[clap(long, global = true)]
    insecure_tls: bool,

    /// Use bitcoind RPC instead of the block explorer. Addresses are still
    /// checked against --network (default testnet), so pass --network mainnet
    /// for a mainnet node.
    #[clap(long, global = true)]
    node_only: bool,

    #[clap(long, global = true)]
    rpc_url: Option<String>,

    #[clap(long, global = true)]
    rpc_user: Option<String>,

    #[clap(long, global = true)]
    rpc_pass: Option<String>,

    #[clap(long, global = true)]
    lnd_url: Option<String>,

    /// Path to an LND macaroon (readonly is enough)
    #[clap(long, global = true)]
    macaroon: Option<String>,

    /// Skip TLS verification for LND (self-signed certs)
    #[clap(long, global = true)]
    lnd_insecure: Option<bool>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one address and print the report as JSON
    Check {
        #[clap(long)]
        address: String,

        /// Include LND readiness
        #[clap(long)]
        lncheck: bool,

        /// Print only the one-line summary
        #[clap(long)]
        summary: bool,
    },
    /// Run the HTTP API
    Serve {
        #[clap(long)]
        port: Option<u16>,

        #[clap(long)]
        lnd_enabled: bool,
    },
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(network) = self.network {
            settings.network = network;
        }
        if let Some(rate) = self.feerate {
            settings.fee_fallback_sat_vb = rate;
        }
        if let Some(rate) = self.feelow {
            settings.fee_low_sat_vb = rate;
        }
        if let Some(tor) = &self.tor {
            settings.http.tor_socks5 = Some(tor.clone());
        }
        if self.insecure_tls {
            settings.http.insecure_tls = true;
        }
        if self.node_only {
            settings.node_only = true;
        }
        if let Some(url) = &self.rpc_url {
            settings.rpc.url = url.clone();
        }
        if let Some(user) = &self.rpc_user {
            settings.rpc.user = user.clone();
        }
        if let Some(pass) = &self.rpc_pass {
            settings.rpc.pass = pass.clone();
        }
        if let Some(url) = &self.lnd_url {
            settings.lnd.url = url.clone();
        }
        if let Some(path) = &self.macaroon {
            settings.lnd.macaroon_path = Some(path.clone());
        }
        if let Some(insecure) = self.lnd_insecure {
            settings.lnd.insecure_tls = insecure;
        }

        match &self.command {
            Command::Check { lncheck, .. } => {
                if *lncheck {
                    settings.lnd.enabled = true;
                }
            }
            Command::Serve { port, lnd_enabled } => {
                if let Some(port) = port {
                    settings.server.port = *port;
                }
                if *lnd_enabled {
                    settings.lnd.enabled = true;
                }
            }
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = load_settings(cli.config.as_deref())?;
    cli.apply(&mut settings);

    let checker = Checker::from_settings(&settings)?;

    match cli.command {
        Command::Check { address, summary, .. } => {
            let report = checker.report(address.trim(), settings.network).await?;
            if summary {
                println!("{}", report.sovereignty_summary);
            } else {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Command::Serve { .. } => {
            init_metrics()?;
            start_server(Arc::new(checker), settings.server.port).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _guard = match init_tracing(TelemetryConfig::default()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "sovereign-checker failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
