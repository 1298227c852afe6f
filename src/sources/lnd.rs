// LND REST client
//
// Only `GET /v1/getinfo` is used. Authentication is the macaroon, hex
// encoded, in the `Grpc-Metadata-macaroon` header. LND's REST listener uses
// a self-signed certificate by default, hence the separate TLS toggle.

use std::time::Duration;

use crate::config::LndSettings;
use crate::error::{truncate_body, Error, Result};
use crate::lightning::NodeInfoSnapshot;
use crate::sources::http::USER_AGENT;

pub const MACAROON_HEADER: &str = "Grpc-Metadata-macaroon";
const ERROR_BODY_LIMIT: usize = 2048;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct LndClient {
    base_url: String,
    macaroon_hex: String,
    client: reqwest::Client,
}

impl LndClient {
    /// Build from settings, reading the macaroon file from disk.
    pub fn new(settings: &LndSettings) -> Result<Self> {
        let path = settings
            .expanded_macaroon_path()
            .ok_or(Error::LightningDisabled)?;
        let macaroon = std::fs::read(&path)?;

        let timeout = if settings.timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            settings.timeout_secs
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(settings.insecure_tls)
            .build()?;

        tracing::debug!(url = %settings.url, macaroon = %path.display(), "LND client configured");

        Ok(Self::with_macaroon(&settings.url, &macaroon, client))
    }

    pub fn with_macaroon(base_url: &str, macaroon: &[u8], client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            macaroon_hex: hex::encode(macaroon),
            client,
        }
    }

    pub async fn get_info(&self) -> Result<NodeInfoSnapshot> {
        let url = format!("{}/v1/getinfo", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(MACAROON_HEADER, &self.macaroon_hex)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != reqwest::StatusCode::OK {
            return Err(Error::UpstreamStatus {
                service: "lnd",
                status: status.as_u16(),
                body: truncate_body(&body, ERROR_BODY_LIMIT),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
