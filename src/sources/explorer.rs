// Esplora-style block explorer client
//
// GET {base}/address/{address}/utxo

use crate::config::ExplorerSettings;
use crate::error::{truncate_body, Error, Result};
use crate::types::Network;
use crate::utxo::{ExplorerUtxo, Utxo, UtxoRecords};

const ERROR_BODY_LIMIT: usize = 1024;

#[derive(Debug, Clone)]
pub struct ExplorerClient {
    client: reqwest::Client,
    settings: ExplorerSettings,
}

impl ExplorerClient {
    pub fn new(client: reqwest::Client, settings: ExplorerSettings) -> Self {
        Self { client, settings }
    }

    pub fn utxo_url(&self, address: &str, network: Network) -> String {
        format!(
            "{}/address/{}/utxo",
            self.settings.base_url(network).trim_end_matches('/'),
            address
        )
    }

    pub async fn fetch_utxos(&self, address: &str, network: Network) -> Result<Vec<Utxo>> {
        let url = self.utxo_url(address, network);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamStatus {
                service: "explorer",
                status: status.as_u16(),
                body: truncate_body(&body, ERROR_BODY_LIMIT),
            });
        }

        let body = response.text().await?;
        let records: Vec<ExplorerUtxo> = serde_json::from_str(&body)?;

        tracing::debug!(%network, records = records.len(), "Fetched UTXOs from explorer");

        Ok(UtxoRecords::Explorer(records).normalize())
    }
}
