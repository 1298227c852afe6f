// Shared outbound HTTP client for the explorer and bitcoind.
//
// Optionally routed through a Tor SOCKS5 proxy. `socks5h` makes the proxy
// resolve hostnames so DNS does not leak outside Tor.

use std::time::Duration;

use crate::config::HttpSettings;
use crate::error::Result;

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const USER_AGENT: &str = concat!("sovereign-checker/", env!("CARGO_PKG_VERSION"));

pub fn build_http_client(settings: &HttpSettings) -> Result<reqwest::Client> {
    let timeout = non_zero_or(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
    let connect_timeout = non_zero_or(settings.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);

    let mut builder = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .connect_timeout(Duration::from_secs(connect_timeout))
        .user_agent(USER_AGENT)
        .danger_accept_invalid_certs(settings.insecure_tls);

    if let Some(proxy_url) = tor_proxy_url(settings) {
        tracing::info!(proxy = %proxy_url, "Routing outbound HTTP through SOCKS5 proxy");
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    }

    if settings.insecure_tls {
        tracing::warn!("TLS certificate verification disabled for outbound HTTP");
    }

    Ok(builder.build()?)
}

fn tor_proxy_url(settings: &HttpSettings) -> Option<String> {
    settings
        .tor_socks5
        .as_deref()
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(|addr| format!("socks5h://{}", addr))
}

fn non_zero_or(value: u64, default: u64) -> u64 {
    if value == 0 {
        default
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tor_proxy_url() {
        let mut settings = HttpSettings::default();
        assert_eq!(tor_proxy_url(&settings), None);

        settings.tor_socks5 = Some(" ".to_string());
        assert_eq!(tor_proxy_url(&settings), None);

        settings.tor_socks5 = Some("127.0.0.1:9050".to_string());
        assert_eq!(tor_proxy_url(&settings).as_deref(), Some("socks5h://127.0.0.1:9050"));
    }

    #[test]
    fn test_build_with_proxy() {
        let settings = HttpSettings {
            tor_socks5: Some("127.0.0.1:9150".to_string()),
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(build_http_client(&settings).is_ok());
    }

    #[test]
    fn test_zero_timeouts_use_defaults() {
        assert_eq!(non_zero_or(0, DEFAULT_TIMEOUT_SECS), 15);
        assert_eq!(non_zero_or(30, DEFAULT_TIMEOUT_SECS), 30);
    }
}
