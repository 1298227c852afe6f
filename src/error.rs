// Error types for the collaborators and front ends.
//
// The scoring engine itself never fails; everything here comes from talking
// to an explorer, a node, LND, or from loading configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned status {status}: {body}")]
    UpstreamStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("bitcoind rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("bitcoind rpc returned no result for {0}")]
    EmptyRpcResult(&'static str),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("lightning checks are not configured")]
    LightningDisabled,

    #[error("lightning node unavailable: {0}")]
    LightningUnavailable(String),
}

impl Error {
    /// Whether the failure came from an upstream service rather than the caller
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::UpstreamStatus { .. }
                | Error::Rpc { .. }
                | Error::EmptyRpcResult(_)
                | Error::Decode(_)
                | Error::LightningUnavailable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Cut an upstream body down to `limit` bytes on a char boundary.
pub fn truncate_body(body: &str, limit: usize) -> String {
    if body.len() <= limit {
        return body.to_string();
    }
    let mut end = limit;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}
