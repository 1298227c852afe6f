// API Type Definitions
//
// Serializable request/response types shared by the HTTP handlers. Report
// bodies themselves are the library types (`Report`, `OnchainCheck`,
// `Readiness`).

use serde::{Deserialize, Serialize};

/// `?address=...&network=...`
#[derive(Deserialize, Debug, Clone, Default)]
pub struct AddressQuery {
    pub address: Option<String>,
    pub network: Option<String>,
}

impl AddressQuery {
    /// Trimmed address, `None` when missing or blank
    pub fn address(&self) -> Option<&str> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

// ========== Errors ==========

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorBody {
            error: ErrorDetail {
                message: message.into(),
            },
        }
    }
}
