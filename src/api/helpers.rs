// API Helper Functions
//
// Shared error responses and request accounting for the handlers.

use axum::{http::StatusCode, Json};

use super::types::ErrorBody;
use crate::error::Error;
use crate::metrics;

pub const MSG_MISSING_ADDRESS: &str = "missing address";
pub const MSG_FETCH_FAILED: &str = "failed to fetch utxos";
pub const MSG_LND_DISABLED: &str = "lnd not enabled";
pub const MSG_LND_UNAVAILABLE: &str = "lnd not configured or unavailable";

/// Standard error result type for API handlers
pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorBody>)>;

pub type ApiError = (StatusCode, Json<ErrorBody>);

/// Helper to create a 400 Bad Request error response
pub fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message)))
}

/// Helper to create a 502 Bad Gateway error response
pub fn bad_gateway(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_GATEWAY, Json(ErrorBody::new(message)))
}

/// Helper to create a 500 Internal Server Error response
pub fn internal_error(message: impl Into<String>) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(message)))
}

/// Map an evaluation failure to a response. Upstream details stay in the
/// logs; the client only sees the generic message.
pub fn evaluation_error(err: &Error) -> ApiError {
    match err {
        Error::InvalidAddress(reason) => bad_request(format!("invalid address: {}", reason)),
        e if e.is_upstream() => bad_gateway(MSG_FETCH_FAILED),
        e => internal_error(e.to_string()),
    }
}

/// Count the request in `sovereign_http_requests_total` and pass it through.
pub fn track<T>(endpoint: &str, result: ApiResult<T>) -> ApiResult<T> {
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err((status, _)) => *status,
    };
    metrics::record_http_request(endpoint, status.as_u16());
    result
}
