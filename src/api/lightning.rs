// Lightning Endpoint
//
// GET /lnready: 400 when LND is disabled, 502 when it is enabled but cannot
// be queried.

use axum::{Extension, Json};
use std::sync::Arc;

use super::helpers::{bad_gateway, bad_request, track, ApiResult, MSG_LND_DISABLED, MSG_LND_UNAVAILABLE};
use crate::checker::Checker;
use crate::error::Error;
use crate::lightning::Readiness;

pub async fn ln_ready(Extension(checker): Extension<Arc<Checker>>) -> ApiResult<Readiness> {
    let result = match checker.node_readiness().await {
        Ok(readiness) => Ok(Json(readiness)),
        Err(Error::LightningDisabled) => Err(bad_request(MSG_LND_DISABLED)),
        Err(e) => {
            tracing::warn!(error = %e, "LND getinfo failed");
            Err(bad_gateway(MSG_LND_UNAVAILABLE))
        }
    };
    track("/lnready", result)
}
