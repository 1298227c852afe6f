// On-Chain Evaluation Endpoints
//
// GET /check and GET /report. Both take `address` (required) and `network`
// (optional, unknown values fall back to the configured network).

use axum::{extract::Query, Extension, Json};
use std::sync::Arc;

use super::helpers::{bad_request, evaluation_error, track, ApiResult, MSG_MISSING_ADDRESS};
use super::types::AddressQuery;
use crate::checker::Checker;
use crate::report::{OnchainCheck, Report};
use crate::types::Network;

fn resolve(query: &AddressQuery, checker: &Checker) -> Option<(String, Network)> {
    let address = query.address()?.to_string();
    let network = Network::from_query(query.network.as_deref(), checker.default_network());
    Some((address, network))
}

/// GET /check
/// Score and consolidation plan, no Lightning.
pub async fn check(
    Extension(checker): Extension<Arc<Checker>>,
    Query(query): Query<AddressQuery>,
) -> ApiResult<OnchainCheck> {
    let Some((address, network)) = resolve(&query, &checker) else {
        return track("/check", Err(bad_request(MSG_MISSING_ADDRESS)));
    };
    let result = checker
        .check(&address, network)
        .await
        .map(Json)
        .map_err(|e| evaluation_error(&e));
    track("/check", result)
}

/// GET /report
/// Full report with summary line; includes `ln_readiness` when LND is
/// enabled and reachable.
pub async fn report(
    Extension(checker): Extension<Arc<Checker>>,
    Query(query): Query<AddressQuery>,
) -> ApiResult<Report> {
    let Some((address, network)) = resolve(&query, &checker) else {
        return track("/report", Err(bad_request(MSG_MISSING_ADDRESS)));
    };
    let result = checker
        .report(&address, network)
        .await
        .map(Json)
        .map_err(|e| evaluation_error(&e));
    track("/report", result)
}
