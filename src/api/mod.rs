// API Module - HTTP Front End
//
// One submodule per concern:
// - status: /health, /metrics
// - onchain: /check, /report
// - lightning: /lnready
//
// The shared `Checker` is injected with an `Extension` layer.

pub mod helpers;
pub mod lightning;
pub mod onchain;
pub mod status;
pub mod types;


pub use helpers::*;
pub use lightning::*;
pub use onchain::*;
pub use status::*;
pub use types::*;

use axum::{http::Method, routing::get, Extension, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::checker::Checker;

pub fn router(checker: Arc<Checker>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/health", get(health))
        .route("/check", get(check))
        .route("/report", get(report))
        .route("/lnready", get(ln_ready))
        .route("/metrics", get(metrics_handler))
        .layer(Extension(checker))
        .layer(cors)
}

/// Bind 0.0.0.0:`port` and serve until the process is stopped.
pub async fn start_server(checker: Arc<Checker>, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        network = %checker.default_network(),
        lightning = checker.lightning_enabled(),
        "Sovereignty checker listening"
    );

    axum::serve(listener, router(checker)).await
}
