//! Veri API - HTTP service exposing the trust scoring engine.
//!
//! Thin presentation boundary over [`veri_engine::TrustEngine`]: request
//! framing, CORS for the dashboard frontend, and error-to-status mapping.
//! All domain logic lives in the engine crate.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod routes;

use anyhow::Result;
use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use veri_common::config::Config;
use veri_engine::TrustEngine;

/// Shared API service state
pub struct ApiState {
    /// Configuration
    pub config: Config,
    /// The trust scoring engine
    pub engine: TrustEngine,
}

/// The VeriCore API service
pub struct ApiService {
    state: Arc<ApiState>,
}

impl ApiService {
    /// Create a new API service from validated configuration.
    pub fn new(config: Config) -> veri_common::Result<Self> {
        let engine = TrustEngine::from_config(&config.oracle)?;
        Ok(Self {
            state: Arc::new(ApiState { config, engine }),
        })
    }

    /// Start the HTTP server; runs until the process is stopped.
    pub async fn start(self) -> Result<()> {
        let host = self.state.config.service.host.clone();
        let port = self.state.config.service.port;

        let app = router(self.state.clone());

        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        tracing::info!(address = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Build the application router.
pub fn router(state: Arc<ApiState>) -> Router {
    let cors = cors_layer(&state.config.service.cors_origins);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/v1/analyze", post(routes::analyze))
        .route("/api/v1/classify", post(routes::classify))
        .route("/api/v1/stats", get(routes::get_stats))
        .route("/api/v1/history", get(routes::get_history))
        .route("/api/v1/history/:index", get(routes::get_history_detail))
        .route(
            "/api/v1/history/:index/report",
            get(routes::get_history_report),
        )
        .route("/api/v1/heatmap", get(routes::get_heatmap))
        .layer(cors)
        .with_state(state)
}

/// CORS layer for the dashboard origins; an empty list allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    if parsed.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(parsed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
