//! Veri API - Main entry point.

use anyhow::Result;
use veri_common::config::Config;
use veri_common::logging::init_logging;

use veri_api::ApiService;

#[tokio::main]
async fn main() -> Result<()> {
    // Load and validate configuration; missing oracle credentials are fatal
    // here, before the server accepts any request.
    let config = Config::load_and_validate()?;

    // Initialize logging
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    tracing::info!("VeriCore API v{}", env!("CARGO_PKG_VERSION"));

    // Start the API server
    let service = ApiService::new(config)?;
    service.start().await
}
