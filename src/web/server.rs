//! Web server for the built-in screens.

use std::net::SocketAddr;

use tower_http::trace::TraceLayer;

use crate::error::{Error, Result};

use super::handlers::AppState;
use super::router::create_app_router;

/// Web server configuration.
pub struct WebServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Run the web server until the process stops.
pub async fn run_server(config: WebServerConfig, state: AppState) -> Result<()> {
    let app = create_app_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| Error::Web(format!("Invalid address: {}", e)))?;

    tracing::info!("Starting web server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Web(e.to_string()))?;

    Ok(())
}
