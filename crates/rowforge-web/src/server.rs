//! The admin web server.

use crate::error::WebError;
use crate::routes;
use crate::state::AppState;
use rowforge_core::config::ServerConfig;
use tokio::net::TcpListener;

/// The grid admin server.
pub struct WebServer {
    config: ServerConfig,
    state: AppState,
}

impl WebServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Start serving until the task is cancelled.
    pub async fn run(self) -> Result<(), WebError> {
        let addr = self.config.bind_address();
        tracing::info!(address = %addr, "Starting Rowforge admin");

        let app = routes::create_router(self.state);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| WebError::StartupFailed(e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| WebError::StartupFailed(e.to_string()))?;

        Ok(())
    }

    /// Get the configured bind address.
    pub fn bind_address(&self) -> String {
        self.config.bind_address()
    }
}
