//! Tombstone Status
//!
//! Read-only HTTP view of the reaper's status document.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | The latest status document, verbatim |
//! | `GET /health` | Whether the document exists and how old it is |
//!
//! The server never writes the document. It answers 503 while the reaper has
//! not produced one yet.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::StatusConfig;
use handlers::{create_router, AppState};
use tokio::net::TcpListener;
use tracing::info;

/// Status server error
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the status HTTP server
///
/// Serves until Ctrl+C.
pub async fn start_server(config: StatusConfig) -> Result<(), StatusError> {
    config.validate()?;

    info!("Starting Tombstone status server");
    info!("Bind address: {}", config.bind_addr());
    info!("Artifact: {}", config.artifact_path.display());

    let state = AppState::new(config.artifact_path.clone(), config.stale_after_secs);
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Status server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await
        .map_err(|e| StatusError::Server(e.to_string()))?;

    info!("Status server stopped");
    Ok(())
}
