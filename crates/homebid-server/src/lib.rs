//! Homebid Server
//!
//! HTTP surface for the offer drafting system: offer CRUD, file text
//! extraction, one-shot generation, and conversational update turns.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod session;

use config::ServerConfig;
use handlers::{create_router, AppState};
use homebid_agent::UpdateAgent;
use homebid_llm::OpenAiProvider;
use homebid_rewriter::Rewriter;
use homebid_store::SqliteStore;
use session::SessionManager;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Storage initialization error
    #[error("Store error: {0}")]
    Store(String),

    /// Generative backend initialization error
    #[error("Backend error: {0}")]
    Backend(String),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the HTTP server
///
/// Initializes logging, opens the offer store, wires the generative
/// backend into the rewriter and agent, and serves until shutdown.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    // Initialize tracing (RUST_LOG controls the filter)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Homebid server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path);
    info!("Backend model: {}", config.llm.model);

    let api_key = std::env::var(&config.llm.api_key_env).unwrap_or_default();
    let provider = Arc::new(
        OpenAiProvider::new(&config.llm.endpoint, &config.llm.model, api_key)
            .map_err(|e| ServerError::Backend(e.to_string()))?,
    );

    let rewriter = Rewriter::new(provider.clone());
    let agent = UpdateAgent::new(provider, rewriter.clone());

    let store = SqliteStore::new(&config.database_path)
        .map_err(|e| ServerError::Store(e.to_string()))?;

    let state = AppState {
        store: Arc::new(Mutex::new(store)),
        session_manager: Arc::new(SessionManager::new(
            &config.jwt_secret,
            config.token_expiry_secs,
        )),
        rewriter,
        agent,
    };

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.token_expiry_secs, 3600);
        assert_eq!(config.database_path, ":memory:");
    }
}
