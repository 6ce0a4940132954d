//! deckhand tool server.
//!
//! Exposes the slide generation pipeline to a calling agent.
//!
//! # Architecture
//!
//! The server consists of:
//! - **Dispatch**: Routes JSON-RPC methods to tools and resources
//! - **Protocol**: Defines request/response message types
//! - **Tools**: The generation tool catalogue
//! - **Resources**: Syntax guide and mini-app bundle
//! - **Transports**: HTTP (`routes`) and newline-delimited stdio (`stdio`)

pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod resources;
pub mod routes;
pub mod stdio;
pub mod tools;

use std::net::SocketAddr;
use std::sync::Arc;

pub use dispatch::Dispatcher;
pub use error::{ServerError, ServerResult};
pub use protocol::{Request, Response};
pub use resources::Resources;
pub use routes::{AppState, create_router};
pub use stdio::{serve_io, serve_stdio};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Serve the operations over HTTP until Ctrl+C.
pub async fn serve_http(dispatcher: Arc<Dispatcher>, config: ServerConfig) -> ServerResult<()> {
    let state = Arc::new(AppState { dispatcher });
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| ServerError::Io {
            path: std::path::PathBuf::new(),
            message: format!("Invalid address: {}:{}", config.host, config.port),
        })?;

    tracing::info!("Starting deckhand server at http://{}/mcp", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
