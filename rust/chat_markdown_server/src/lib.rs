//! Web front end for chat-to-Markdown conversion.
//!
//! Routes:
//! - `GET /`: input form
//! - `POST /convert`: renders the `chat_input` field as Markdown HTML
//! - `POST /download`: maps the `markdown_content` HTML to a DOCX attachment
//!
//! ```ignore
//! use chat_markdown_server::{run_server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     run_server(ServerConfig::default()).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod state;
mod templates;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;

pub use error::ServerError;
use state::AppState;

/// Server configuration, fixed at startup.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Text of the title block in generated documents.
    pub title: String,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            title: chat_markdown::DEFAULT_TITLE.to_string(),
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Build the router without binding a socket.
pub fn router(config: ServerConfig) -> Router {
    app::create_router(Arc::new(AppState { config }))
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener fails.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    let app = router(config);

    tracing::info!(address = %addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
