//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chat_markdown::DocxError;

use crate::templates;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// DOCX packaging failed.
    #[error("DOCX generation failed: {0}")]
    Docx(#[from] DocxError),

    /// Host and port do not form a socket address.
    #[error("invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    /// I/O error (binding or serving).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(templates::ERROR_HTML),
        )
            .into_response()
    }
}
