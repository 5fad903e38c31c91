//! Page and download handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use chat_markdown::{html_to_docx, markdown_to_html, DOCX_CONTENT_TYPE};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ServerError;
use crate::state::AppState;
use crate::templates;

/// `Content-Disposition` for the generated document.
pub(crate) const DOCX_ATTACHMENT: &str = "attachment; filename=\"converted_chat.docx\"";

/// Body of `POST /convert`.
#[derive(Debug, Deserialize)]
pub(crate) struct ConvertForm {
    chat_input: String,
}

/// Body of `POST /download`: the HTML previously shown by `/convert`.
#[derive(Debug, Deserialize)]
pub(crate) struct DownloadForm {
    markdown_content: String,
}

/// GET /
pub(crate) async fn index() -> Html<String> {
    Html(templates::render_index())
}

/// POST /convert
pub(crate) async fn convert(Form(form): Form<ConvertForm>) -> Html<String> {
    let rendered = markdown_to_html(&form.chat_input);
    debug!(
        input_len = form.chat_input.len(),
        html_len = rendered.len(),
        "rendered chat input"
    );
    Html(templates::render_result(&rendered))
}

/// POST /download
pub(crate) async fn download(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DownloadForm>,
) -> Result<Response, ServerError> {
    let bytes = html_to_docx(&form.markdown_content, &state.config.title)?;
    info!(bytes = bytes.len(), "generated docx");

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, DOCX_ATTACHMENT),
        ],
        bytes,
    )
        .into_response())
}
