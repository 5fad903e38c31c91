//! Chat text to Markdown-rendered HTML, and that HTML to a DOCX document.
//!
//! ```text
//! chat text ──markdown_to_html──► HTML ──document_from_html──► Document ──write_docx──► .docx bytes
//! ```

pub mod document;
mod docx;
mod error;
mod escape;
pub mod mapper;
pub mod markdown;

pub use document::{Block, Document, ListKind, Table};
pub use docx::{write_docx, DOCX_CONTENT_TYPE};
pub use error::DocxError;
pub use escape::escape_markup;
pub use mapper::document_from_html;
pub use markdown::markdown_to_html;

/// Title block text used when the caller does not pick one.
pub const DEFAULT_TITLE: &str = "Converted Chat";

/// Maps rendered HTML onto a document and packages it as DOCX.
pub fn html_to_docx(html: &str, title: &str) -> Result<Vec<u8>, DocxError> {
    let document = document_from_html(html, title);
    write_docx(&document)
}
