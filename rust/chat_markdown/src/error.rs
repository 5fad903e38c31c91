use thiserror::Error;

/// Failure while packaging a document as DOCX.
#[derive(Debug, Error)]
pub enum DocxError {
    #[error("zip packaging failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("writing docx part failed: {0}")]
    Io(#[from] std::io::Error),
}
