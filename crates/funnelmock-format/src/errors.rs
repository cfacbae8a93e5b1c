use thiserror::Error;

/// Errors emitted by the formatters and the run-artifact writer.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
