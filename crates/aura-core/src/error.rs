use thiserror::Error;

/// Failures of the persistence layer.
///
/// These stay inside the crate: `StateStore` logs them and degrades to a
/// no-op, so callers of its public entry points never see one.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}
