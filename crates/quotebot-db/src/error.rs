use thiserror::Error;

/// Runtime storage failures. None of these should take the process down;
/// callers log them and answer with a generic message.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("insert failed: {0}")]
    Insert(rusqlite::Error),

    #[error("update failed: {0}")]
    Update(rusqlite::Error),

    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("connection lock poisoned: {0}")]
    Lock(String),
}
