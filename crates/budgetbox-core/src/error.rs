use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Box not found: {0}")]
    BoxNotFound(String),
    #[error("Expense #{} not found in box {box_id}", .index + 1)]
    ExpenseNotFound { box_id: String, index: usize },
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Failures raised by a persistence medium.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serde(err.to_string())
    }
}
