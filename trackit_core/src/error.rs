use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Point lookup found no row for the given primary key
    #[error("not found: '{key}'")]
    NotFound { key: String },

    /// A stored row violates the store's own invariants (duplicate or
    /// malformed primary key, side fields disagreeing with the key).
    /// Never resolved by silently picking a row.
    #[error("consistency violation: {0}")]
    Consistency(String),

    /// A key segment was empty or contained the separator
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The backing store failed or is unreachable
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}
