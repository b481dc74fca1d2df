//! # Storage Error Types
//!
//! Error types for local persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Shell displays a user-friendly message (write failures only -         │
//! │  read failures degrade silently to an empty cart)                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Local storage errors.
///
/// Note the asymmetry dictated by the failure semantics: snapshot *reads*
/// never produce these (absent or unparsable data falls back to an empty
/// cart inside the repository); *writes* and pool setup do.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to open or connect to the SQLite database.
    #[error("Storage connection failed: {0}")]
    ConnectionFailed(String),

    /// A schema migration failed to apply.
    #[error("Storage migration failed: {0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),

    /// A query failed at runtime.
    #[error("Storage query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),

    /// The cart state could not be serialized for persistence.
    #[error("Failed to serialize cart snapshot: {0}")]
    SerializeFailed(#[from] serde_json::Error),

    /// A caller-side contract violation stopped the mutation.
    #[error(transparent)]
    Invalid(#[from] spicehouse_core::CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_message() {
        let err = StoreError::ConnectionFailed("file is locked".to_string());
        assert_eq!(err.to_string(), "Storage connection failed: file is locked");
    }

    #[test]
    fn test_core_error_passes_through_transparently() {
        let core = spicehouse_core::CoreError::ProductNotFound("x".to_string());
        let err: StoreError = core.into();
        assert_eq!(err.to_string(), "Product not found: x");
    }
}
