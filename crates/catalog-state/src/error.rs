//! Error types for catalog-state

use thiserror::Error;

/// Errors raised while connecting to or preparing the document store
#[derive(Error, Debug)]
pub enum StateError {
    /// Database connection error
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// Schema setup error
    #[error("Schema setup failed: {0}")]
    SchemaSetup(String),

    /// Invalid configuration (bad table name, unusable path, ...)
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Errors raised by [`crate::CatalogStore`] operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The addressed document does not exist
    #[error("{collection} document not found: {id}")]
    NotFound { collection: String, id: String },

    /// The backend rejected or failed the operation
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A document could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Failure injected by a test fake
    #[error("injected failure: {operation}")]
    Injected { operation: String },
}

impl From<surrealdb::Error> for StorageError {
    fn from(err: surrealdb::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<surrealdb::Error> for StateError {
    fn from(err: surrealdb::Error) -> Self {
        StateError::Connection(err.to_string())
    }
}
