//! Search index error types.
//!
//! This module defines the unified error type for all remote index operations,
//! covering transport failures, rejected requests and local pre-flight checks.

use thiserror::Error;

/// Unified errors from remote search index operations.
///
/// Returned by every `SearchIndexClient` method. Callers receive these
/// unchanged; nothing in this crate retries.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g. an index name the backend would reject).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to establish connection to the search backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Bulk operation had per-document failures.
    #[error("Bulk index error: {0}")]
    BulkIndexError(String),

    /// Failed to delete documents.
    #[error("Delete error: {0}")]
    DeleteError(String),

    /// Failed to create the index or push its settings.
    #[error("Settings error: {0}")]
    SettingsError(String),

    /// Failed to parse response from the search backend.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize data for the search backend.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Batch size exceeds configured maximum.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a bulk index error.
    pub fn bulk_index(msg: impl Into<String>) -> Self {
        Self::BulkIndexError(msg.into())
    }

    /// Create a delete error.
    pub fn delete(msg: impl Into<String>) -> Self {
        Self::DeleteError(msg.into())
    }

    /// Create a settings error.
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::SettingsError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a batch size exceeded error.
    pub fn batch_size_exceeded(provided: usize, max: usize) -> Self {
        Self::BatchSizeExceeded { provided, max }
    }
}
