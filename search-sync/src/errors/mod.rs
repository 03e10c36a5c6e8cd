//! Error types for the search sync layer.

use thiserror::Error;

use search_sync_repository::SearchIndexError;

/// Errors that can occur while syncing records or pushing index settings.
///
/// Remote failures and serializer failures are passed through unchanged;
/// nothing here retries. A disabled indexing gate is not an error.
#[derive(Error, Debug)]
pub enum SearchSyncError {
    /// The remote client rejected or failed a call.
    #[error("Remote error: {0}")]
    Remote(#[from] SearchIndexError),

    /// A serializer or the record's own attribute dump failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The model type has no registered index associations.
    #[error("No index registered for model: {0}")]
    UnknownModel(String),

    /// The fragment tracker failed to read or store a count.
    #[error("Fragment tracker error: {0}")]
    TrackerError(String),
}

impl SearchSyncError {
    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an unknown model error.
    pub fn unknown_model(model_name: impl Into<String>) -> Self {
        Self::UnknownModel(model_name.into())
    }

    /// Create a tracker error.
    pub fn tracker(msg: impl Into<String>) -> Self {
        Self::TrackerError(msg.into())
    }
}

impl From<serde_json::Error> for SearchSyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
