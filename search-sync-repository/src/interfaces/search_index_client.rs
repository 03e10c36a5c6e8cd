//! Search index client trait definition.
//!
//! This module defines the abstract interface for the mutating calls issued
//! against a remote search index, allowing different backends (OpenSearch, a
//! hosted service, an in-memory mock) to be injected.

use async_trait::async_trait;
use serde_json::Value;

use search_sync_shared::{ObjectId, RecordDocument};

use crate::errors::SearchIndexError;

/// Abstracts the remote search service's client library.
///
/// Implementations are injected into the sync layer to enable dependency
/// injection and easy testing with mock implementations. Every method is a
/// single remote call from the caller's point of view; implementations must
/// not retry, queue or spawn work.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations.
#[async_trait]
pub trait SearchIndexClient: Send + Sync {
    /// Push a static settings mapping to the named index.
    ///
    /// Implementations may create the index when it does not exist yet.
    ///
    /// # Arguments
    ///
    /// * `index_name` - Fully resolved index name (environment suffix included)
    /// * `settings` - The index definition's settings mapping
    async fn set_settings(&self, index_name: &str, settings: &Value)
        -> Result<(), SearchIndexError>;

    /// Upsert documents keyed by their object id, in one batched call.
    ///
    /// Saving a document whose object id already exists overwrites it. An
    /// empty slice is a no-op.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If every document was written
    /// * `Err(SearchIndexError)` - If the call failed or any document was rejected
    async fn save_objects(
        &self,
        index_name: &str,
        documents: &[RecordDocument],
    ) -> Result<(), SearchIndexError>;

    /// Delete documents by exact object id, in one batched call.
    ///
    /// Ids that don't exist are considered successfully deleted. An empty
    /// slice is a no-op.
    async fn delete_objects(
        &self,
        index_name: &str,
        object_ids: &[ObjectId],
    ) -> Result<(), SearchIndexError>;
}
