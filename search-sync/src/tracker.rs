//! Last-known fragment counts per record and index.
//!
//! Remote deletes are always issued by exact object id, so the sync layer
//! needs to know how many fragments a record produced on its previous sync.
//! Hosts that need this to survive restarts implement [`FragmentTracker`] on
//! top of their own storage.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use search_sync_shared::ObjectId;

use crate::errors::SearchSyncError;

/// Stores how many documents a record produced in a given index.
#[async_trait]
pub trait FragmentTracker: Send + Sync {
    /// Fragment count recorded for `model_id` in `index_name`, if any.
    async fn previous_count(
        &self,
        index_name: &str,
        model_id: &ObjectId,
    ) -> Result<Option<usize>, SearchSyncError>;

    /// Record the fragment count of the latest successful sync.
    async fn record_count(
        &self,
        index_name: &str,
        model_id: &ObjectId,
        count: usize,
    ) -> Result<(), SearchSyncError>;

    /// Drop the entry once every document of the record has been deleted.
    async fn forget(&self, index_name: &str, model_id: &ObjectId) -> Result<(), SearchSyncError>;
}

/// Process-local tracker. Counts are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryFragmentTracker {
    counts: Mutex<HashMap<(String, ObjectId), usize>>,
}

impl InMemoryFragmentTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FragmentTracker for InMemoryFragmentTracker {
    async fn previous_count(
        &self,
        index_name: &str,
        model_id: &ObjectId,
    ) -> Result<Option<usize>, SearchSyncError> {
        let counts = self.counts.lock().await;
        Ok(counts
            .get(&(index_name.to_string(), model_id.clone()))
            .copied())
    }

    async fn record_count(
        &self,
        index_name: &str,
        model_id: &ObjectId,
        count: usize,
    ) -> Result<(), SearchSyncError> {
        self.counts
            .lock()
            .await
            .insert((index_name.to_string(), model_id.clone()), count);
        Ok(())
    }

    async fn forget(&self, index_name: &str, model_id: &ObjectId) -> Result<(), SearchSyncError> {
        self.counts
            .lock()
            .await
            .remove(&(index_name.to_string(), model_id.clone()));
        Ok(())
    }
}
