//! Pushes static index settings to the remote service.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use search_sync_repository::SearchIndexClient;

use crate::errors::SearchSyncError;
use crate::gate::IndexingGate;
use crate::registry::IndexDefinition;

/// Applies an [`IndexDefinition`]'s settings mapping to its remote index.
///
/// No retries. A remote failure is returned to the caller unchanged.
#[derive(Clone)]
pub struct SettingsPusher {
    client: Arc<dyn SearchIndexClient>,
    gate: IndexingGate,
    index_suffix: String,
}

impl SettingsPusher {
    pub fn new(
        client: Arc<dyn SearchIndexClient>,
        gate: IndexingGate,
        index_suffix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            gate,
            index_suffix: index_suffix.into(),
        }
    }

    /// Push the settings of `definition`.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the settings were sent
    /// * `Ok(false)` - If the indexing gate is closed and nothing was sent
    /// * `Err(SearchSyncError)` - If the remote call failed
    #[instrument(skip(self, definition), fields(index = definition.base_name()))]
    pub async fn push(&self, definition: &IndexDefinition) -> Result<bool, SearchSyncError> {
        if !self.gate.enabled() {
            debug!("Indexing disabled, skipping settings push");
            return Ok(false);
        }

        let index_name = definition.index_name(&self.index_suffix);
        self.client
            .set_settings(&index_name, definition.settings())
            .await?;

        info!(index_name = %index_name, "Pushed index settings");
        Ok(true)
    }
}
