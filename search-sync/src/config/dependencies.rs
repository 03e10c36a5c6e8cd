//! Dependency initialization and wiring for the sync layer.

use std::sync::Arc;

use tracing::info;

use search_sync_repository::{OpenSearchClient, SearchIndexClient};

use crate::config::SearchSyncConfig;
use crate::errors::SearchSyncError;
use crate::orchestrator::SyncOrchestrator;
use crate::registry::IndexRegistry;
use crate::tracker::{FragmentTracker, InMemoryFragmentTracker};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator, ready to sync records.
    pub orchestrator: SyncOrchestrator,
}

impl Dependencies {
    /// Wire the remote client, fragment tracker and orchestrator.
    ///
    /// The client is built from the admin credentials in `config`. Missing
    /// credentials are not an error here; the remote service rejects the
    /// first call instead.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(SearchSyncError)` - If the endpoint is not a valid URL
    pub fn new(config: &SearchSyncConfig, registry: IndexRegistry) -> Result<Self, SearchSyncError> {
        Self::with_tracker(config, registry, Arc::new(InMemoryFragmentTracker::new()))
    }

    /// Same as [`Dependencies::new`] with a host-provided fragment tracker.
    pub fn with_tracker(
        config: &SearchSyncConfig,
        registry: IndexRegistry,
        tracker: Arc<dyn FragmentTracker>,
    ) -> Result<Self, SearchSyncError> {
        info!(
            endpoint = %config.endpoint,
            environment = %config.environment,
            index_suffix = %config.index_suffix,
            has_admin_credentials = config.admin_credentials.is_some(),
            max_batch_size = ?config.max_batch_size,
            "Initializing dependencies"
        );

        let client = OpenSearchClient::new(config.client_config()).map_err(|e| {
            SearchSyncError::config(format!("Failed to create search client: {}", e))
        })?;
        let client: Arc<dyn SearchIndexClient> = Arc::new(client);

        let orchestrator = SyncOrchestrator::new(client, config, Arc::new(registry), tracker);

        Ok(Self { orchestrator })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        let config = SearchSyncConfig {
            endpoint: "not a url".to_string(),
            ..SearchSyncConfig::default()
        };
        let result = Dependencies::new(&config, IndexRegistry::builder().build());
        assert!(matches!(result, Err(SearchSyncError::ConfigError(_))));
    }

    #[test]
    fn test_wires_orchestrator() {
        let config = SearchSyncConfig::default().with_index_suffix("staging");
        let deps = Dependencies::new(&config, IndexRegistry::builder().build()).unwrap();
        assert_eq!(deps.orchestrator.index_suffix(), "staging");
        assert!(deps.orchestrator.gate().enabled());
    }
}
