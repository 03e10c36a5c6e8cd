//! Sync orchestrator.
//!
//! Drives one record through every index association registered for its
//! model type, in response to a lifecycle event:
//!
//! - `Destroyed`: delete every previously known document of the record.
//! - `Created` / `Updated` on a non-indexable record: same as `Destroyed`.
//! - `Created` / `Updated` otherwise: serialize, assemble, delete documents
//!   the new fragment layout no longer uses, then upsert the new documents.
//!
//! Every remote call is awaited in program order on the caller's task.
//! Nothing is retried; the first error is returned to the caller.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use search_sync_repository::SearchIndexClient;
use search_sync_shared::{ObjectId, RecordDocument};

use crate::assembler::assemble_all;
use crate::config::SearchSyncConfig;
use crate::errors::SearchSyncError;
use crate::gate::IndexingGate;
use crate::identity::RecordIdentity;
use crate::model::Indexable;
use crate::registry::{Association, IndexDefinition, IndexRegistry};
use crate::serializer::resolve_fragments;
use crate::settings::SettingsPusher;
use crate::tracker::FragmentTracker;

/// Host framework event that triggers a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Created,
    Updated,
    Destroyed,
}

/// Summary of the remote work done by one call.
///
/// `skipped` is set when the indexing gate is closed and nothing was sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Documents sent to `save_objects`.
    pub upserted: usize,
    /// Object ids sent to `delete_objects`.
    pub deleted: usize,
    pub skipped: bool,
}

impl SyncOutcome {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    /// Add the counts of `other` to this outcome.
    pub fn merge(&mut self, other: SyncOutcome) {
        self.upserted += other.upserted;
        self.deleted += other.deleted;
        self.skipped |= other.skipped;
    }
}

/// Remote changes computed for one record in one index.
struct SyncPlan {
    identity: RecordIdentity,
    stale: Vec<ObjectId>,
    documents: Vec<RecordDocument>,
}

/// Coordinates identity, serialization, fragment tracking and the remote
/// client for every registered association.
pub struct SyncOrchestrator {
    client: Arc<dyn SearchIndexClient>,
    registry: Arc<IndexRegistry>,
    tracker: Arc<dyn FragmentTracker>,
    gate: IndexingGate,
    index_suffix: String,
    max_batch_size: Option<usize>,
    settings: SettingsPusher,
}

impl SyncOrchestrator {
    /// Create an orchestrator. The indexing gate and index suffix are fixed
    /// from `config` here and never re-read.
    pub fn new(
        client: Arc<dyn SearchIndexClient>,
        config: &SearchSyncConfig,
        registry: Arc<IndexRegistry>,
        tracker: Arc<dyn FragmentTracker>,
    ) -> Self {
        let gate = IndexingGate::from_config(config);
        let settings = SettingsPusher::new(Arc::clone(&client), gate, config.index_suffix.clone());

        info!(
            indexing_enabled = gate.enabled(),
            index_suffix = %config.index_suffix,
            models = ?registry.model_names(),
            "Sync orchestrator initialized"
        );

        Self {
            client,
            registry,
            tracker,
            gate,
            index_suffix: config.index_suffix.clone(),
            max_batch_size: config.max_batch_size,
            settings,
        }
    }

    pub fn gate(&self) -> IndexingGate {
        self.gate
    }

    pub fn registry(&self) -> &IndexRegistry {
        &self.registry
    }

    pub fn index_suffix(&self) -> &str {
        &self.index_suffix
    }

    /// Sync `record` to every index registered for its model type, in
    /// registration order. Stops at the first error.
    ///
    /// # Returns
    ///
    /// * `Ok(SyncOutcome)` - Combined outcome of every association
    /// * `Err(SearchSyncError)` - If the model is unregistered, or serialization,
    ///   tracking or a remote call failed
    #[instrument(skip(self, record), fields(model = M::MODEL_NAME))]
    pub async fn sync<M: Indexable>(
        &self,
        record: &M,
        event: LifecycleEvent,
    ) -> Result<SyncOutcome, SearchSyncError> {
        if !self.gate.enabled() {
            debug!("Indexing disabled, skipping sync");
            return Ok(SyncOutcome::skipped());
        }

        let associations = self.registry.associations_for::<M>();
        if associations.is_empty() {
            return Err(SearchSyncError::unknown_model(M::MODEL_NAME));
        }

        let mut outcome = SyncOutcome::default();
        for association in associations {
            outcome.merge(self.sync_association(record, association, event).await?);
        }
        Ok(outcome)
    }

    /// Sync `record` to the single index of `association`.
    #[instrument(
        skip(self, record, association),
        fields(model = M::MODEL_NAME, index = association.index.base_name())
    )]
    pub async fn sync_association<M: Indexable>(
        &self,
        record: &M,
        association: &Association<M>,
        event: LifecycleEvent,
    ) -> Result<SyncOutcome, SearchSyncError> {
        if !self.gate.enabled() {
            debug!("Indexing disabled, skipping sync");
            return Ok(SyncOutcome::skipped());
        }

        let index_name = association.index.index_name(&self.index_suffix);
        let plan = self.plan(record, association, event, &index_name).await?;

        let deleted = self.delete_in_chunks(&index_name, &plan.stale).await?;
        let upserted = self.save_in_chunks(&index_name, &plan.documents).await?;
        self.track(&index_name, &plan).await?;

        debug!(
            index_name = %index_name,
            object_id = %plan.identity.model_id,
            upserted,
            deleted,
            "Record synced"
        );

        Ok(SyncOutcome {
            upserted,
            deleted,
            skipped: false,
        })
    }

    /// Sync many records of one model type at once.
    ///
    /// For each association, stale documents of every record are deleted
    /// first, then all new documents are upserted, in calls of at most
    /// `max_batch_size` items.
    #[instrument(skip(self, records), fields(model = M::MODEL_NAME, record_count = records.len()))]
    pub async fn reindex<M: Indexable>(&self, records: &[M]) -> Result<SyncOutcome, SearchSyncError> {
        if !self.gate.enabled() {
            debug!("Indexing disabled, skipping reindex");
            return Ok(SyncOutcome::skipped());
        }

        let associations = self.registry.associations_for::<M>();
        if associations.is_empty() {
            return Err(SearchSyncError::unknown_model(M::MODEL_NAME));
        }

        let mut outcome = SyncOutcome::default();
        for association in associations {
            let index_name = association.index.index_name(&self.index_suffix);

            let mut plans = Vec::with_capacity(records.len());
            for record in records {
                plans.push(
                    self.plan(record, association, LifecycleEvent::Updated, &index_name)
                        .await?,
                );
            }

            let stale: Vec<ObjectId> = plans.iter().flat_map(|p| p.stale.iter().cloned()).collect();
            let documents: Vec<RecordDocument> =
                plans.iter().flat_map(|p| p.documents.iter().cloned()).collect();

            outcome.deleted += self.delete_in_chunks(&index_name, &stale).await?;
            outcome.upserted += self.save_in_chunks(&index_name, &documents).await?;
            for plan in &plans {
                self.track(&index_name, plan).await?;
            }

            info!(
                index_name = %index_name,
                records = records.len(),
                documents = documents.len(),
                deleted = stale.len(),
                "Reindexed association"
            );
        }
        Ok(outcome)
    }

    /// Push the settings of one index definition.
    pub async fn push_settings(
        &self,
        definition: &IndexDefinition,
    ) -> Result<SyncOutcome, SearchSyncError> {
        if self.settings.push(definition).await? {
            Ok(SyncOutcome::default())
        } else {
            Ok(SyncOutcome::skipped())
        }
    }

    /// Push the settings of every registered index definition, stopping at
    /// the first failure.
    #[instrument(skip(self))]
    pub async fn push_all_settings(&self) -> Result<SyncOutcome, SearchSyncError> {
        let mut outcome = SyncOutcome::default();
        for definition in self.registry.definitions() {
            outcome.merge(self.push_settings(definition).await?);
        }
        Ok(outcome)
    }

    /// Work out which ids to delete and which documents to upsert.
    async fn plan<M: Indexable>(
        &self,
        record: &M,
        association: &Association<M>,
        event: LifecycleEvent,
        index_name: &str,
    ) -> Result<SyncPlan, SearchSyncError> {
        let identity = RecordIdentity::of(record);
        // Untracked records hold at most the unsplit document, and nothing
        // before they are created.
        let untracked = match event {
            LifecycleEvent::Created => 0,
            LifecycleEvent::Updated | LifecycleEvent::Destroyed => 1,
        };
        let previous = self
            .tracker
            .previous_count(index_name, &identity.model_id)
            .await?
            .unwrap_or(untracked);
        let old_ids = identity.object_ids(previous);

        let documents = match event {
            LifecycleEvent::Destroyed => Vec::new(),
            LifecycleEvent::Created | LifecycleEvent::Updated if !record.is_indexable() => {
                debug!(object_id = %identity.model_id, "Record not indexable");
                Vec::new()
            }
            LifecycleEvent::Created | LifecycleEvent::Updated => {
                let (strategy, fragments) =
                    resolve_fragments(record, association.serializer.as_deref())?;
                debug!(
                    object_id = %identity.model_id,
                    strategy = ?strategy,
                    fragments = fragments.len(),
                    "Serialized record"
                );
                assemble_all(&identity, fragments)
            }
        };

        let keep: HashSet<&ObjectId> = documents.iter().map(|doc| &doc.object_id).collect();
        let stale = old_ids
            .into_iter()
            .filter(|id| !keep.contains(id))
            .collect();

        Ok(SyncPlan {
            identity,
            stale,
            documents,
        })
    }

    async fn track(&self, index_name: &str, plan: &SyncPlan) -> Result<(), SearchSyncError> {
        if plan.documents.is_empty() {
            self.tracker
                .forget(index_name, &plan.identity.model_id)
                .await
        } else {
            self.tracker
                .record_count(index_name, &plan.identity.model_id, plan.documents.len())
                .await
        }
    }

    async fn save_in_chunks(
        &self,
        index_name: &str,
        documents: &[RecordDocument],
    ) -> Result<usize, SearchSyncError> {
        for chunk in documents.chunks(self.chunk_size(documents.len())) {
            self.client.save_objects(index_name, chunk).await?;
        }
        Ok(documents.len())
    }

    async fn delete_in_chunks(
        &self,
        index_name: &str,
        object_ids: &[ObjectId],
    ) -> Result<usize, SearchSyncError> {
        for chunk in object_ids.chunks(self.chunk_size(object_ids.len())) {
            self.client.delete_objects(index_name, chunk).await?;
        }
        Ok(object_ids.len())
    }

    fn chunk_size(&self, len: usize) -> usize {
        self.max_batch_size.unwrap_or(len).max(1)
    }
}
