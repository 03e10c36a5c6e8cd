//! # Search Sync
//!
//! Keeps remote search indexes in step with application records. The host
//! calls the orchestrator from its record lifecycle hooks; every call is
//! awaited to completion on the caller's task.
//!
//! ## Architecture
//!
//! 1. **Identity**: derives `model_name`, `model_id` and per-fragment `objectID`
//! 2. **Serializer**: picks how a record turns into one or more attribute maps
//! 3. **Assembler**: merges identity fields into each attribute map
//! 4. **Registry**: model type to ordered index associations, frozen at boot
//! 5. **Gate**: global kill-switch for every remote mutating call
//! 6. **Settings**: pushes static index settings on demand
//! 7. **Orchestrator**: runs a lifecycle event through every association
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`model`]: Capabilities a model type exposes
//! - [`registry`]: Index definitions and associations
//! - [`tracker`]: Last-known fragment counts
//! - [`orchestrator`]: Coordinates the sync flow
//! - [`errors`]: Error types for the sync layer

pub mod assembler;
pub mod config;
pub mod errors;
pub mod gate;
pub mod identity;
pub mod model;
pub mod orchestrator;
pub mod registry;
pub mod serializer;
pub mod settings;
pub mod tracker;

pub use config::{Dependencies, PublicSearchConfig, SearchSyncConfig, SecretStore};
pub use errors::SearchSyncError;
pub use gate::IndexingGate;
pub use model::{to_attributes, Indexable};
pub use orchestrator::{LifecycleEvent, SyncOrchestrator, SyncOutcome};
pub use registry::{Association, IndexDefinition, IndexRegistry, RegistryBuilder};
pub use serializer::RecordSerializer;
pub use tracker::{FragmentTracker, InMemoryFragmentTracker};
