//! Index definitions and the per-model registration ledger.
//!
//! Associations are registered once during application bootstrap through a
//! [`RegistryBuilder`]. Building yields an immutable [`IndexRegistry`] that is
//! shared (usually behind an `Arc`) and only read afterwards.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::model::Indexable;
use crate::serializer::RecordSerializer;

/// One remote search index.
///
/// The remote name is the base name plus the environment suffix, see
/// [`IndexDefinition::index_name`]. The settings mapping is pushed on demand
/// and never changes at runtime.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexDefinition {
    base_name: String,
    #[serde(default = "empty_settings")]
    settings: Value,
}

fn empty_settings() -> Value {
    json!({})
}

impl IndexDefinition {
    /// Create a definition with empty settings.
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            settings: empty_settings(),
        }
    }

    /// Attach the static settings mapping.
    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = settings;
        self
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn settings(&self) -> &Value {
        &self.settings
    }

    /// Remote index name: `<base_name>_<suffix>`, or the base name alone when
    /// the suffix is empty.
    pub fn index_name(&self, suffix: &str) -> String {
        if suffix.is_empty() {
            self.base_name.clone()
        } else {
            format!("{}_{}", self.base_name, suffix)
        }
    }
}

/// A model type's registration against one index, with an optional serializer.
pub struct Association<M> {
    pub index: Arc<IndexDefinition>,
    pub serializer: Option<Arc<dyn RecordSerializer<M>>>,
}

impl<M> Clone for Association<M> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
            serializer: self.serializer.clone(),
        }
    }
}

impl<M> std::fmt::Debug for Association<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Association")
            .field("index", &self.index.base_name())
            .field("has_serializer", &self.serializer.is_some())
            .finish()
    }
}

/// Collects registrations during bootstrap.
#[derive(Default)]
pub struct RegistryBuilder {
    associations: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    model_names: Vec<&'static str>,
    definitions: Vec<Arc<IndexDefinition>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register model `M` against `index`, serialized by its own attribute
    /// methods.
    pub fn register<M: Indexable>(self, index: Arc<IndexDefinition>) -> Self {
        self.push::<M>(Association {
            index,
            serializer: None,
        })
    }

    /// Register model `M` against `index` with an explicit serializer.
    pub fn register_with<M: Indexable>(
        self,
        index: Arc<IndexDefinition>,
        serializer: Arc<dyn RecordSerializer<M>>,
    ) -> Self {
        self.push::<M>(Association {
            index,
            serializer: Some(serializer),
        })
    }

    /// Register an index that no model feeds yet, so its settings can be pushed.
    pub fn register_index(mut self, index: Arc<IndexDefinition>) -> Self {
        self.add_definition(index);
        self
    }

    fn push<M: Indexable>(mut self, association: Association<M>) -> Self {
        debug!(
            model = M::MODEL_NAME,
            index = association.index.base_name(),
            "Registering index association"
        );
        self.add_definition(Arc::clone(&association.index));

        let entry = self
            .associations
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Box::new(Vec::<Association<M>>::new()) as Box<dyn Any + Send + Sync>);
        if let Some(list) = entry.downcast_mut::<Vec<Association<M>>>() {
            list.push(association);
        }
        if !self.model_names.contains(&M::MODEL_NAME) {
            self.model_names.push(M::MODEL_NAME);
        }
        self
    }

    /// The first definition registered under a base name wins.
    fn add_definition(&mut self, index: Arc<IndexDefinition>) {
        match self
            .definitions
            .iter()
            .find(|known| known.base_name() == index.base_name())
        {
            None => self.definitions.push(index),
            Some(known) if known.settings() != index.settings() => {
                warn!(
                    index = index.base_name(),
                    kept = %known.settings(),
                    ignored = %index.settings(),
                    "Conflicting settings registered for index, keeping the first"
                );
            }
            Some(_) => {}
        }
    }

    /// Freeze the registrations.
    pub fn build(self) -> IndexRegistry {
        IndexRegistry {
            associations: self.associations,
            model_names: self.model_names,
            definitions: self.definitions,
        }
    }
}

/// Immutable registration ledger: model type to ordered index associations.
pub struct IndexRegistry {
    associations: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    model_names: Vec<&'static str>,
    definitions: Vec<Arc<IndexDefinition>>,
}

impl IndexRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Associations of model `M`, in registration order. Empty if `M` was
    /// never registered.
    pub fn associations_for<M: Indexable>(&self) -> &[Association<M>] {
        self.associations
            .get(&TypeId::of::<M>())
            .and_then(|entry| entry.downcast_ref::<Vec<Association<M>>>())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every distinct index definition, in first-registration order.
    pub fn definitions(&self) -> &[Arc<IndexDefinition>] {
        &self.definitions
    }

    /// Names of registered model types, in first-registration order.
    pub fn model_names(&self) -> &[&'static str] {
        &self.model_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SearchSyncError;
    use crate::model::to_attributes;
    use search_sync_shared::{Attributes, PrimaryKey};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Product {
        id: i64,
    }

    impl Indexable for Product {
        const MODEL_NAME: &'static str = "Product";

        fn primary_key(&self) -> PrimaryKey {
            self.id.into()
        }
    }

    #[derive(Serialize)]
    struct Store {
        id: i64,
    }

    impl Indexable for Store {
        const MODEL_NAME: &'static str = "Store";

        fn primary_key(&self) -> PrimaryKey {
            self.id.into()
        }
    }

    fn id_only(record: &Product) -> Result<Attributes, SearchSyncError> {
        to_attributes(&json!({"id": record.id}))
    }

    #[test]
    fn test_index_name_suffix() {
        let index = IndexDefinition::new("ProductIndex");
        assert_eq!(index.index_name("production"), "ProductIndex_production");
        assert_eq!(index.index_name(""), "ProductIndex");
    }

    #[test]
    fn test_definition_from_json() {
        let index: IndexDefinition = serde_json::from_value(json!({
            "base_name": "ProductIndex",
            "settings": {"number_of_replicas": 1}
        }))
        .unwrap();
        assert_eq!(index.base_name(), "ProductIndex");
        assert_eq!(index.settings()["number_of_replicas"], 1);

        let bare: IndexDefinition =
            serde_json::from_value(json!({"base_name": "EverythingIndex"})).unwrap();
        assert_eq!(bare.settings(), &json!({}));
    }

    #[test]
    fn test_associations_in_registration_order() {
        let products = Arc::new(IndexDefinition::new("ProductIndex"));
        let everything = Arc::new(IndexDefinition::new("EverythingIndex"));

        let registry = IndexRegistry::builder()
            .register::<Product>(Arc::clone(&products))
            .register_with::<Product>(Arc::clone(&everything), Arc::new(id_only))
            .register::<Store>(Arc::clone(&everything))
            .build();

        let associations = registry.associations_for::<Product>();
        assert_eq!(associations.len(), 2);
        assert_eq!(associations[0].index.base_name(), "ProductIndex");
        assert!(associations[0].serializer.is_none());
        assert_eq!(associations[1].index.base_name(), "EverythingIndex");
        assert!(associations[1].serializer.is_some());

        assert_eq!(registry.associations_for::<Store>().len(), 1);
        assert_eq!(registry.model_names(), &["Product", "Store"]);
    }

    #[test]
    fn test_definitions_are_deduplicated() {
        let everything = Arc::new(IndexDefinition::new("EverythingIndex"));
        let registry = IndexRegistry::builder()
            .register::<Product>(Arc::clone(&everything))
            .register::<Store>(Arc::clone(&everything))
            .register_index(Arc::new(IndexDefinition::new("ArchiveIndex")))
            .build();

        let names: Vec<&str> = registry.definitions().iter().map(|d| d.base_name()).collect();
        assert_eq!(names, vec!["EverythingIndex", "ArchiveIndex"]);
    }

    #[test]
    fn test_conflicting_definition_keeps_first() {
        let registry = IndexRegistry::builder()
            .register::<Product>(Arc::new(
                IndexDefinition::new("ProductIndex").with_settings(json!({"number_of_replicas": 1})),
            ))
            .register::<Store>(Arc::new(
                IndexDefinition::new("ProductIndex").with_settings(json!({"number_of_replicas": 3})),
            ))
            .build();

        assert_eq!(registry.definitions().len(), 1);
        assert_eq!(
            registry.definitions()[0].settings(),
            &json!({"number_of_replicas": 1})
        );
        assert_eq!(registry.associations_for::<Store>().len(), 1);
    }

    #[test]
    fn test_unregistered_model_has_no_associations() {
        let registry = IndexRegistry::builder().build();
        assert!(registry.associations_for::<Product>().is_empty());
    }
}
