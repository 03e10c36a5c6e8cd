//! Capabilities a model type exposes to the sync layer.
//!
//! Every method except `primary_key` has a default, so a model only overrides
//! what it needs: identity, indexability, or its own attribute mapping.

use serde::Serialize;
use serde_json::Value;

use search_sync_shared::{Attributes, ObjectId, PrimaryKey};

use crate::errors::SearchSyncError;

/// A record type that can be synced to search indexes.
///
/// # Example
///
/// ```
/// use search_sync::Indexable;
/// use search_sync_shared::PrimaryKey;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Product {
///     id: i64,
///     name: String,
/// }
///
/// impl Indexable for Product {
///     const MODEL_NAME: &'static str = "Product";
///
///     fn primary_key(&self) -> PrimaryKey {
///         self.id.into()
///     }
/// }
///
/// let product = Product { id: 514, name: "Widget".to_string() };
/// assert_eq!(product.base_object_id().as_str(), "Product#514");
/// ```
pub trait Indexable: Serialize + Send + Sync + 'static {
    /// Type identifier used in object ids and the `model_name` field.
    const MODEL_NAME: &'static str;

    fn primary_key(&self) -> PrimaryKey;

    /// Type identifier of this record. Defaults to `MODEL_NAME`.
    fn model_name(&self) -> String {
        Self::MODEL_NAME.to_string()
    }

    /// Identifier shared by every document produced from this record.
    fn base_object_id(&self) -> ObjectId {
        ObjectId::new(&self.model_name(), &self.primary_key())
    }

    /// Whether the record should currently be present in search indexes.
    fn is_indexable(&self) -> bool {
        true
    }

    /// The model's own single-document attribute mapping, if it defines one.
    fn search_attributes(&self) -> Option<Result<Attributes, SearchSyncError>> {
        None
    }

    /// Every serialized field of the record. Used when nothing more specific
    /// is available.
    fn all_attributes(&self) -> Result<Attributes, SearchSyncError> {
        to_attributes(self)
    }
}

/// Serialize a value into a flat attribute mapping.
///
/// # Returns
///
/// * `Ok(Attributes)` - The value's fields
/// * `Err(SearchSyncError)` - If serialization fails or the value is not a JSON object
pub fn to_attributes<T: Serialize + ?Sized>(value: &T) -> Result<Attributes, SearchSyncError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(SearchSyncError::serialization(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Tag {
        slug: String,
        uses: u32,
    }

    impl Indexable for Tag {
        const MODEL_NAME: &'static str = "Tag";

        fn primary_key(&self) -> PrimaryKey {
            self.slug.as_str().into()
        }
    }

    #[test]
    fn test_defaults() {
        let tag = Tag {
            slug: "rust".to_string(),
            uses: 3,
        };
        assert_eq!(tag.model_name(), "Tag");
        assert_eq!(tag.base_object_id().as_str(), "Tag#rust");
        assert!(tag.is_indexable());
        assert!(tag.search_attributes().is_none());
        assert_eq!(
            Value::Object(tag.all_attributes().unwrap()),
            json!({"slug": "rust", "uses": 3})
        );
    }

    #[test]
    fn test_to_attributes_rejects_non_objects() {
        let result = to_attributes(&vec![1, 2, 3]);
        assert!(matches!(result, Err(SearchSyncError::SerializationError(_))));
        assert!(to_attributes(&"text").is_err());
    }
}
