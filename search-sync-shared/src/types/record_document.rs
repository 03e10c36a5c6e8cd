//! Record document types for the remote search index.
//!
//! This module defines the flat document that is uploaded for every record
//! (or record fragment) synced to an index.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::object_id::ObjectId;

/// Flat field mapping produced by a serializer.
pub type Attributes = Map<String, Value>;

/// Reserved key holding the document's unique identifier.
pub const OBJECT_ID_KEY: &str = "objectID";

/// Reserved key holding the source record's type identifier.
pub const MODEL_NAME_KEY: &str = "model_name";

/// Reserved key holding the identifier shared by all fragments of one record.
pub const MODEL_ID_KEY: &str = "model_id";

/// Document representation for the remote search index.
///
/// Always carries the three reserved identity keys; every other field comes
/// from the serializer output. Identity keys win on collision: any reserved
/// key present in `attributes` is dropped at construction.
///
/// # Fields
///
/// - `object_id`: unique key of this document (serialized as `objectID`)
/// - `model_name`: type identifier of the source record
/// - `model_id`: base object id shared by all fragments of the source record
/// - `attributes`: remaining serialized fields, flattened into the document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordDocument {
    #[serde(rename = "objectID")]
    pub object_id: ObjectId,
    pub model_name: String,
    pub model_id: ObjectId,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl RecordDocument {
    /// Create a new document, stripping reserved keys from `attributes`.
    ///
    /// # Example
    ///
    /// ```
    /// use search_sync_shared::{ObjectId, PrimaryKey, RecordDocument};
    /// use serde_json::json;
    ///
    /// let id = ObjectId::new("Product", &PrimaryKey::from(514));
    /// let mut attributes = serde_json::Map::new();
    /// attributes.insert("name".to_string(), json!("Widget"));
    ///
    /// let doc = RecordDocument::new(id.clone(), "Product", id, attributes);
    /// assert_eq!(doc.to_value()["objectID"], "Product#514");
    /// ```
    pub fn new(
        object_id: ObjectId,
        model_name: impl Into<String>,
        model_id: ObjectId,
        mut attributes: Attributes,
    ) -> Self {
        for key in [OBJECT_ID_KEY, MODEL_NAME_KEY, MODEL_ID_KEY] {
            attributes.remove(key);
        }

        Self {
            object_id,
            model_name: model_name.into(),
            model_id,
            attributes,
        }
    }

    /// Render the document as a single JSON object.
    pub fn to_value(&self) -> Value {
        let mut object = self.attributes.clone();
        object.insert(
            OBJECT_ID_KEY.to_string(),
            Value::String(self.object_id.to_string()),
        );
        object.insert(
            MODEL_NAME_KEY.to_string(),
            Value::String(self.model_name.clone()),
        );
        object.insert(
            MODEL_ID_KEY.to_string(),
            Value::String(self.model_id.to_string()),
        );
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrimaryKey;
    use serde_json::json;

    fn attributes(value: Value) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_document_serialization() {
        let id = ObjectId::new("Product", &PrimaryKey::from(514));
        let doc = RecordDocument::new(
            id.clone(),
            "Product",
            id,
            attributes(json!({"name": "Widget"})),
        );

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "objectID": "Product#514",
                "model_name": "Product",
                "model_id": "Product#514",
                "name": "Widget"
            })
        );
        assert_eq!(doc.to_value(), value);
    }

    #[test]
    fn test_reserved_keys_win() {
        let id = ObjectId::new("Product", &PrimaryKey::from(1));
        let doc = RecordDocument::new(
            id.fragment(0),
            "Product",
            id,
            attributes(json!({
                "objectID": "spoofed",
                "model_name": "Other",
                "model_id": "Other#9",
                "price": 10
            })),
        );

        let value = doc.to_value();
        assert_eq!(value["objectID"], "Product#1/0");
        assert_eq!(value["model_name"], "Product");
        assert_eq!(value["model_id"], "Product#1");
        assert_eq!(value["price"], 10);
        assert_eq!(doc.attributes.len(), 1);
    }
}
