//! Index body handling for OpenSearch.
//!
//! An index definition's settings mapping is either a full index body
//! (`{"settings": .., "mappings": ..}`) or a flat settings object. This module
//! splits it into the parts the create-index, put-settings and put-mapping APIs
//! expect.

use serde_json::{Map, Value};

use crate::errors::SearchIndexError;

/// Settings that can only be chosen at index creation time.
const STATIC_SETTINGS: &[&str] = &["number_of_shards", "number_of_routing_shards", "codec"];

/// Settings and mappings parts of an index definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexBody {
    pub settings: Option<Value>,
    pub mappings: Option<Value>,
}

impl IndexBody {
    /// Body for the create-index API.
    pub fn create_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(settings) = &self.settings {
            body.insert("settings".to_string(), settings.clone());
        }
        if let Some(mappings) = &self.mappings {
            body.insert("mappings".to_string(), mappings.clone());
        }
        Value::Object(body)
    }
}

/// Split a settings mapping into its settings and mappings parts.
///
/// An object with neither a `settings` nor a `mappings` key is treated as a
/// flat settings object.
///
/// # Returns
///
/// * `Ok(IndexBody)` - The split parts (either may be `None`)
/// * `Err(SearchIndexError)` - If the mapping is not a JSON object
pub fn split_index_body(definition: &Value) -> Result<IndexBody, SearchIndexError> {
    let object = definition.as_object().ok_or_else(|| {
        SearchIndexError::validation("Index settings must be a JSON object".to_string())
    })?;

    if object.is_empty() {
        return Ok(IndexBody::default());
    }

    if !object.contains_key("settings") && !object.contains_key("mappings") {
        return Ok(IndexBody {
            settings: Some(definition.clone()),
            mappings: None,
        });
    }

    Ok(IndexBody {
        settings: object.get("settings").cloned(),
        mappings: object.get("mappings").cloned(),
    })
}

/// Strip settings that cannot be changed on an existing index.
///
/// Handles both `{"number_of_shards": 1}` and `{"index": {"number_of_shards": 1}}`.
pub fn dynamic_settings(settings: &Value) -> Value {
    let mut settings = settings.clone();

    if let Some(object) = settings.as_object_mut() {
        for key in STATIC_SETTINGS {
            object.remove(*key);
            object.remove(&format!("index.{}", key));
        }
        if let Some(index) = object.get_mut("index").and_then(Value::as_object_mut) {
            for key in STATIC_SETTINGS {
                index.remove(*key);
            }
        }
        // An emptied nested "index" object would be rejected.
        if object
            .get("index")
            .and_then(Value::as_object)
            .is_some_and(Map::is_empty)
        {
            object.remove("index");
        }
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_full_body() {
        let body = split_index_body(&json!({
            "settings": {"number_of_shards": 1, "number_of_replicas": 1},
            "mappings": {"properties": {"name": {"type": "text"}}}
        }))
        .unwrap();

        assert_eq!(body.settings.unwrap()["number_of_replicas"], 1);
        assert_eq!(
            body.mappings.unwrap()["properties"]["name"]["type"],
            "text"
        );
    }

    #[test]
    fn test_split_flat_settings() {
        let body = split_index_body(&json!({"number_of_replicas": 2})).unwrap();
        assert_eq!(body.settings, Some(json!({"number_of_replicas": 2})));
        assert!(body.mappings.is_none());
    }

    #[test]
    fn test_split_mappings_only() {
        let body = split_index_body(&json!({"mappings": {"properties": {}}})).unwrap();
        assert!(body.settings.is_none());
        assert!(body.mappings.is_some());
        assert_eq!(body.create_body(), json!({"mappings": {"properties": {}}}));
    }

    #[test]
    fn test_split_empty_and_invalid() {
        assert_eq!(split_index_body(&json!({})).unwrap(), IndexBody::default());
        assert!(matches!(
            split_index_body(&json!(["not", "an", "object"])),
            Err(SearchIndexError::ValidationError(_))
        ));
    }

    #[test]
    fn test_dynamic_settings_strips_static_keys() {
        let settings = dynamic_settings(&json!({
            "number_of_shards": 3,
            "index.codec": "best_compression",
            "number_of_replicas": 1
        }));
        assert_eq!(settings, json!({"number_of_replicas": 1}));
    }

    #[test]
    fn test_dynamic_settings_nested_index() {
        let settings = dynamic_settings(&json!({
            "index": {"number_of_shards": 3, "refresh_interval": "1s"}
        }));
        assert_eq!(settings, json!({"index": {"refresh_interval": "1s"}}));

        let settings = dynamic_settings(&json!({"index": {"number_of_shards": 3}}));
        assert_eq!(settings, json!({}));
    }
}
