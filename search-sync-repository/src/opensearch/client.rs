//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexClient`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials as BasicCredentials,
    http::{
        request::JsonBody,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{
        IndicesCreateParts, IndicesExistsParts, IndicesPutMappingParts, IndicesPutSettingsParts,
    },
    BulkParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use search_sync_shared::{ObjectId, RecordDocument};

use crate::config::ClientConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexClient;
use crate::opensearch::index_body::{dynamic_settings, split_index_body};
use crate::utils::normalize_index_name;

/// OpenSearch client implementation.
///
/// Writes record documents into OpenSearch indexes, using each document's
/// object id as the OpenSearch `_id` so repeated saves overwrite.
///
/// # Example
///
/// ```ignore
/// use search_sync_repository::{ClientConfig, Credentials, OpenSearchClient, SearchIndexClient};
///
/// let config = ClientConfig::new("http://localhost:9200")
///     .with_credentials(Credentials::new("admin", "admin"));
/// let client = OpenSearchClient::new(config)?;
///
/// client.set_settings("product_production", &json!({"number_of_replicas": 1})).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    config: ClientConfig,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client for the configured endpoint.
    ///
    /// No request is sent; connection problems surface on the first call.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If the endpoint URL is invalid or transport setup fails
    pub fn new(config: ClientConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(&config.endpoint).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some(credentials) = &config.credentials {
            builder = builder.auth(BasicCredentials::Basic(
                credentials.username.clone(),
                credentials.password.clone(),
            ));
        }
        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        info!(
            endpoint = %config.endpoint,
            authenticated = config.credentials.is_some(),
            max_batch_size = ?config.max_batch_size,
            "Created OpenSearch client"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
            config,
        })
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), SearchIndexError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(SearchIndexError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        match status.as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            _ => Err(SearchIndexError::settings(format!(
                "Index existence check for '{}' failed with status {}",
                index, status
            ))),
        }
    }

    /// Send a bulk body and turn per-item failures into an error.
    async fn send_bulk(
        &self,
        index: &str,
        body: Vec<JsonBody<Value>>,
        allow_not_found: bool,
    ) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_index(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let failures = bulk_failures(&response_body, allow_not_found);
        if !failures.is_empty() {
            error!(
                index = %index,
                failed = failures.len(),
                "Bulk request completed with failures"
            );
            let details = failures
                .iter()
                .map(|(id, reason)| format!("{}: {}", id, reason))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(SearchIndexError::bulk_index(details));
        }

        Ok(())
    }
}

/// Collect `(object id, reason)` for every failed item of a bulk response.
///
/// A 404 on a delete item counts as success when `allow_not_found` is set.
fn bulk_failures(response: &Value, allow_not_found: bool) -> Vec<(String, String)> {
    if !response["errors"].as_bool().unwrap_or(false) {
        return Vec::new();
    }

    let Some(items) = response["items"].as_array() else {
        return vec![(
            "<unknown>".to_string(),
            "bulk response reported errors without items".to_string(),
        )];
    };

    items
        .iter()
        .filter_map(|item| item.as_object()?.values().next())
        .filter_map(|result| {
            let status = result["status"].as_u64().unwrap_or(0);
            if (200..300).contains(&status) || (allow_not_found && status == 404) {
                return None;
            }
            let id = result["_id"].as_str().unwrap_or("<unknown>").to_string();
            let reason = result["error"]["reason"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("status {}", status));
            Some((id, reason))
        })
        .collect()
}

#[async_trait]
impl SearchIndexClient for OpenSearchClient {
    /// Push a settings mapping, creating the index first if it is missing.
    ///
    /// New indexes are created with the full body. Existing indexes receive
    /// the dynamic part of the settings and the mappings separately.
    async fn set_settings(
        &self,
        index_name: &str,
        settings: &Value,
    ) -> Result<(), SearchIndexError> {
        let index = normalize_index_name(index_name)?;
        let body = split_index_body(settings)?;

        if !self.index_exists(&index).await? {
            let response = self
                .client
                .indices()
                .create(IndicesCreateParts::Index(&index))
                .body(body.create_body())
                .send()
                .await
                .map_err(|e| SearchIndexError::settings(e.to_string()))?;

            let status = response.status_code();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                error!(status = %status, body = %error_body, "Create index request failed");
                return Err(SearchIndexError::settings(format!(
                    "Create index '{}' failed with status {}: {}",
                    index, status, error_body
                )));
            }

            info!(index = %index, "Created index with settings");
            return Ok(());
        }

        if let Some(settings) = body.settings.as_ref().map(dynamic_settings) {
            if settings.as_object().is_some_and(|s| !s.is_empty()) {
                let response = self
                    .client
                    .indices()
                    .put_settings(IndicesPutSettingsParts::Index(&[index.as_str()]))
                    .body(settings)
                    .send()
                    .await
                    .map_err(|e| SearchIndexError::settings(e.to_string()))?;

                let status = response.status_code();
                if !status.is_success() {
                    let error_body = response.text().await.unwrap_or_default();
                    error!(status = %status, body = %error_body, "Put settings request failed");
                    return Err(SearchIndexError::settings(format!(
                        "Put settings on '{}' failed with status {}: {}",
                        index, status, error_body
                    )));
                }
            }
        }

        if let Some(mappings) = body.mappings {
            let response = self
                .client
                .indices()
                .put_mapping(IndicesPutMappingParts::Index(&[index.as_str()]))
                .body(mappings)
                .send()
                .await
                .map_err(|e| SearchIndexError::settings(e.to_string()))?;

            let status = response.status_code();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                error!(status = %status, body = %error_body, "Put mapping request failed");
                return Err(SearchIndexError::settings(format!(
                    "Put mapping on '{}' failed with status {}: {}",
                    index, status, error_body
                )));
            }
        }

        info!(index = %index, "Index settings updated");
        Ok(())
    }

    /// Upsert documents with one `_bulk` request of `index` actions.
    async fn save_objects(
        &self,
        index_name: &str,
        documents: &[RecordDocument],
    ) -> Result<(), SearchIndexError> {
        if documents.is_empty() {
            return Ok(());
        }
        self.validate_batch_size(documents.len())?;
        let index = normalize_index_name(index_name)?;

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for document in documents {
            let source = serde_json::to_value(document)
                .map_err(|e| SearchIndexError::serialization(e.to_string()))?;
            body.push(json!({"index": {"_id": document.object_id.as_str()}}).into());
            body.push(source.into());
        }

        self.send_bulk(&index, body, false).await?;

        debug!(index = %index, count = documents.len(), "Documents saved");
        Ok(())
    }

    /// Delete documents with one `_bulk` request of `delete` actions.
    async fn delete_objects(
        &self,
        index_name: &str,
        object_ids: &[ObjectId],
    ) -> Result<(), SearchIndexError> {
        if object_ids.is_empty() {
            return Ok(());
        }
        self.validate_batch_size(object_ids.len())?;
        let index = normalize_index_name(index_name)?;

        let body: Vec<JsonBody<Value>> = object_ids
            .iter()
            .map(|id| json!({"delete": {"_id": id.as_str()}}).into())
            .collect();

        // 404 is acceptable - document may not exist
        self.send_bulk(&index, body, true)
            .await
            .map_err(|e| match e {
                SearchIndexError::BulkIndexError(msg) => SearchIndexError::delete(msg),
                other => other,
            })?;

        debug!(index = %index, count = object_ids.len(), "Documents deleted");
        Ok(())
    }
}
