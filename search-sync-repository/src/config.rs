//! Configuration types for search index clients.

/// Default search endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9200";

/// Default maximum number of documents in one batch call.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

/// Username/password pair for the search service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Configuration for a search index client.
///
/// This struct holds the connection details and the batch limits applied to
/// every bulk call. Missing credentials are not validated here; the remote
/// service rejects the first call instead.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Search service URL (e.g. "http://localhost:9200").
    pub endpoint: String,
    /// Credentials used for mutating calls.
    pub credentials: Option<Credentials>,
    /// Maximum number of documents allowed in a single batch operation.
    ///
    /// Set to `None` to disable the limit (not recommended for production).
    /// Defaults to 1000 if not specified.
    pub max_batch_size: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credentials: None,
            max_batch_size: Some(DEFAULT_MAX_BATCH_SIZE),
        }
    }
}

impl ClientConfig {
    /// Create a config for the given endpoint with default limits.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Attach credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Remove the batch size limit.
    ///
    /// # Warning
    ///
    /// Use with caution. Removing batch size limits can lead to memory issues
    /// and timeouts when processing very large batches. Not recommended for production.
    pub fn unlimited(mut self) -> Self {
        self.max_batch_size = None;
        self
    }

    /// Set a custom batch size limit.
    ///
    /// # Arguments
    ///
    /// * `max_batch_size` - Maximum number of documents allowed in a single batch operation
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = Some(max_batch_size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.credentials.is_none());
        assert_eq!(config.max_batch_size, Some(1000));
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::new("https://search.internal:9200")
            .with_credentials(Credentials::new("admin", "hunter2"))
            .with_max_batch_size(50);
        assert_eq!(config.endpoint, "https://search.internal:9200");
        assert_eq!(config.max_batch_size, Some(50));
        assert_eq!(config.clone().unlimited().max_batch_size, None);
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("admin", "hunter2"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}
