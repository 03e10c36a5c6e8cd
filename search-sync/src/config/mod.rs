//! Configuration for the search sync layer.
//!
//! `SearchSyncConfig` is built once at startup and passed by reference to the
//! components that need it. Every value is looked up in a `SecretStore` first,
//! then in the process environment, then falls back to a default.

mod dependencies;

pub use dependencies::Dependencies;

use std::collections::HashMap;
use std::env;

use serde::Serialize;
use tracing::warn;

use search_sync_repository::config::{DEFAULT_ENDPOINT, DEFAULT_MAX_BATCH_SIZE};
use search_sync_repository::{ClientConfig, Credentials};

/// Environment name that disables indexing unless explicitly overridden.
pub const TEST_ENVIRONMENT: &str = "test";

/// Environment name used when `APP_ENV` is unset.
pub const DEFAULT_ENVIRONMENT: &str = "development";

pub const ENDPOINT_KEY: &str = "SEARCH_ENDPOINT";
pub const ADMIN_USERNAME_KEY: &str = "SEARCH_ADMIN_USERNAME";
pub const ADMIN_PASSWORD_KEY: &str = "SEARCH_ADMIN_PASSWORD";
pub const SEARCH_USERNAME_KEY: &str = "SEARCH_ONLY_USERNAME";
pub const SEARCH_PASSWORD_KEY: &str = "SEARCH_ONLY_PASSWORD";
pub const INDEX_SUFFIX_KEY: &str = "SEARCH_INDEX_SUFFIX";
pub const INDEXING_DISABLED_KEY: &str = "SEARCH_INDEXING_DISABLED";
pub const ENVIRONMENT_KEY: &str = "APP_ENV";
pub const MAX_BATCH_SIZE_KEY: &str = "SEARCH_MAX_BATCH_SIZE";

/// Source of secret values that take precedence over environment variables.
pub trait SecretStore {
    fn secret(&self, key: &str) -> Option<String>;
}

/// A secret store with no secrets; every lookup falls through to the environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvOnly;

impl SecretStore for EnvOnly {
    fn secret(&self, _key: &str) -> Option<String> {
        None
    }
}

impl SecretStore for HashMap<String, String> {
    fn secret(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Configuration for the search sync layer.
#[derive(Debug, Clone)]
pub struct SearchSyncConfig {
    /// Search service URL.
    pub endpoint: String,
    /// Credentials for mutating calls (settings, upserts, deletes).
    pub admin_credentials: Option<Credentials>,
    /// Read-only credentials handed to search front-ends.
    pub search_credentials: Option<Credentials>,
    /// Host environment name (e.g. "production", "test").
    pub environment: String,
    /// Appended to every index name to isolate environments sharing one account.
    pub index_suffix: String,
    /// Explicit kill-switch. `None` means "decide from the environment".
    pub indexing_disabled: Option<bool>,
    /// Maximum number of documents per remote batch call.
    pub max_batch_size: Option<usize>,
}

impl Default for SearchSyncConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            admin_credentials: None,
            search_credentials: None,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            index_suffix: DEFAULT_ENVIRONMENT.to_string(),
            indexing_disabled: None,
            max_batch_size: Some(DEFAULT_MAX_BATCH_SIZE),
        }
    }
}

/// Values a search front-end needs. Never carries admin credentials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicSearchConfig {
    pub endpoint: String,
    pub index_suffix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl SearchSyncConfig {
    /// Load configuration from the process environment only.
    pub fn from_env() -> Self {
        Self::load(&EnvOnly)
    }

    /// Load configuration, preferring `secrets` over environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_ENDPOINT`: search service URL (default: http://localhost:9200)
    /// - `SEARCH_ADMIN_USERNAME` / `SEARCH_ADMIN_PASSWORD`: admin credentials
    /// - `SEARCH_ONLY_USERNAME` / `SEARCH_ONLY_PASSWORD`: search-only credentials
    /// - `APP_ENV`: environment name (default: development)
    /// - `SEARCH_INDEX_SUFFIX`: index name suffix (default: the environment name)
    /// - `SEARCH_INDEXING_DISABLED`: kill-switch override (true/false)
    /// - `SEARCH_MAX_BATCH_SIZE`: documents per batch call, or "unlimited" (default: 1000)
    pub fn load(secrets: &dyn SecretStore) -> Self {
        Self::from_lookup(|key| secrets.secret(key).or_else(|| env::var(key).ok()))
    }

    /// Build a configuration from an arbitrary key lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let environment = get(ENVIRONMENT_KEY).unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
        let index_suffix = get(INDEX_SUFFIX_KEY).unwrap_or_else(|| environment.clone());
        let endpoint = get(ENDPOINT_KEY).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let admin_credentials = match (get(ADMIN_USERNAME_KEY), get(ADMIN_PASSWORD_KEY)) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            _ => None,
        };
        let search_credentials = match (get(SEARCH_USERNAME_KEY), get(SEARCH_PASSWORD_KEY)) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            _ => None,
        };

        let indexing_disabled = get(INDEXING_DISABLED_KEY).and_then(|value| {
            let parsed = parse_flag(&value);
            if parsed.is_none() {
                warn!(value = %value, "Invalid SEARCH_INDEXING_DISABLED, ignoring");
            }
            parsed
        });

        let max_batch_size = match get(MAX_BATCH_SIZE_KEY) {
            None => Some(DEFAULT_MAX_BATCH_SIZE),
            Some(value) if value.eq_ignore_ascii_case("unlimited") => None,
            Some(value) => match value.trim().parse::<usize>() {
                Ok(size) if size > 0 => Some(size),
                _ => {
                    warn!(value = %value, "Invalid SEARCH_MAX_BATCH_SIZE, defaulting to 1000");
                    Some(DEFAULT_MAX_BATCH_SIZE)
                }
            },
        };

        Self {
            endpoint,
            admin_credentials,
            search_credentials,
            environment,
            index_suffix,
            indexing_disabled,
            max_batch_size,
        }
    }

    /// Override the index suffix.
    pub fn with_index_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.index_suffix = suffix.into();
        self
    }

    /// Set the kill-switch explicitly.
    pub fn with_indexing_disabled(mut self, disabled: bool) -> Self {
        self.indexing_disabled = Some(disabled);
        self
    }

    /// Whether remote mutating calls may happen at all.
    ///
    /// The explicit override wins; otherwise indexing is on everywhere except
    /// the test environment.
    pub fn indexing_enabled(&self) -> bool {
        match self.indexing_disabled {
            Some(disabled) => !disabled,
            None => self.environment != TEST_ENVIRONMENT,
        }
    }

    /// Client configuration using the admin credentials.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.endpoint.clone(),
            credentials: self.admin_credentials.clone(),
            max_batch_size: self.max_batch_size,
        }
    }

    /// Front-end configuration using the search-only credentials.
    pub fn public_search_config(&self) -> PublicSearchConfig {
        PublicSearchConfig {
            endpoint: self.endpoint.clone(),
            index_suffix: self.index_suffix.clone(),
            username: self.search_credentials.as_ref().map(|c| c.username.clone()),
            password: self.search_credentials.as_ref().map(|c| c.password.clone()),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> SearchSyncConfig {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SearchSyncConfig::from_lookup(|key| values.secret(key))
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.endpoint, "http://localhost:9200");
        assert_eq!(config.environment, "development");
        assert_eq!(config.index_suffix, "development");
        assert!(config.admin_credentials.is_none());
        assert_eq!(config.max_batch_size, Some(1000));
        assert!(config.indexing_enabled());
    }

    #[test]
    fn test_suffix_follows_environment() {
        let config = config_from(&[("APP_ENV", "staging")]);
        assert_eq!(config.index_suffix, "staging");

        let config = config_from(&[("APP_ENV", "staging"), ("SEARCH_INDEX_SUFFIX", "alice")]);
        assert_eq!(config.index_suffix, "alice");
    }

    #[test]
    fn test_gate_disabled_in_test_environment() {
        assert!(!config_from(&[("APP_ENV", "test")]).indexing_enabled());
        assert!(config_from(&[("APP_ENV", "production")]).indexing_enabled());
    }

    #[test]
    fn test_gate_override_wins() {
        let config = config_from(&[("APP_ENV", "test"), ("SEARCH_INDEXING_DISABLED", "false")]);
        assert!(config.indexing_enabled());

        let config = config_from(&[
            ("APP_ENV", "production"),
            ("SEARCH_INDEXING_DISABLED", "yes"),
        ]);
        assert!(!config.indexing_enabled());

        // Unparseable values fall back to the environment rule.
        let config = config_from(&[("APP_ENV", "test"), ("SEARCH_INDEXING_DISABLED", "maybe")]);
        assert_eq!(config.indexing_disabled, None);
        assert!(!config.indexing_enabled());
    }

    #[test]
    fn test_credentials_need_both_parts() {
        let config = config_from(&[("SEARCH_ADMIN_USERNAME", "admin")]);
        assert!(config.admin_credentials.is_none());

        let config = config_from(&[
            ("SEARCH_ADMIN_USERNAME", "admin"),
            ("SEARCH_ADMIN_PASSWORD", "secret"),
        ]);
        assert_eq!(
            config.client_config().credentials,
            Some(Credentials::new("admin", "secret"))
        );
    }

    #[test]
    fn test_max_batch_size_parsing() {
        assert_eq!(
            config_from(&[("SEARCH_MAX_BATCH_SIZE", "250")]).max_batch_size,
            Some(250)
        );
        assert_eq!(
            config_from(&[("SEARCH_MAX_BATCH_SIZE", "unlimited")]).max_batch_size,
            None
        );
        assert_eq!(
            config_from(&[("SEARCH_MAX_BATCH_SIZE", "0")]).max_batch_size,
            Some(1000)
        );
    }

    #[test]
    fn test_secret_store_takes_precedence() {
        let mut secrets = HashMap::new();
        secrets.insert(ENDPOINT_KEY.to_string(), "https://secret-store:9200".to_string());
        let env_values: HashMap<String, String> =
            [(ENDPOINT_KEY.to_string(), "https://env:9200".to_string())].into();

        let config =
            SearchSyncConfig::from_lookup(|key| secrets.secret(key).or_else(|| env_values.secret(key)));
        assert_eq!(config.endpoint, "https://secret-store:9200");
    }

    #[test]
    fn test_public_config_excludes_admin_credentials() {
        let config = config_from(&[
            ("SEARCH_ADMIN_USERNAME", "admin"),
            ("SEARCH_ADMIN_PASSWORD", "admin-secret"),
            ("SEARCH_ONLY_USERNAME", "reader"),
            ("SEARCH_ONLY_PASSWORD", "reader-secret"),
        ]);

        let public = config.public_search_config();
        assert_eq!(public.username.as_deref(), Some("reader"));

        let rendered = serde_json::to_string(&public).unwrap();
        assert!(!rendered.contains("admin-secret"));
        assert!(rendered.contains("reader-secret"));
    }
}
