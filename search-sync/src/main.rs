//! Search Sync Settings Entry Point
//!
//! Pushes the static settings of every configured search index to the remote
//! service. Index definitions are read from the JSON file named by
//! `INDEX_DEFINITIONS_PATH`, an array of `{"base_name": ..., "settings": {...}}`.

use dotenv::dotenv;
use search_sync::{Dependencies, IndexDefinition, IndexRegistry, SearchSyncConfig, SearchSyncError};
use std::env;
use std::fs;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default path of the index definitions file.
const DEFAULT_INDEX_DEFINITIONS_PATH: &str = "indexes.json";

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("search_sync=info,search_sync_repository=info,search_sync_settings=info")
    });

    let json_logs = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "search-sync-settings",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "search-sync-settings",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }
}

/// Read index definitions from `path`.
fn load_definitions(path: &str) -> Result<Vec<IndexDefinition>, SearchSyncError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        SearchSyncError::config(format!("Failed to read index definitions {}: {}", path, e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        SearchSyncError::config(format!("Invalid index definitions in {}: {}", path, e))
    })
}

async fn run() -> Result<(), SearchSyncError> {
    let config = SearchSyncConfig::from_env();

    let path = env::var("INDEX_DEFINITIONS_PATH")
        .unwrap_or_else(|_| DEFAULT_INDEX_DEFINITIONS_PATH.to_string());
    let definitions = load_definitions(&path)?;
    info!(path = %path, count = definitions.len(), "Loaded index definitions");

    let registry = definitions
        .into_iter()
        .fold(IndexRegistry::builder(), |builder, definition| {
            builder.register_index(Arc::new(definition))
        })
        .build();

    let deps = Dependencies::new(&config, registry)?;
    let outcome = deps.orchestrator.push_all_settings().await?;

    if outcome.skipped {
        info!(environment = %config.environment, "Indexing disabled, no settings pushed");
    } else {
        info!("Index settings pushed successfully");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), SearchSyncError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting search settings push");

    match run().await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!(error = %e, "Search settings push failed");
            Err(e)
        }
    }
}
