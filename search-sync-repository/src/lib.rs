//! # Search Sync Repository
//!
//! This crate provides the client interface used to mutate a remote search
//! index. It includes definitions for errors, the client trait, and a
//! concrete implementation on top of the official OpenSearch client.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod utils;

pub use config::{ClientConfig, Credentials};
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexClient;
pub use opensearch::OpenSearchClient;
pub use utils::normalize_index_name;
