//! OpenSearch implementation of the search index client.
//!
//! This module provides a concrete implementation of `SearchIndexClient`
//! using OpenSearch as the backend.

mod client;
mod index_body;

pub use client::OpenSearchClient;
pub use index_body::{dynamic_settings, split_index_body, IndexBody};
