//! Interface definitions for the remote search index client.
//!
//! This module defines the abstract `SearchIndexClient` trait that allows
//! for dependency injection and swappable search backend implementations.

mod search_index_client;

pub use search_index_client::SearchIndexClient;
