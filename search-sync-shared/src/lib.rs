//! # Search Sync Shared
//!
//! This crate defines the data structures shared across the search sync crates:
//! record identity (primary keys and object identifiers) and the flat documents
//! uploaded to the remote search index.

pub mod types;

pub use types::object_id::ObjectId;
pub use types::primary_key::PrimaryKey;
pub use types::record_document::{
    Attributes, RecordDocument, MODEL_ID_KEY, MODEL_NAME_KEY, OBJECT_ID_KEY,
};
