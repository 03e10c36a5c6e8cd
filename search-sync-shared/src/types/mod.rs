//! This module defines the core data structures used across the search sync layer.
//! It re-exports `PrimaryKey`, `ObjectId` and `RecordDocument`.

pub mod object_id;
pub mod primary_key;
pub mod record_document;

pub use object_id::ObjectId;
pub use primary_key::PrimaryKey;
pub use record_document::RecordDocument;
