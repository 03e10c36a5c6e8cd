//! Identity derivation for records and their fragments.

use search_sync_shared::ObjectId;

use crate::model::Indexable;

/// Type identifier and base object id of one record.
///
/// Fragment ids are derived from the base id; see [`ObjectId::for_fragment_count`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIdentity {
    pub model_name: String,
    pub model_id: ObjectId,
}

impl RecordIdentity {
    /// Derive the identity of `record` through its (possibly overridden)
    /// `model_name` and `base_object_id`.
    pub fn of<M: Indexable>(record: &M) -> Self {
        Self {
            model_name: record.model_name(),
            model_id: record.base_object_id(),
        }
    }

    /// Object id of fragment `index` out of `total`.
    ///
    /// A record producing a single document uses the base id.
    pub fn object_id(&self, index: usize, total: usize) -> ObjectId {
        if total <= 1 {
            self.model_id.clone()
        } else {
            self.model_id.fragment(index)
        }
    }

    /// All object ids for a record producing `count` documents.
    pub fn object_ids(&self, count: usize) -> Vec<ObjectId> {
        self.model_id.for_fragment_count(count)
    }
}
