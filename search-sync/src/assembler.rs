//! Builds upload-ready documents from serialized attributes.

use search_sync_shared::{Attributes, RecordDocument};

use crate::identity::RecordIdentity;

/// Merge identity fields into one serialized fragment.
///
/// `objectID` equals `model_id` when `total_fragments` is 1 and carries the
/// `/<fragment_index>` suffix otherwise. Identity fields always replace
/// same-named serializer output.
pub fn assemble(
    identity: &RecordIdentity,
    attributes: Attributes,
    fragment_index: usize,
    total_fragments: usize,
) -> RecordDocument {
    RecordDocument::new(
        identity.object_id(fragment_index, total_fragments),
        identity.model_name.clone(),
        identity.model_id.clone(),
        attributes,
    )
}

/// Assemble every fragment of one record, in order.
pub fn assemble_all(identity: &RecordIdentity, fragments: Vec<Attributes>) -> Vec<RecordDocument> {
    let total = fragments.len();
    fragments
        .into_iter()
        .enumerate()
        .map(|(index, attributes)| assemble(identity, attributes, index, total))
        .collect()
}
