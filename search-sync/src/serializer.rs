//! Serializer resolution.
//!
//! Turns a record into one or more attribute mappings. The first available
//! strategy wins:
//!
//! 1. the serializer registered with the association (split output first,
//!    then single output),
//! 2. the model's own `search_attributes`,
//! 3. the model's full attribute dump.
//!
//! Falling back is silent. Errors from whichever strategy runs are returned
//! as-is; there is no fallback after a failure.

use search_sync_shared::Attributes;

use crate::errors::SearchSyncError;
use crate::model::Indexable;

/// Produces the searchable attributes of a record for one index.
///
/// Closures `Fn(&M) -> Result<Attributes, SearchSyncError>` are serializers too.
pub trait RecordSerializer<M>: Send + Sync {
    /// Attributes of a record stored as a single document.
    fn attributes(&self, record: &M) -> Result<Attributes, SearchSyncError>;

    /// Attributes of a record split into several documents, in fragment order.
    ///
    /// Returning `Ok(None)` means the serializer does not split, and
    /// `attributes` is used instead.
    fn split_attributes(&self, record: &M) -> Result<Option<Vec<Attributes>>, SearchSyncError> {
        let _ = record;
        Ok(None)
    }
}

impl<M, F> RecordSerializer<M> for F
where
    F: Fn(&M) -> Result<Attributes, SearchSyncError> + Send + Sync,
{
    fn attributes(&self, record: &M) -> Result<Attributes, SearchSyncError> {
        self(record)
    }
}

/// Which strategy produced a record's attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationStrategy {
    SplitSerializer,
    Serializer,
    ModelAttributes,
    AllAttributes,
}

/// Resolve and run the serialization strategy for `record`.
///
/// # Returns
///
/// * `Ok((strategy, fragments))` - One mapping per document, in fragment order
/// * `Err(SearchSyncError)` - If the selected strategy failed
pub fn resolve_fragments<M: Indexable>(
    record: &M,
    serializer: Option<&dyn RecordSerializer<M>>,
) -> Result<(SerializationStrategy, Vec<Attributes>), SearchSyncError> {
    if let Some(serializer) = serializer {
        if let Some(fragments) = serializer.split_attributes(record)? {
            return Ok((SerializationStrategy::SplitSerializer, fragments));
        }
        return Ok((
            SerializationStrategy::Serializer,
            vec![serializer.attributes(record)?],
        ));
    }

    if let Some(attributes) = record.search_attributes() {
        return Ok((SerializationStrategy::ModelAttributes, vec![attributes?]));
    }

    Ok((SerializationStrategy::AllAttributes, vec![record.all_attributes()?]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::to_attributes;
    use search_sync_shared::PrimaryKey;
    use serde::Serialize;
    use serde_json::{json, Value};

    #[derive(Serialize)]
    struct Post {
        id: i64,
        title: String,
        body: String,
        #[serde(skip)]
        own_attributes: bool,
    }

    impl Indexable for Post {
        const MODEL_NAME: &'static str = "Post";

        fn primary_key(&self) -> PrimaryKey {
            self.id.into()
        }

        fn search_attributes(&self) -> Option<Result<Attributes, SearchSyncError>> {
            self.own_attributes
                .then(|| to_attributes(&json!({"title": self.title})))
        }
    }

    struct ParagraphSerializer;

    impl RecordSerializer<Post> for ParagraphSerializer {
        fn attributes(&self, record: &Post) -> Result<Attributes, SearchSyncError> {
            to_attributes(&json!({"body": record.body}))
        }

        fn split_attributes(
            &self,
            record: &Post,
        ) -> Result<Option<Vec<Attributes>>, SearchSyncError> {
            record
                .body
                .split("\n\n")
                .map(|paragraph| to_attributes(&json!({"paragraph": paragraph})))
                .collect::<Result<Vec<_>, _>>()
                .map(Some)
        }
    }

    struct FailingSerializer;

    impl RecordSerializer<Post> for FailingSerializer {
        fn attributes(&self, _record: &Post) -> Result<Attributes, SearchSyncError> {
            Err(SearchSyncError::serialization("boom"))
        }
    }

    fn post(own_attributes: bool) -> Post {
        Post {
            id: 1,
            title: "Hello".to_string(),
            body: "one\n\ntwo\n\nthree".to_string(),
            own_attributes,
        }
    }

    #[test]
    fn test_split_serializer_wins() {
        let serializer: &dyn RecordSerializer<Post> = &ParagraphSerializer;
        let (strategy, fragments) = resolve_fragments(&post(true), Some(serializer)).unwrap();
        assert_eq!(strategy, SerializationStrategy::SplitSerializer);
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[2]["paragraph"], "three");
    }

    #[test]
    fn test_single_serializer() {
        let uppercase =
            |record: &Post| to_attributes(&json!({"title": record.title.to_uppercase()}));
        let serializer: &dyn RecordSerializer<Post> = &uppercase;
        let (strategy, fragments) = resolve_fragments(&post(true), Some(serializer)).unwrap();
        assert_eq!(strategy, SerializationStrategy::Serializer);
        assert_eq!(fragments, vec![to_attributes(&json!({"title": "HELLO"})).unwrap()]);
    }

    #[test]
    fn test_model_attributes_before_full_dump() {
        let (strategy, fragments) = resolve_fragments(&post(true), None).unwrap();
        assert_eq!(strategy, SerializationStrategy::ModelAttributes);
        assert_eq!(Value::Object(fragments[0].clone()), json!({"title": "Hello"}));
    }

    #[test]
    fn test_full_dump_fallback() {
        let (strategy, fragments) = resolve_fragments(&post(false), None).unwrap();
        assert_eq!(strategy, SerializationStrategy::AllAttributes);
        assert_eq!(
            Value::Object(fragments[0].clone()),
            json!({"id": 1, "title": "Hello", "body": "one\n\ntwo\n\nthree"})
        );
    }

    #[test]
    fn test_serializer_error_propagates() {
        let serializer: &dyn RecordSerializer<Post> = &FailingSerializer;
        let result = resolve_fragments(&post(true), Some(serializer));
        assert!(matches!(result, Err(SearchSyncError::SerializationError(_))));
    }
}
