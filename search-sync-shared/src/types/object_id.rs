//! Object identifiers for remote documents.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::primary_key::PrimaryKey;

/// Unique key of one document in a remote index.
///
/// The base form is `<ModelName>#<primary key>`. A record split into several
/// documents gets one fragment id per document: `<ModelName>#<primary key>/<i>`,
/// with `i` starting at 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Build the base identifier `<model_name>#<primary_key>`.
    pub fn new(model_name: &str, primary_key: &PrimaryKey) -> Self {
        Self(format!("{}#{}", model_name, primary_key))
    }

    /// Identifier of fragment `index` (0-based) derived from this base id.
    pub fn fragment(&self, index: usize) -> Self {
        Self(format!("{}/{}", self.0, index))
    }

    /// Identifiers for a record producing `count` documents.
    ///
    /// A single document keeps the base id. Two or more get fragment suffixes.
    /// Zero documents yields no identifiers.
    pub fn for_fragment_count(&self, count: usize) -> Vec<Self> {
        match count {
            0 => Vec::new(),
            1 => vec![self.clone()],
            n => (0..n).map(|i| self.fragment(i)).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
