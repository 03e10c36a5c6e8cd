//! Primary key of a source record.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Primary key of an application record.
///
/// Object identifiers embed the key's textual form, so every variant must have a
/// stable `Display`. Text keys are percent-encoded so a key can never contain the
/// `#` or `/` separators of an object id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKey {
    Integer(i64),
    Uuid(Uuid),
    Text(String),
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(id) => write!(f, "{}", id),
            Self::Uuid(id) => write!(f, "{}", id),
            Self::Text(id) => f.write_str(&urlencoding::encode(id)),
        }
    }
}

impl From<i64> for PrimaryKey {
    fn from(id: i64) -> Self {
        Self::Integer(id)
    }
}

impl From<i32> for PrimaryKey {
    fn from(id: i32) -> Self {
        Self::Integer(i64::from(id))
    }
}

impl From<u32> for PrimaryKey {
    fn from(id: u32) -> Self {
        Self::Integer(i64::from(id))
    }
}

impl From<Uuid> for PrimaryKey {
    fn from(id: Uuid) -> Self {
        Self::Uuid(id)
    }
}

impl From<String> for PrimaryKey {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl From<&str> for PrimaryKey {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}
