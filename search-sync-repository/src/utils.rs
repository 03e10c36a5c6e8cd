//! Utility functions for the search sync repository.

use crate::errors::SearchIndexError;

/// Characters OpenSearch refuses in index names.
const FORBIDDEN_CHARS: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ' ', ',', '#', ':'];

/// Maximum index name length in bytes.
const MAX_INDEX_NAME_BYTES: usize = 255;

/// Normalize and validate an index name for OpenSearch.
///
/// Logical index names are derived from type names (`Product_production`), but
/// OpenSearch only accepts lowercase names, so the name is lowercased first.
///
/// # Arguments
///
/// * `name` - The logical index name
///
/// # Returns
///
/// * `Ok(String)` - The lowercased index name
/// * `Err(SearchIndexError)` - If the name can never be a valid index name
///
/// # Example
///
/// ```
/// use search_sync_repository::normalize_index_name;
///
/// let name = normalize_index_name("Product_staging").expect("valid name");
/// assert_eq!(name, "product_staging");
/// ```
pub fn normalize_index_name(name: &str) -> Result<String, SearchIndexError> {
    if name.is_empty() {
        return Err(SearchIndexError::validation("Index name is required"));
    }

    let normalized = name.to_lowercase();

    if normalized == "." || normalized == ".." {
        return Err(SearchIndexError::validation(format!(
            "Index name '{}' is reserved",
            name
        )));
    }

    if normalized.starts_with(['-', '_', '+']) {
        return Err(SearchIndexError::validation(format!(
            "Index name '{}' cannot start with '-', '_' or '+'",
            name
        )));
    }

    if let Some(c) = normalized.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(SearchIndexError::validation(format!(
            "Index name '{}' contains invalid character '{}'",
            name, c
        )));
    }

    if normalized.len() > MAX_INDEX_NAME_BYTES {
        return Err(SearchIndexError::validation(format!(
            "Index name '{}' is longer than {} bytes",
            name, MAX_INDEX_NAME_BYTES
        )));
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(
            normalize_index_name("EverythingIndex_development").unwrap(),
            "everythingindex_development"
        );
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(matches!(
            normalize_index_name(""),
            Err(SearchIndexError::ValidationError(_))
        ));
    }

    #[test]
    fn test_normalize_rejects_leading_underscore() {
        assert!(normalize_index_name("_products").is_err());
        assert!(normalize_index_name("-products").is_err());
        assert!(normalize_index_name("+products").is_err());
    }

    #[test]
    fn test_normalize_rejects_invalid_characters() {
        for name in ["a b", "a/b", "a#b", "a*b", "a,b", "a:b", "a|b"] {
            assert!(
                normalize_index_name(name).is_err(),
                "Expected error for index name '{}'",
                name
            );
        }
    }

    #[test]
    fn test_normalize_rejects_reserved_and_long_names() {
        assert!(normalize_index_name(".").is_err());
        assert!(normalize_index_name("..").is_err());
        assert!(normalize_index_name(&"a".repeat(256)).is_err());
        assert!(normalize_index_name(&"a".repeat(255)).is_ok());
    }
}
