//! Session category tags.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// Longest accepted category name, in characters.
pub const MAX_CATEGORY_LEN: usize = 50;

/// A validated category name.
///
/// Surrounding whitespace is trimmed. Two categories are the same tag when
/// their [`Category::key`]s match, regardless of case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "category" });
        }
        let len = name.chars().count();
        if len > MAX_CATEGORY_LEN {
            return Err(ValidationError::CategoryTooLong {
                len,
                max: MAX_CATEGORY_LEN,
            });
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded form used for deduplication.
    #[must_use]
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Category {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}
