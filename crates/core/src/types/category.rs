//! Provider category entries.

use serde::{Deserialize, Serialize};

use super::CategoryId;

/// A category from the provider's catalog taxonomy.
///
/// Only the fields needed to label products are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub id: CategoryId,
    pub title: String,
}

impl CategoryEntry {
    /// Create a new category entry.
    #[must_use]
    pub fn new(id: CategoryId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}
