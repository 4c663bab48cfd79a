//! Category types for book organization.

use crate::error::CommerceError;
use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// A category in the catalog hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Parent category ID (None for root categories).
    pub parent_id: Option<CategoryId>,
    /// Category name, unique across categories.
    pub name: String,
    /// URL-friendly slug.
    pub slug: String,
    /// Category description.
    pub description: String,
    /// Icon name for the storefront menu.
    pub icon: Option<String>,
    /// Inactive categories are hidden from listings.
    pub is_active: bool,
    /// Number of active books in this category.
    pub book_count: i64,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Category {
    /// Check if this is a root category.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Input for creating or updating a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CategoryDraft {
    pub name: String,
    /// Derived from the name when absent.
    pub slug: Option<String>,
    pub description: String,
    pub icon: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub is_active: bool,
}

impl Default for CategoryDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: None,
            description: String::new(),
            icon: None,
            parent_id: None,
            is_active: true,
        }
    }
}

impl CategoryDraft {
    /// Create a draft for a root category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Nest under a parent category.
    pub fn with_parent(mut self, parent_id: CategoryId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Check field constraints. `existing` is the category being updated.
    pub fn validate(&self, existing: Option<CategoryId>) -> Result<(), CommerceError> {
        if self.name.trim().is_empty() {
            return Err(CommerceError::MissingField("name"));
        }
        if existing.is_some() && self.parent_id == existing {
            return Err(CommerceError::ValidationError(
                "a category cannot be its own parent".to_string(),
            ));
        }
        Ok(())
    }
}
