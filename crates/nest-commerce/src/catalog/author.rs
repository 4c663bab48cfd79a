//! Author types.

use crate::error::CommerceError;
use crate::ids::AuthorId;
use serde::{Deserialize, Serialize};

/// A book author.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    /// Unique author identifier.
    pub id: AuthorId,
    /// Full name.
    pub name: String,
    /// URL-friendly slug, unique across authors.
    pub slug: String,
    /// Short biography.
    pub bio: String,
    /// Birth date as `YYYY-MM-DD`.
    pub birth_date: Option<String>,
    /// Nationality.
    pub nationality: Option<String>,
    /// Number of active books by this author.
    pub book_count: i64,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

/// Input for creating or updating an author.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AuthorDraft {
    pub name: String,
    pub slug: Option<String>,
    pub bio: String,
    pub birth_date: Option<String>,
    pub nationality: Option<String>,
}

impl AuthorDraft {
    /// Create a draft with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check field constraints.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.name.trim().is_empty() {
            return Err(CommerceError::MissingField("name"));
        }
        if let Some(date) = &self.birth_date {
            chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                CommerceError::ValidationError(format!(
                    "birth_date must be YYYY-MM-DD, got {}",
                    date
                ))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_birth_date_format() {
        let mut draft = AuthorDraft::new("Frank Herbert");
        draft.birth_date = Some("1920-10-08".to_string());
        assert!(draft.validate().is_ok());

        draft.birth_date = Some("October 1920".to_string());
        assert!(draft.validate().is_err());
    }
}
