//! Publisher types.

use crate::error::CommerceError;
use crate::ids::PublisherId;
use serde::{Deserialize, Serialize};

/// A publishing house.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Publisher {
    pub id: PublisherId,
    /// Name, unique across publishers.
    pub name: String,
    pub slug: String,
    pub website: Option<String>,
    /// Number of active books from this publisher.
    pub book_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for creating or updating a publisher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PublisherDraft {
    pub name: String,
    pub slug: Option<String>,
    pub website: Option<String>,
}

impl PublisherDraft {
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
        if let Some(url) = &self.website {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CommerceError::ValidationError(
                    "website must be an http(s) URL".to_string(),
                ));
            }
        }
        Ok(())
    }
}
