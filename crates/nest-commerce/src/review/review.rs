//! Review types.

use crate::error::CommerceError;
use crate::ids::{BookId, ReviewId, UserId};
use serde::{Deserialize, Serialize};

/// Lowest allowed rating.
pub const MIN_RATING: i64 = 1;
/// Highest allowed rating.
pub const MAX_RATING: i64 = 5;

/// A user's review of a book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub book_id: BookId,
    pub user_id: UserId,
    /// Reviewer username (joined for display).
    pub username: String,
    /// 1 to 5 stars.
    pub rating: i64,
    pub title: String,
    pub comment: String,
    /// The reviewer had a delivered order containing the book when the
    /// review was written.
    pub is_verified_purchase: bool,
    pub helpful_count: i64,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

/// Input for writing a review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewDraft {
    pub book_id: BookId,
    pub rating: i64,
    pub title: String,
    pub comment: String,
}

impl ReviewDraft {
    pub fn new(
        book_id: BookId,
        rating: i64,
        title: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            book_id,
            rating,
            title: title.into(),
            comment: comment.into(),
        }
    }

    /// Check field constraints.
    pub fn validate(&self) -> Result<(), CommerceError> {
        validate_rating(self.rating)?;
        validate_title(&self.title)?;
        validate_comment(&self.comment)
    }
}

/// Partial edit of an existing review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ReviewUpdate {
    pub rating: Option<i64>,
    pub title: Option<String>,
    pub comment: Option<String>,
}

impl ReviewUpdate {
    /// Check the fields that are present.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(comment) = &self.comment {
            validate_comment(comment)?;
        }
        Ok(())
    }

    /// Apply present fields to `review`.
    pub fn apply(&self, review: &mut Review) {
        if let Some(rating) = self.rating {
            review.rating = rating;
        }
        if let Some(title) = &self.title {
            review.title = title.trim().to_string();
        }
        if let Some(comment) = &self.comment {
            review.comment = comment.trim().to_string();
        }
    }
}

fn validate_rating(rating: i64) -> Result<(), CommerceError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CommerceError::ValidationError(format!(
            "rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), CommerceError> {
    let len = title.trim().chars().count();
    if !(5..=200).contains(&len) {
        return Err(CommerceError::ValidationError(
            "title must be between 5 and 200 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_comment(comment: &str) -> Result<(), CommerceError> {
    if comment.trim().chars().count() < 10 {
        return Err(CommerceError::ValidationError(
            "comment must be at least 10 characters".to_string(),
        ));
    }
    Ok(())
}
