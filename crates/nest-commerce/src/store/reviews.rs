//! Review persistence and the book rating rollup.

use super::catalog::find_active_book;
use super::{current_timestamp, Store};
use crate::error::CommerceError;
use crate::ids::{BookId, ReviewId, UserId};
use crate::review::{RatingSummary, Review, ReviewDraft, ReviewUpdate};
use nest_db::{params, Executor};
use serde::Deserialize;

const REVIEW_SELECT: &str = "SELECT r.id, r.book_id, r.user_id, u.username, r.rating, r.title, \
    r.comment, r.is_verified_purchase, r.helpful_count, r.created_at, r.updated_at \
    FROM reviews r JOIN users u ON u.id = r.user_id";

#[derive(Deserialize)]
struct ReviewRow {
    id: ReviewId,
    book_id: BookId,
    user_id: UserId,
    username: String,
    rating: i64,
    title: String,
    comment: String,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    is_verified_purchase: bool,
    helpful_count: i64,
    created_at: i64,
    updated_at: i64,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            book_id: row.book_id,
            user_id: row.user_id,
            username: row.username,
            rating: row.rating,
            title: row.title,
            comment: row.comment,
            is_verified_purchase: row.is_verified_purchase,
            helpful_count: row.helpful_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Deserialize)]
struct RatingRow {
    rating: i64,
}

/// Recompute a book's rating and review count from its reviews and write
/// them back onto the book. Running it twice gives the same result.
pub fn recompute_book_rating<E: Executor>(
    ex: &E,
    book_id: BookId,
) -> Result<RatingSummary, CommerceError> {
    let rows: Vec<RatingRow> = ex.query_as(
        "SELECT rating FROM reviews WHERE book_id = ?",
        params![book_id],
    )?;
    let summary = RatingSummary::from_ratings(rows.into_iter().map(|r| r.rating));
    ex.execute(
        "UPDATE books SET rating = ?, review_count = ? WHERE id = ?",
        params![summary.average, summary.count, book_id],
    )?;
    tracing::debug!(
        book_id = %book_id,
        rating = summary.average,
        count = summary.count,
        "book rating recomputed"
    );
    Ok(summary)
}

fn find_review<E: Executor>(ex: &E, id: ReviewId) -> Result<Review, CommerceError> {
    ex.query_optional::<ReviewRow>(&format!("{} WHERE r.id = ?", REVIEW_SELECT), params![id])?
        .map(Review::from)
        .ok_or(CommerceError::ReviewNotFound(id))
}

/// Whether the user has a delivered order containing the book.
fn has_delivered_purchase<E: Executor>(
    ex: &E,
    user_id: UserId,
    book_id: BookId,
) -> Result<bool, CommerceError> {
    let found = ex.query_scalar(
        "SELECT EXISTS (SELECT 1 FROM orders o JOIN order_items oi ON oi.order_id = o.id \
         WHERE o.user_id = ? AND o.status = 'delivered' AND oi.book_id = ?)",
        params![user_id, book_id],
    )?;
    Ok(found != 0)
}

impl Store {
    /// Reviews of a book, newest first.
    pub fn reviews_for_book(&self, book_id: BookId) -> Result<Vec<Review>, CommerceError> {
        let rows: Vec<ReviewRow> = self.db().query_as(
            &format!(
                "{} WHERE r.book_id = ? ORDER BY r.created_at DESC, r.id DESC",
                REVIEW_SELECT
            ),
            params![book_id],
        )?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    pub fn review(&self, id: ReviewId) -> Result<Review, CommerceError> {
        find_review(self.db(), id)
    }

    /// Write a review. One per user and book.
    pub fn create_review(&self, user_id: UserId, draft: &ReviewDraft) -> Result<Review, CommerceError> {
        draft.validate()?;
        let currency = self.settings().currency;
        let review = self.db().transaction(|tx| {
            find_active_book(tx, draft.book_id, currency)?;
            let existing = tx.query_scalar(
                "SELECT COUNT(*) FROM reviews WHERE book_id = ? AND user_id = ?",
                params![draft.book_id, user_id],
            )?;
            if existing > 0 {
                return Err(CommerceError::DuplicateReview);
            }

            let verified = has_delivered_purchase(tx, user_id, draft.book_id)?;
            let now = current_timestamp();
            let id = ReviewId::new(tx.insert(
                "INSERT INTO reviews (book_id, user_id, rating, title, comment, \
                 is_verified_purchase, helpful_count, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)",
                params![
                    draft.book_id,
                    user_id,
                    draft.rating,
                    draft.title.trim(),
                    draft.comment.trim(),
                    verified,
                    now,
                    now
                ],
            )?);
            recompute_book_rating(tx, draft.book_id)?;
            find_review(tx, id)
        })?;
        tracing::info!(
            review_id = %review.id,
            book_id = %review.book_id,
            verified = review.is_verified_purchase,
            "review created"
        );
        Ok(review)
    }

    /// Edit a review. Only its author may.
    pub fn update_review(
        &self,
        user_id: UserId,
        id: ReviewId,
        update: &ReviewUpdate,
    ) -> Result<Review, CommerceError> {
        update.validate()?;
        self.db().transaction(|tx| {
            let mut review = find_review(tx, id)?;
            if review.user_id != user_id {
                return Err(CommerceError::Forbidden(
                    "only the author can edit this review".into(),
                ));
            }
            update.apply(&mut review);
            tx.execute(
                "UPDATE reviews SET rating = ?, title = ?, comment = ?, updated_at = ? WHERE id = ?",
                params![
                    review.rating,
                    &review.title,
                    &review.comment,
                    current_timestamp(),
                    id
                ],
            )?;
            recompute_book_rating(tx, review.book_id)?;
            find_review(tx, id)
        })
    }

    /// Delete a review. The author or staff may.
    pub fn delete_review(
        &self,
        user_id: UserId,
        id: ReviewId,
        is_staff: bool,
    ) -> Result<(), CommerceError> {
        let book_id = self.db().transaction(|tx| {
            let review = find_review(tx, id)?;
            if review.user_id != user_id && !is_staff {
                return Err(CommerceError::Forbidden(
                    "only the author can delete this review".into(),
                ));
            }
            tx.execute("DELETE FROM reviews WHERE id = ?", params![id])?;
            recompute_book_rating(tx, review.book_id)?;
            Ok(review.book_id)
        })?;
        tracing::info!(review_id = %id, book_id = %book_id, "review deleted");
        Ok(())
    }

    /// Count one more reader who found the review helpful.
    pub fn mark_review_helpful(&self, id: ReviewId) -> Result<Review, CommerceError> {
        self.db().transaction(|tx| {
            let changed = tx.execute(
                "UPDATE reviews SET helpful_count = helpful_count + 1 WHERE id = ?",
                params![id],
            )?;
            if changed == 0 {
                return Err(CommerceError::ReviewNotFound(id));
            }
            find_review(tx, id)
        })
    }
}
