//! Wishlist persistence.

use super::catalog::find_active_book;
use super::{current_timestamp, Store};
use crate::cart::{WishlistItem, WishlistToggle};
use crate::error::CommerceError;
use crate::ids::{BookId, UserId, WishlistItemId};
use crate::money::Money;
use nest_db::{params, Executor};
use serde::Deserialize;

#[derive(Deserialize)]
struct WishlistRow {
    id: WishlistItemId,
    user_id: UserId,
    book_id: BookId,
    title: String,
    slug: String,
    cover_image: Option<String>,
    price_cents: i64,
    discount_price_cents: Option<i64>,
    stock: i64,
    added_at: i64,
}

impl Store {
    /// The user's wishlist, most recently added first.
    pub fn wishlist(&self, user_id: UserId) -> Result<Vec<WishlistItem>, CommerceError> {
        let rows: Vec<WishlistRow> = self.db().query_as(
            "SELECT w.id, w.user_id, w.book_id, b.title, b.slug, b.cover_image, b.price_cents, \
             b.discount_price_cents, b.stock, w.added_at \
             FROM wishlist_items w JOIN books b ON b.id = w.book_id \
             WHERE w.user_id = ? ORDER BY w.added_at DESC, w.id DESC",
            params![user_id],
        )?;
        let currency = self.settings().currency;
        Ok(rows
            .into_iter()
            .map(|r| WishlistItem {
                id: r.id,
                user_id: r.user_id,
                book_id: r.book_id,
                title: r.title,
                slug: r.slug,
                cover_image: r.cover_image,
                final_price: Money::new(r.discount_price_cents.unwrap_or(r.price_cents), currency),
                in_stock: r.stock > 0,
                added_at: r.added_at,
            })
            .collect())
    }

    /// Add the book to the wishlist, or remove it if it is already there.
    pub fn toggle_wishlist(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<WishlistToggle, CommerceError> {
        let currency = self.settings().currency;
        self.db().transaction(|tx| {
            find_active_book(tx, book_id, currency)?;
            let removed = tx.execute(
                "DELETE FROM wishlist_items WHERE user_id = ? AND book_id = ?",
                params![user_id, book_id],
            )?;
            if removed > 0 {
                return Ok(WishlistToggle {
                    book_id,
                    in_wishlist: false,
                });
            }
            tx.execute(
                "INSERT INTO wishlist_items (user_id, book_id, added_at) VALUES (?, ?, ?)",
                params![user_id, book_id, current_timestamp()],
            )?;
            Ok(WishlistToggle {
                book_id,
                in_wishlist: true,
            })
        })
    }
}
