//! Wishlist types.

use crate::ids::{BookId, UserId, WishlistItemId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A book saved for later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub title: String,
    pub slug: String,
    pub cover_image: Option<String>,
    pub final_price: Money,
    pub in_stock: bool,
    /// Unix timestamp when the book was saved.
    pub added_at: i64,
}

/// Result of toggling a book on the wishlist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WishlistToggle {
    pub book_id: BookId,
    /// Whether the book is on the wishlist after the toggle.
    pub in_wishlist: bool,
}

impl WishlistToggle {
    pub fn message(&self) -> &'static str {
        if self.in_wishlist {
            "Added to wishlist"
        } else {
            "Removed from wishlist"
        }
    }
}
