//! Cart and cart line types.

use crate::error::CommerceError;
use crate::ids::{BookId, CartId, CartItemId, UserId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart line.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// A user's shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Owner. Each user has at most one cart.
    pub user_id: UserId,
    /// Lines in the cart, oldest first.
    pub items: Vec<CartLine>,
    /// Cart currency.
    pub currency: Currency,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Get number of distinct books.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a line by ID.
    pub fn get_item(&self, id: CartItemId) -> Option<&CartLine> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Get a line by book.
    pub fn get_item_by_book(&self, book_id: BookId) -> Option<&CartLine> {
        self.items.iter().find(|i| i.book_id == book_id)
    }

    /// Sum of line totals at the prices shoppers see.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        Money::try_sum(self.items.iter().map(|i| &i.line_total), self.currency)
            .ok_or(CommerceError::Overflow)
    }

    /// Summary for display.
    pub fn summary(&self) -> Result<CartSummary, CommerceError> {
        Ok(CartSummary {
            subtotal: self.subtotal()?,
            total_items: self.item_count(),
            unique_items: self.unique_item_count(),
        })
    }
}

/// Display totals for a cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CartSummary {
    pub subtotal: Money,
    pub total_items: i64,
    pub unique_items: usize,
}

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Unique line identifier.
    pub id: CartItemId,
    /// Book being purchased.
    pub book_id: BookId,
    /// Book title (joined for display).
    pub title: String,
    /// Book slug (joined for display).
    pub slug: String,
    /// Cover image path.
    pub cover_image: Option<String>,
    /// Current list price.
    pub price: Money,
    /// Current price shown to the shopper.
    pub final_price: Money,
    /// Quantity.
    pub quantity: i64,
    /// Units on hand right now.
    pub stock: i64,
    /// `final_price * quantity`.
    pub line_total: Money,
    /// Unix timestamp when the book was first added.
    pub added_at: i64,
}

impl CartLine {
    /// Check if the requested quantity can currently be fulfilled.
    pub fn is_available(&self) -> bool {
        self.quantity <= self.stock
    }
}

/// Check a requested line quantity against the per-line limit and stock.
pub fn check_quantity(book_id: BookId, quantity: i64, stock: i64) -> Result<(), CommerceError> {
    if quantity <= 0 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    if quantity > stock {
        return Err(CommerceError::InsufficientStock {
            book_id,
            requested: quantity,
            available: stock,
        });
    }
    Ok(())
}
