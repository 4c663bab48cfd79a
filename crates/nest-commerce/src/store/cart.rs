//! Cart persistence.

use super::catalog::find_active_book;
use super::{current_timestamp, Store};
use crate::cart::{check_quantity, Cart, CartLine};
use crate::error::CommerceError;
use crate::ids::{BookId, CartId, CartItemId, UserId};
use crate::money::{Currency, Money};
use nest_db::{params, Executor};
use serde::Deserialize;

#[derive(Deserialize)]
struct CartRow {
    id: CartId,
    user_id: UserId,
    created_at: i64,
    updated_at: i64,
}

#[derive(Deserialize)]
pub(super) struct CartLineRow {
    pub(super) id: CartItemId,
    pub(super) book_id: BookId,
    title: String,
    slug: String,
    cover_image: Option<String>,
    pub(super) price_cents: i64,
    discount_price_cents: Option<i64>,
    pub(super) quantity: i64,
    stock: i64,
    added_at: i64,
}

impl CartLineRow {
    fn into_line(self, currency: Currency) -> Result<CartLine, CommerceError> {
        let price = Money::new(self.price_cents, currency);
        let final_price = self
            .discount_price_cents
            .map(|c| Money::new(c, currency))
            .unwrap_or(price);
        let line_total = final_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(CartLine {
            id: self.id,
            book_id: self.book_id,
            title: self.title,
            slug: self.slug,
            cover_image: self.cover_image,
            price,
            final_price,
            quantity: self.quantity,
            stock: self.stock,
            line_total,
            added_at: self.added_at,
        })
    }
}

/// Get the user's cart id, creating the cart on first use.
pub(super) fn ensure_cart<E: Executor>(ex: &E, user_id: UserId) -> Result<CartId, CommerceError> {
    let now = current_timestamp();
    ex.execute(
        "INSERT OR IGNORE INTO carts (user_id, created_at, updated_at) VALUES (?, ?, ?)",
        params![user_id, now, now],
    )?;
    let id = ex.query_scalar("SELECT id FROM carts WHERE user_id = ?", params![user_id])?;
    Ok(CartId::new(id))
}

/// Raw cart lines in insertion order.
pub(super) fn cart_line_rows<E: Executor>(
    ex: &E,
    cart_id: CartId,
) -> Result<Vec<CartLineRow>, CommerceError> {
    Ok(ex.query_as(
        "SELECT ci.id, ci.book_id, b.title, b.slug, b.cover_image, b.price_cents, \
         b.discount_price_cents, ci.quantity, b.stock, ci.added_at \
         FROM cart_items ci JOIN books b ON b.id = ci.book_id \
         WHERE ci.cart_id = ? ORDER BY ci.added_at, ci.id",
        params![cart_id],
    )?)
}

fn load_cart<E: Executor>(ex: &E, user_id: UserId, currency: Currency) -> Result<Cart, CommerceError> {
    let cart_id = ensure_cart(ex, user_id)?;
    let row: CartRow = ex.query_one(
        "SELECT id, user_id, created_at, updated_at FROM carts WHERE id = ?",
        params![cart_id],
    )?;
    let items = cart_line_rows(ex, cart_id)?
        .into_iter()
        .map(|r| r.into_line(currency))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Cart {
        id: row.id,
        user_id: row.user_id,
        items,
        currency,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn touch_cart<E: Executor>(ex: &E, cart_id: CartId) -> Result<(), CommerceError> {
    ex.execute(
        "UPDATE carts SET updated_at = ? WHERE id = ?",
        params![current_timestamp(), cart_id],
    )?;
    Ok(())
}

/// Find a line in the user's cart.
fn owned_line<E: Executor>(
    ex: &E,
    cart_id: CartId,
    item_id: CartItemId,
) -> Result<(BookId, i64), CommerceError> {
    #[derive(Deserialize)]
    struct ItemRow {
        book_id: BookId,
        stock: i64,
    }

    ex.query_optional::<ItemRow>(
        "SELECT ci.book_id, b.stock FROM cart_items ci JOIN books b ON b.id = ci.book_id \
         WHERE ci.id = ? AND ci.cart_id = ?",
        params![item_id, cart_id],
    )?
    .map(|row| (row.book_id, row.stock))
    .ok_or(CommerceError::CartItemNotFound(item_id))
}

impl Store {
    /// Get the user's cart, creating it on first use.
    pub fn cart(&self, user_id: UserId) -> Result<Cart, CommerceError> {
        let currency = self.settings().currency;
        self.db().transaction(|tx| load_cart(tx, user_id, currency))
    }

    /// Add copies of a book. Adding a book already in the cart raises its
    /// quantity; the resulting quantity may not exceed stock.
    pub fn add_to_cart(
        &self,
        user_id: UserId,
        book_id: BookId,
        quantity: i64,
    ) -> Result<Cart, CommerceError> {
        let currency = self.settings().currency;
        self.db().transaction(|tx| {
            let book = find_active_book(tx, book_id, currency)?;
            check_quantity(book_id, quantity, book.stock)?;

            let cart_id = ensure_cart(tx, user_id)?;
            let existing: Option<i64> = tx
                .query(
                    "SELECT quantity FROM cart_items WHERE cart_id = ? AND book_id = ?",
                    params![cart_id, book_id],
                )?
                .first()
                .and_then(|row| row.get_index(0))
                .and_then(|v| v.as_integer());

            match existing {
                Some(current) => {
                    let combined = current + quantity;
                    check_quantity(book_id, combined, book.stock)?;
                    tx.execute(
                        "UPDATE cart_items SET quantity = ? WHERE cart_id = ? AND book_id = ?",
                        params![combined, cart_id, book_id],
                    )?;
                }
                None => {
                    tx.execute(
                        "INSERT INTO cart_items (cart_id, book_id, quantity, added_at) \
                         VALUES (?, ?, ?, ?)",
                        params![cart_id, book_id, quantity, current_timestamp()],
                    )?;
                }
            }
            touch_cart(tx, cart_id)?;
            tracing::debug!(user_id = %user_id, book_id = %book_id, quantity, "added to cart");
            load_cart(tx, user_id, currency)
        })
    }

    /// Set a line's quantity. Zero or less removes the line.
    pub fn update_cart_item(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: i64,
    ) -> Result<Cart, CommerceError> {
        let currency = self.settings().currency;
        self.db().transaction(|tx| {
            let cart_id = ensure_cart(tx, user_id)?;
            let (book_id, stock) = owned_line(tx, cart_id, item_id)?;
            if quantity <= 0 {
                tx.execute("DELETE FROM cart_items WHERE id = ?", params![item_id])?;
            } else {
                check_quantity(book_id, quantity, stock)?;
                tx.execute(
                    "UPDATE cart_items SET quantity = ? WHERE id = ?",
                    params![quantity, item_id],
                )?;
            }
            touch_cart(tx, cart_id)?;
            load_cart(tx, user_id, currency)
        })
    }

    /// Remove a line from the cart.
    pub fn remove_cart_item(&self, user_id: UserId, item_id: CartItemId) -> Result<Cart, CommerceError> {
        let currency = self.settings().currency;
        self.db().transaction(|tx| {
            let cart_id = ensure_cart(tx, user_id)?;
            owned_line(tx, cart_id, item_id)?;
            tx.execute("DELETE FROM cart_items WHERE id = ?", params![item_id])?;
            touch_cart(tx, cart_id)?;
            load_cart(tx, user_id, currency)
        })
    }

    /// Remove every line from the cart.
    pub fn clear_cart(&self, user_id: UserId) -> Result<Cart, CommerceError> {
        let currency = self.settings().currency;
        self.db().transaction(|tx| {
            let cart_id = ensure_cart(tx, user_id)?;
            tx.execute("DELETE FROM cart_items WHERE cart_id = ?", params![cart_id])?;
            touch_cart(tx, cart_id)?;
            load_cart(tx, user_id, currency)
        })
    }
}
