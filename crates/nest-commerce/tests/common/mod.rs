//! Shared fixtures for the storage tests.

#![allow(dead_code)]

use nest_commerce::prelude::*;
use nest_db::{params, Db, Executor};
use std::sync::Arc;

pub fn store() -> Store {
    let db = Db::open_in_memory().expect("open in-memory db");
    db.migrate().expect("migrate");
    Store::new(Arc::new(db), StoreSettings::default())
}

pub fn store_with_shipping(shipping_cost_cents: i64) -> Store {
    let db = Db::open_in_memory().expect("open in-memory db");
    db.migrate().expect("migrate");
    Store::new(
        Arc::new(db),
        StoreSettings {
            shipping_cost_cents,
            ..StoreSettings::default()
        },
    )
}

/// Insert a customer account directly.
pub fn user(store: &Store, username: &str) -> UserId {
    let id = store
        .db()
        .insert(
            "INSERT INTO users (username, email, password_hash, created_at, updated_at) \
             VALUES (?, ?, 'x', 0, 0)",
            params![username, format!("{}@example.com", username)],
        )
        .expect("insert user");
    UserId::new(id)
}

pub fn book(store: &Store, title: &str, price_cents: i64, stock: i64) -> Book {
    store
        .create_book(&BookDraft::new(title, price_cents, stock))
        .expect("create book")
}

pub fn shipping() -> ShippingDetails {
    ShippingDetails::new("12 Navoi St", "Tashkent", "+998901234567")
}

pub fn checkout() -> CheckoutRequest {
    CheckoutRequest::new(shipping())
}

pub fn stock_of(store: &Store, id: BookId) -> i64 {
    store
        .db()
        .query_scalar("SELECT stock FROM books WHERE id = ?", params![id])
        .expect("stock")
}

/// Force an order into a status without going through the status API.
pub fn set_status(store: &Store, order: OrderId, status: OrderStatus) {
    store
        .db()
        .execute(
            "UPDATE orders SET status = ? WHERE id = ?",
            params![status.as_str(), order],
        )
        .expect("set status");
}

pub fn coupon(store: &Store, code: &str, percentage: Option<f64>, amount_cents: Option<i64>) -> Coupon {
    let now = chrono::Utc::now().timestamp();
    store
        .create_coupon(&CouponDraft {
            code: code.to_string(),
            discount_percentage: percentage,
            discount_amount_cents: amount_cents,
            min_purchase_cents: 0,
            max_uses: 10,
            valid_from: now - 3600,
            valid_to: now + 86_400,
            is_active: true,
        })
        .expect("create coupon")
}
