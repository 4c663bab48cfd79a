//! Commerce error types.

use crate::checkout::CouponRejection;
use crate::ids::{AddressId, BookId, CartItemId, OrderId, ReviewId};
use thiserror::Error;

/// Errors that can occur in bookstore operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Book not found (or not active).
    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    /// No active book has this slug.
    #[error("Book not found: {0}")]
    BookSlugNotFound(String),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Author not found.
    #[error("Author not found: {0}")]
    AuthorNotFound(String),

    /// Publisher not found.
    #[error("Publisher not found: {0}")]
    PublisherNotFound(String),

    /// Item not in the user's cart.
    #[error("Item not in cart: {0}")]
    CartItemNotFound(CartItemId),

    /// Address not found for this user.
    #[error("Address not found: {0}")]
    AddressNotFound(AddressId),

    /// Order not found for this user.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Review not found.
    #[error("Review not found: {0}")]
    ReviewNotFound(ReviewId),

    /// Insufficient stock.
    #[error("Insufficient stock for book {book_id}: requested {requested}, available {available}")]
    InsufficientStock {
        book_id: BookId,
        requested: i64,
        available: i64,
    },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A required field was missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Unknown coupon code.
    #[error("Invalid coupon code: {0}")]
    InvalidCouponCode(String),

    /// Coupon exists but cannot be used right now.
    #[error("{0}")]
    CouponRejected(CouponRejection),

    /// Order is past the point where it can be cancelled.
    #[error("Order cannot be cancelled in status {0}")]
    OrderNotCancellable(String),

    /// Cancelled and refunded orders keep their status.
    #[error("Order is {0} and its status can no longer change")]
    OrderClosed(String),

    /// The user already reviewed this book.
    #[error("You have already reviewed this book")]
    DuplicateReview,

    /// The caller does not own the resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Database error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl CommerceError {
    /// Check if this error refers to a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CommerceError::BookNotFound(_)
                | CommerceError::BookSlugNotFound(_)
                | CommerceError::CategoryNotFound(_)
                | CommerceError::AuthorNotFound(_)
                | CommerceError::PublisherNotFound(_)
                | CommerceError::CartItemNotFound(_)
                | CommerceError::AddressNotFound(_)
                | CommerceError::OrderNotFound(_)
                | CommerceError::ReviewNotFound(_)
        )
    }

    /// Check if this error was caused by invalid input or a rejected
    /// business rule.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CommerceError::InsufficientStock { .. }
                | CommerceError::InvalidQuantity(_)
                | CommerceError::QuantityExceedsLimit(..)
                | CommerceError::EmptyCart
                | CommerceError::MissingField(_)
                | CommerceError::InvalidCouponCode(_)
                | CommerceError::CouponRejected(_)
                | CommerceError::OrderNotCancellable(_)
                | CommerceError::OrderClosed(_)
                | CommerceError::DuplicateReview
                | CommerceError::CurrencyMismatch { .. }
                | CommerceError::ValidationError(_)
        )
    }

    /// Check if this is a permission error.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, CommerceError::Forbidden(_))
    }
}

impl From<CouponRejection> for CommerceError {
    fn from(r: CouponRejection) -> Self {
        CommerceError::CouponRejected(r)
    }
}

#[cfg(feature = "storage")]
impl From<nest_db::DbError> for CommerceError {
    fn from(e: nest_db::DbError) -> Self {
        if e.is_constraint_violation() {
            CommerceError::ValidationError(e.to_string())
        } else {
            CommerceError::DatabaseError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
