//! Bookstore domain types and rules for BookNest.
//!
//! - **Catalog**: books, authors, categories, publishers, slugs
//! - **Cart**: the shopping cart and the wishlist
//! - **Checkout**: coupons, addresses, orders, order totals
//! - **Review**: reviews and the rating rollup
//! - **Search**: book filters, sorting, pagination
//!
//! With the `storage` feature, [`store`] persists all of it through
//! `nest-db`.
//!
//! # Example
//!
//! ```rust
//! use nest_commerce::prelude::*;
//!
//! let coupon = Coupon::percentage("SAVE10", 10.0, 0, i64::MAX).with_max_uses(100);
//! let subtotal = Money::new(100000, Currency::USD);
//!
//! assert!(coupon.is_valid(&subtotal).is_ok());
//! assert_eq!(coupon.calculate_discount(&subtotal).amount_cents, 10000);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod review;
pub mod search;

pub mod flag;

#[cfg(feature = "storage")]
pub mod store;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        Author, AuthorDraft, Book, BookDraft, Category, CategoryDraft, Condition, Language,
        Publisher, PublisherDraft,
    };

    // Cart
    pub use crate::cart::{Cart, CartLine, CartSummary, WishlistItem, WishlistToggle};

    // Checkout
    pub use crate::checkout::{
        Address, AddressDraft, CheckoutRequest, Coupon, CouponCheck, CouponDraft, CouponRejection,
        DiscountValue, Order, OrderItem, OrderStatus, OrderTotals, PaymentMethod, ShippingDetails,
        StatusUpdate,
    };

    // Reviews
    pub use crate::review::{RatingSummary, Review, ReviewDraft, ReviewUpdate};

    // Search
    pub use crate::search::{Filter, Pagination, SearchQuery, SearchResults, SortOption};

    #[cfg(feature = "storage")]
    pub use crate::store::{Store, StoreSettings};
}
