//! Checkout module.
//!
//! Contains types for coupons, addresses, orders, and order pricing.

mod address;
mod coupon;
mod order;
mod pricing;
mod request;

pub use address::{Address, AddressDraft, ShippingDetails, DEFAULT_COUNTRY};
pub use coupon::{Coupon, CouponCheck, CouponDraft, CouponRejection, DiscountValue};
pub use order::{Order, OrderItem, OrderStatus, PaymentMethod, StatusUpdate};
pub use pricing::{LinePricing, OrderTotals};
pub use request::CheckoutRequest;
