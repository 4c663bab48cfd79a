//! Order types.

use crate::checkout::ShippingDetails;
use crate::error::CommerceError;
use crate::ids::{AddressId, BookId, CouponId, OrderId, OrderItemId, UserId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, awaiting confirmation.
    #[default]
    Pending,
    /// Order confirmed by staff.
    Confirmed,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
    /// Order refunded.
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }

    /// Cancelled and refunded orders are closed: stock has already been
    /// settled, so no further status change is accepted.
    pub fn is_closed(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Refunded)
    }

    /// Check if order can be cancelled. Only orders nobody has started
    /// preparing qualify.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }
}

/// How the customer pays. A label only; no gateway is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Paypal,
    Stripe,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::Stripe => "stripe",
        }
    }
}

/// A placed order.
///
/// Monetary fields are fixed when the order is created and never
/// recalculated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Human-readable order number, assigned once.
    pub order_number: String,
    /// Customer.
    pub user_id: UserId,
    /// Saved address the shipping details were copied from.
    pub address_id: Option<AddressId>,
    /// Where the order ships.
    pub shipping: ShippingDetails,
    /// Sum of line totals at list price.
    pub subtotal: Money,
    /// Shipping charge.
    pub shipping_cost: Money,
    /// Coupon discount.
    pub discount_amount: Money,
    /// `subtotal + shipping_cost - discount_amount`.
    pub total: Money,
    /// Coupon redeemed on this order.
    pub coupon_id: Option<CouponId>,
    /// Order status.
    pub status: OrderStatus,
    /// Payment method label.
    pub payment_method: PaymentMethod,
    /// Whether payment was received.
    pub is_paid: bool,
    /// Unix timestamp when payment was received.
    pub paid_at: Option<i64>,
    /// Customer note.
    pub notes: String,
    /// Carrier tracking number.
    pub tracking_number: Option<String>,
    /// Unix timestamp of delivery.
    pub delivered_at: Option<i64>,
    /// Items in the order.
    pub items: Vec<OrderItem>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Order {
    /// Generate a new order number (`BN` + UTC timestamp + 6 hex digits).
    pub fn generate_order_number() -> String {
        Self::order_number_at(Utc::now())
    }

    /// Generate an order number for a given instant.
    pub fn order_number_at(at: DateTime<Utc>) -> String {
        let suffix: u32 = rand::thread_rng().gen_range(0..0x0100_0000);
        format!("BN{}{:06X}", at.format("%Y%m%d%H%M%S"), suffix)
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Cancel the order.
    pub fn cancel(&mut self, now: i64) -> Result<(), CommerceError> {
        if !self.status.can_cancel() {
            return Err(CommerceError::OrderNotCancellable(
                self.status.as_str().to_string(),
            ));
        }
        self.status = OrderStatus::Cancelled;
        self.updated_at = now;
        Ok(())
    }
}

/// A line in an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Unique line identifier.
    pub id: OrderItemId,
    /// Book purchased.
    pub book_id: BookId,
    /// Book title (joined for display).
    pub title: String,
    /// Quantity ordered.
    pub quantity: i64,
    /// Unit list price at the time of purchase.
    pub price: Money,
    /// `price * quantity`.
    pub line_total: Money,
}

/// A staff status change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub is_paid: Option<bool>,
}

impl StatusUpdate {
    pub fn new(status: OrderStatus) -> Self {
        Self {
            status,
            tracking_number: None,
            is_paid: None,
        }
    }

    /// Apply to `order`, stamping delivery and payment times at `now`.
    ///
    /// Status changes never touch stock; only cancellation restores it.
    /// A closed order is left unchanged.
    pub fn apply(&self, order: &mut Order, now: i64) -> Result<(), CommerceError> {
        if order.status.is_closed() {
            return Err(CommerceError::OrderClosed(order.status.as_str().to_string()));
        }
        order.status = self.status;
        if let Some(tracking) = &self.tracking_number {
            order.tracking_number = Some(tracking.clone());
        }
        if self.status == OrderStatus::Delivered && order.delivered_at.is_none() {
            order.delivered_at = Some(now);
        }
        if let Some(paid) = self.is_paid {
            if paid && !order.is_paid {
                order.paid_at = Some(now);
            }
            if !paid {
                order.paid_at = None;
            }
            order.is_paid = paid;
        }
        order.updated_at = now;
        Ok(())
    }
}
