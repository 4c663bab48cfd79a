//! Order pricing calculations.

use crate::checkout::Coupon;
use crate::error::CommerceError;
use crate::ids::BookId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A line priced for checkout at the book's list price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    pub book_id: BookId,
    /// Unit list price, frozen onto the order item.
    pub unit_price: Money,
    pub quantity: i64,
    /// `unit_price * quantity`.
    pub subtotal: Money,
}

impl LinePricing {
    pub fn new(book_id: BookId, unit_price: Money, quantity: i64) -> Result<Self, CommerceError> {
        let subtotal = unit_price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(Self {
            book_id,
            unit_price,
            quantity,
            subtotal,
        })
    }
}

/// Complete pricing breakdown for an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OrderTotals {
    /// Subtotal before discounts.
    pub subtotal: Money,
    /// Shipping cost.
    pub shipping_cost: Money,
    /// Coupon discount.
    pub discount_amount: Money,
    /// Final total (subtotal + shipping - discount).
    pub total: Money,
}

impl OrderTotals {
    /// Price `lines`, applying `coupon` (already validated) when given.
    pub fn compute(
        lines: &[LinePricing],
        shipping_cost: Money,
        coupon: Option<&Coupon>,
        currency: Currency,
    ) -> Result<Self, CommerceError> {
        let subtotal = Money::try_sum(lines.iter().map(|l| &l.subtotal), currency)
            .ok_or(CommerceError::Overflow)?;
        let discount_amount = coupon
            .map(|c| c.calculate_discount(&subtotal))
            .unwrap_or_else(|| Money::zero(currency));
        Self::new(subtotal, shipping_cost, discount_amount)
    }

    /// Assemble totals from their parts.
    pub fn new(
        subtotal: Money,
        shipping_cost: Money,
        discount_amount: Money,
    ) -> Result<Self, CommerceError> {
        if shipping_cost.currency != subtotal.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: subtotal.currency.code().to_string(),
                got: shipping_cost.currency.code().to_string(),
            });
        }
        let total = subtotal
            .try_add(&shipping_cost)
            .and_then(|t| t.try_subtract(&discount_amount))
            .ok_or(CommerceError::Overflow)?;
        Ok(Self {
            subtotal,
            shipping_cost,
            discount_amount,
            total,
        })
    }
}
