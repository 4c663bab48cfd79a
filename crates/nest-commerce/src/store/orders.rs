//! Order persistence: checkout from the cart, cancellation, status changes.

use super::addresses::owned_address;
use super::cart::{cart_line_rows, ensure_cart};
use super::coupons::find_coupon;
use super::{current_timestamp, Store};
use crate::checkout::{
    CheckoutRequest, LinePricing, Order, OrderItem, OrderStatus, OrderTotals, PaymentMethod,
    ShippingDetails, StatusUpdate,
};
use crate::error::CommerceError;
use crate::ids::{AddressId, BookId, CouponId, OrderId, OrderItemId, UserId};
use crate::money::{Currency, Money};
use nest_db::{params, Executor};
use serde::Deserialize;

const ORDER_SELECT: &str = "SELECT id, order_number, user_id, address_id, shipping_address, \
    shipping_city, shipping_postal_code, shipping_phone, subtotal_cents, shipping_cost_cents, \
    discount_amount_cents, total_cents, coupon_id, status, payment_method, is_paid, paid_at, \
    notes, tracking_number, delivered_at, created_at, updated_at FROM orders";

#[derive(Deserialize)]
struct OrderRow {
    id: OrderId,
    order_number: String,
    user_id: UserId,
    address_id: Option<AddressId>,
    shipping_address: String,
    shipping_city: String,
    shipping_postal_code: String,
    shipping_phone: String,
    subtotal_cents: i64,
    shipping_cost_cents: i64,
    discount_amount_cents: i64,
    total_cents: i64,
    coupon_id: Option<CouponId>,
    status: OrderStatus,
    payment_method: PaymentMethod,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    is_paid: bool,
    paid_at: Option<i64>,
    notes: String,
    tracking_number: Option<String>,
    delivered_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>, currency: Currency) -> Order {
        let money = |cents| Money::new(cents, currency);
        Order {
            id: self.id,
            order_number: self.order_number,
            user_id: self.user_id,
            address_id: self.address_id,
            shipping: ShippingDetails {
                shipping_address: self.shipping_address,
                shipping_city: self.shipping_city,
                shipping_postal_code: self.shipping_postal_code,
                shipping_phone: self.shipping_phone,
            },
            subtotal: money(self.subtotal_cents),
            shipping_cost: money(self.shipping_cost_cents),
            discount_amount: money(self.discount_amount_cents),
            total: money(self.total_cents),
            coupon_id: self.coupon_id,
            status: self.status,
            payment_method: self.payment_method,
            is_paid: self.is_paid,
            paid_at: self.paid_at,
            notes: self.notes,
            tracking_number: self.tracking_number,
            delivered_at: self.delivered_at,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Deserialize)]
struct OrderItemRow {
    id: OrderItemId,
    book_id: BookId,
    title: String,
    quantity: i64,
    price_cents: i64,
}

fn order_items<E: Executor>(
    ex: &E,
    order_id: OrderId,
    currency: Currency,
) -> Result<Vec<OrderItem>, CommerceError> {
    let rows: Vec<OrderItemRow> = ex.query_as(
        "SELECT oi.id, oi.book_id, b.title, oi.quantity, oi.price_cents \
         FROM order_items oi JOIN books b ON b.id = oi.book_id \
         WHERE oi.order_id = ? ORDER BY oi.id",
        params![order_id],
    )?;
    rows.into_iter()
        .map(|r| {
            let price = Money::new(r.price_cents, currency);
            Ok(OrderItem {
                id: r.id,
                book_id: r.book_id,
                title: r.title,
                quantity: r.quantity,
                price,
                line_total: price.try_multiply(r.quantity).ok_or(CommerceError::Overflow)?,
            })
        })
        .collect()
}

/// Load an order with its items. `owner` restricts the lookup to one
/// customer's orders.
fn load_order<E: Executor>(
    ex: &E,
    id: OrderId,
    owner: Option<UserId>,
    currency: Currency,
) -> Result<Order, CommerceError> {
    let row = match owner {
        Some(user_id) => ex.query_optional::<OrderRow>(
            &format!("{} WHERE id = ? AND user_id = ?", ORDER_SELECT),
            params![id, user_id],
        )?,
        None => ex.query_optional::<OrderRow>(&format!("{} WHERE id = ?", ORDER_SELECT), params![id])?,
    };
    let row = row.ok_or(CommerceError::OrderNotFound(id))?;
    let items = order_items(ex, id, currency)?;
    Ok(row.into_order(items, currency))
}

impl Store {
    /// Turn the user's cart into an order.
    ///
    /// In one transaction: price every line at the book's list price,
    /// redeem the coupon, write the order and its items, take the ordered
    /// quantities out of stock and empty the cart. Stock is decremented
    /// without a floor check.
    pub fn create_order(
        &self,
        user_id: UserId,
        request: &CheckoutRequest,
    ) -> Result<Order, CommerceError> {
        let currency = self.settings().currency;
        let shipping_cost = self.shipping_cost();

        let order_id = self.db().transaction(|tx| {
            let cart_id = ensure_cart(tx, user_id)?;
            let cart_lines = cart_line_rows(tx, cart_id)?;
            if cart_lines.is_empty() {
                return Err(CommerceError::EmptyCart);
            }

            let (address_id, shipping) = match request.address_id {
                Some(id) => {
                    let address = owned_address(tx, user_id, id)?;
                    (Some(id), ShippingDetails::from_address(&address))
                }
                None => (None, request.shipping.clone()),
            };
            shipping.validate()?;

            let lines = cart_lines
                .iter()
                .map(|l| LinePricing::new(l.book_id, Money::new(l.price_cents, currency), l.quantity))
                .collect::<Result<Vec<_>, _>>()?;
            let subtotal = Money::try_sum(lines.iter().map(|l| &l.subtotal), currency)
                .ok_or(CommerceError::Overflow)?;

            let coupon = match request.coupon() {
                Some(code) => {
                    let coupon = find_coupon(tx, code, currency)?
                        .ok_or_else(|| CommerceError::InvalidCouponCode(code.to_string()))?;
                    coupon.is_valid(&subtotal)?;
                    Some(coupon)
                }
                None => None,
            };
            let totals = OrderTotals::compute(&lines, shipping_cost, coupon.as_ref(), currency)?;

            let now = current_timestamp();
            if let Some(coupon) = &coupon {
                tx.execute(
                    "UPDATE coupons SET used_count = used_count + 1, updated_at = ? WHERE id = ?",
                    params![now, coupon.id],
                )?;
            }

            let order_id = OrderId::new(tx.insert(
                "INSERT INTO orders (order_number, user_id, address_id, shipping_address, \
                 shipping_city, shipping_postal_code, shipping_phone, subtotal_cents, \
                 shipping_cost_cents, discount_amount_cents, total_cents, coupon_id, status, \
                 payment_method, is_paid, notes, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?)",
                params![
                    Order::generate_order_number(),
                    user_id,
                    address_id,
                    shipping.shipping_address.trim(),
                    shipping.shipping_city.trim(),
                    shipping.shipping_postal_code.trim(),
                    shipping.shipping_phone.trim(),
                    totals.subtotal.amount_cents,
                    totals.shipping_cost.amount_cents,
                    totals.discount_amount.amount_cents,
                    totals.total.amount_cents,
                    coupon.as_ref().map(|c| c.id),
                    OrderStatus::Pending.as_str(),
                    request.payment_method.as_str(),
                    request.notes.trim(),
                    now,
                    now
                ],
            )?);

            for line in &lines {
                tx.execute(
                    "INSERT INTO order_items (order_id, book_id, quantity, price_cents) \
                     VALUES (?, ?, ?, ?)",
                    params![order_id, line.book_id, line.quantity, line.unit_price.amount_cents],
                )?;
                tx.execute(
                    "UPDATE books SET stock = stock - ?, updated_at = ? WHERE id = ?",
                    params![line.quantity, now, line.book_id],
                )?;
            }

            tx.execute("DELETE FROM cart_items WHERE cart_id = ?", params![cart_id])?;
            tx.execute(
                "UPDATE carts SET updated_at = ? WHERE id = ?",
                params![now, cart_id],
            )?;
            Ok(order_id)
        })?;

        let order = self.order(user_id, order_id)?;
        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            user_id = %user_id,
            total = %order.total,
            "order created"
        );
        Ok(order)
    }

    /// Cancel a pending or confirmed order and put its items back in stock.
    pub fn cancel_order(&self, user_id: UserId, id: OrderId) -> Result<Order, CommerceError> {
        let currency = self.settings().currency;
        let order = self.db().transaction(|tx| {
            let mut order = load_order(tx, id, Some(user_id), currency)?;
            let now = current_timestamp();
            order.cancel(now)?;

            for item in &order.items {
                tx.execute(
                    "UPDATE books SET stock = stock + ?, updated_at = ? WHERE id = ?",
                    params![item.quantity, now, item.book_id],
                )?;
            }
            tx.execute(
                "UPDATE orders SET status = ?, updated_at = ? WHERE id = ?",
                params![order.status.as_str(), now, id],
            )?;
            Ok::<_, CommerceError>(order)
        })?;
        tracing::info!(order_id = %id, user_id = %user_id, "order cancelled");
        Ok(order)
    }

    /// The user's orders, newest first.
    pub fn orders(&self, user_id: UserId) -> Result<Vec<Order>, CommerceError> {
        let currency = self.settings().currency;
        let rows: Vec<OrderRow> = self.db().query_as(
            &format!("{} WHERE user_id = ? ORDER BY created_at DESC, id DESC", ORDER_SELECT),
            params![user_id],
        )?;
        rows.into_iter()
            .map(|row| {
                let items = order_items(self.db(), row.id, currency)?;
                Ok(row.into_order(items, currency))
            })
            .collect()
    }

    /// One of the user's orders.
    pub fn order(&self, user_id: UserId, id: OrderId) -> Result<Order, CommerceError> {
        load_order(self.db(), id, Some(user_id), self.settings().currency)
    }

    /// Apply a staff status change. Stock is left alone, and cancelled or
    /// refunded orders are rejected so their stock is never restored twice.
    pub fn update_order_status(
        &self,
        id: OrderId,
        update: &StatusUpdate,
    ) -> Result<Order, CommerceError> {
        let currency = self.settings().currency;
        let order = self.db().transaction(|tx| {
            let mut order = load_order(tx, id, None, currency)?;
            update.apply(&mut order, current_timestamp())?;
            tx.execute(
                "UPDATE orders SET status = ?, tracking_number = ?, is_paid = ?, paid_at = ?, \
                 delivered_at = ?, updated_at = ? WHERE id = ?",
                params![
                    order.status.as_str(),
                    order.tracking_number.clone(),
                    order.is_paid,
                    order.paid_at,
                    order.delivered_at,
                    order.updated_at,
                    id
                ],
            )?;
            Ok::<_, CommerceError>(order)
        })?;
        tracing::info!(order_id = %id, status = order.status.as_str(), "order status updated");
        Ok(order)
    }
}
