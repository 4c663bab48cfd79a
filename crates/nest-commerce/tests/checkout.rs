//! Checkout, cancellation and coupon redemption against an in-memory store.

mod common;

use common::*;
use nest_commerce::prelude::*;
use nest_db::{params, Executor};

#[test]
fn test_checkout_decrements_stock_and_cancel_restores_it() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Dune", 2_500, 5);

    store.add_to_cart(alice, book.id, 3).unwrap();
    let order = store.create_order(alice, &checkout()).unwrap();

    assert_eq!(stock_of(&store, book.id), 2);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.subtotal.amount_cents, 7_500);
    assert_eq!(order.total.amount_cents, 7_500);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 3);
    assert!(order.order_number.starts_with("BN"));
    assert!(store.cart(alice).unwrap().is_empty());

    let cancelled = store.cancel_order(alice, order.id).unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(stock_of(&store, book.id), 5);
}

#[test]
fn test_multi_item_round_trip_leaves_stock_unchanged() {
    let store = store();
    let alice = user(&store, "alice");
    let a = book(&store, "Emma", 1_000, 4);
    let b = book(&store, "Persuasion", 1_200, 9);

    store.add_to_cart(alice, a.id, 2).unwrap();
    store.add_to_cart(alice, b.id, 7).unwrap();
    let order = store.create_order(alice, &checkout()).unwrap();
    assert_eq!(stock_of(&store, a.id), 2);
    assert_eq!(stock_of(&store, b.id), 2);
    assert_eq!(order.item_count(), 9);

    store.cancel_order(alice, order.id).unwrap();
    assert_eq!(stock_of(&store, a.id), 4);
    assert_eq!(stock_of(&store, b.id), 9);
}

#[test]
fn test_item_prices_are_frozen() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Ulysses", 3_000, 10);

    store.add_to_cart(alice, book.id, 1).unwrap();
    let order = store.create_order(alice, &checkout()).unwrap();

    let mut draft = BookDraft::new("Ulysses", 9_900, 10);
    draft.slug = Some(book.slug.clone());
    store.update_book(book.id, &draft).unwrap();

    let reloaded = store.order(alice, order.id).unwrap();
    assert_eq!(reloaded.items[0].price.amount_cents, 3_000);
    assert_eq!(reloaded.total.amount_cents, 3_000);
}

#[test]
fn test_subtotal_uses_list_price() {
    let store = store();
    let alice = user(&store, "alice");
    let book = store
        .create_book(&BookDraft::new("Sale", 2_000, 3).with_discount_price(1_500))
        .unwrap();

    let cart = store.add_to_cart(alice, book.id, 2).unwrap();
    assert_eq!(cart.subtotal().unwrap().amount_cents, 3_000);

    let order = store.create_order(alice, &checkout()).unwrap();
    assert_eq!(order.subtotal.amount_cents, 4_000);
}

#[test]
fn test_shipping_cost_is_added() {
    let store = store_with_shipping(500);
    let alice = user(&store, "alice");
    let book = book(&store, "Walden", 1_000, 2);

    store.add_to_cart(alice, book.id, 1).unwrap();
    let order = store.create_order(alice, &checkout()).unwrap();
    assert_eq!(order.shipping_cost.amount_cents, 500);
    assert_eq!(order.total.amount_cents, 1_500);
}

#[test]
fn test_empty_cart_rejected_before_shipping() {
    let store = store();
    let alice = user(&store, "alice");

    let err = store
        .create_order(alice, &CheckoutRequest::default())
        .unwrap_err();
    assert!(matches!(err, CommerceError::EmptyCart));
}

#[test]
fn test_missing_shipping_fields_rejected() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Beloved", 1_000, 2);
    store.add_to_cart(alice, book.id, 1).unwrap();

    let request = CheckoutRequest::new(ShippingDetails::new("1 Main St", "", "555"));
    let err = store.create_order(alice, &request).unwrap_err();
    assert!(matches!(err, CommerceError::MissingField("shipping_city")));

    let request = CheckoutRequest::new(ShippingDetails::new("1 Main St", "Samarkand", " "));
    let err = store.create_order(alice, &request).unwrap_err();
    assert!(matches!(err, CommerceError::MissingField("shipping_phone")));

    // Nothing was written.
    assert_eq!(stock_of(&store, book.id), 2);
    assert_eq!(store.cart(alice).unwrap().item_count(), 1);
    assert!(store.orders(alice).unwrap().is_empty());
}

#[test]
fn test_checkout_with_saved_address() {
    let store = store();
    let alice = user(&store, "alice");
    let bob = user(&store, "bob");
    let book = book(&store, "Middlemarch", 1_800, 3);

    let address = store
        .create_address(
            alice,
            &AddressDraft {
                full_name: "Alice A".into(),
                phone: "+998900000000".into(),
                address_line1: "7 Amir Temur".into(),
                address_line2: Some("Apt 4".into()),
                city: "Tashkent".into(),
                postal_code: "100000".into(),
                ..AddressDraft::default()
            },
        )
        .unwrap();

    store.add_to_cart(bob, book.id, 1).unwrap();
    let err = store
        .create_order(bob, &CheckoutRequest::to_address(address.id))
        .unwrap_err();
    assert!(matches!(err, CommerceError::AddressNotFound(_)));

    store.add_to_cart(alice, book.id, 1).unwrap();
    let order = store
        .create_order(alice, &CheckoutRequest::to_address(address.id))
        .unwrap();
    assert_eq!(order.address_id, Some(address.id));
    assert_eq!(order.shipping.shipping_address, "7 Amir Temur, Apt 4");
    assert_eq!(order.shipping.shipping_postal_code, "100000");
}

#[test]
fn test_cancel_rejected_once_shipped() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Hamlet", 900, 4);

    store.add_to_cart(alice, book.id, 2).unwrap();
    let order = store.create_order(alice, &checkout()).unwrap();

    for status in [OrderStatus::Shipped, OrderStatus::Delivered, OrderStatus::Cancelled] {
        set_status(&store, order.id, status);
        let err = store.cancel_order(alice, order.id).unwrap_err();
        assert!(matches!(err, CommerceError::OrderNotCancellable(_)));
        assert_eq!(stock_of(&store, book.id), 2);
    }
}

#[test]
fn test_cancel_allowed_when_confirmed() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Macbeth", 900, 4);

    store.add_to_cart(alice, book.id, 1).unwrap();
    let order = store.create_order(alice, &checkout()).unwrap();
    set_status(&store, order.id, OrderStatus::Confirmed);

    store.cancel_order(alice, order.id).unwrap();
    assert_eq!(stock_of(&store, book.id), 4);
}

#[test]
fn test_orders_are_private() {
    let store = store();
    let alice = user(&store, "alice");
    let mallory = user(&store, "mallory");
    let book = book(&store, "Othello", 900, 4);

    store.add_to_cart(alice, book.id, 1).unwrap();
    let order = store.create_order(alice, &checkout()).unwrap();

    assert!(matches!(
        store.order(mallory, order.id).unwrap_err(),
        CommerceError::OrderNotFound(_)
    ));
    assert!(matches!(
        store.cancel_order(mallory, order.id).unwrap_err(),
        CommerceError::OrderNotFound(_)
    ));
    assert!(store.orders(mallory).unwrap().is_empty());
    assert_eq!(store.orders(alice).unwrap().len(), 1);
}

#[test]
fn test_stock_can_go_negative_without_a_floor_check() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Scarce", 1_000, 2);

    store.add_to_cart(alice, book.id, 2).unwrap();
    store
        .db()
        .execute("UPDATE books SET stock = 1 WHERE id = ?", params![book.id])
        .unwrap();

    store.create_order(alice, &checkout()).unwrap();
    assert_eq!(stock_of(&store, book.id), -1);
}

#[test]
fn test_percentage_coupon_redemption() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Big", 50_000, 5);
    coupon(&store, "save10", Some(10.0), None);

    store.add_to_cart(alice, book.id, 2).unwrap();
    let order = store
        .create_order(alice, &checkout().with_coupon("SAVE10"))
        .unwrap();

    assert_eq!(order.subtotal.amount_cents, 100_000);
    assert_eq!(order.discount_amount.amount_cents, 10_000);
    assert_eq!(order.total.amount_cents, 90_000);
    assert!(order.coupon_id.is_some());
    assert_eq!(store.coupon("SAVE10").unwrap().used_count, 1);
}

#[test]
fn test_fixed_coupon_capped_at_subtotal() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Thin", 800, 5);
    coupon(&store, "FLAT", None, Some(5_000));

    store.add_to_cart(alice, book.id, 1).unwrap();
    let order = store
        .create_order(alice, &checkout().with_coupon("flat"))
        .unwrap();
    assert_eq!(order.discount_amount.amount_cents, 800);
    assert_eq!(order.total.amount_cents, 0);
}

#[test]
fn test_unknown_coupon_rolls_back() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Kept", 800, 5);

    store.add_to_cart(alice, book.id, 1).unwrap();
    let err = store
        .create_order(alice, &checkout().with_coupon("NOPE"))
        .unwrap_err();
    assert!(matches!(err, CommerceError::InvalidCouponCode(_)));
    assert_eq!(stock_of(&store, book.id), 5);
    assert_eq!(store.cart(alice).unwrap().item_count(), 1);
}

#[test]
fn test_exhausted_coupon_rejected() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Once", 800, 5);
    let now = chrono::Utc::now().timestamp();
    store
        .create_coupon(&CouponDraft {
            code: "ONCE".into(),
            discount_percentage: Some(5.0),
            discount_amount_cents: None,
            min_purchase_cents: 0,
            max_uses: 1,
            valid_from: now - 60,
            valid_to: now + 60,
            is_active: true,
        })
        .unwrap();

    store.add_to_cart(alice, book.id, 1).unwrap();
    store
        .create_order(alice, &checkout().with_coupon("ONCE"))
        .unwrap();

    store.add_to_cart(alice, book.id, 1).unwrap();
    let err = store
        .create_order(alice, &checkout().with_coupon("ONCE"))
        .unwrap_err();
    assert!(matches!(
        err,
        CommerceError::CouponRejected(CouponRejection::UsageLimitReached)
    ));
}

#[test]
fn test_cancel_keeps_coupon_usage() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Used", 1_000, 5);
    coupon(&store, "KEEP", Some(10.0), None);

    store.add_to_cart(alice, book.id, 1).unwrap();
    let order = store
        .create_order(alice, &checkout().with_coupon("KEEP"))
        .unwrap();
    store.cancel_order(alice, order.id).unwrap();
    assert_eq!(store.coupon("KEEP").unwrap().used_count, 1);
}

#[test]
fn test_check_coupon_does_not_redeem() {
    let store = store();
    coupon(&store, "PEEK", Some(10.0), None);

    let check = store.check_coupon("peek", 100_000).unwrap();
    assert!(check.valid);
    assert_eq!(check.discount_amount.amount_cents, 10_000);
    assert_eq!(store.coupon("PEEK").unwrap().used_count, 0);

    assert!(matches!(
        store.check_coupon("missing", 100).unwrap_err(),
        CommerceError::InvalidCouponCode(_)
    ));
}

#[test]
fn test_check_coupon_reports_minimum() {
    let store = store();
    let now = chrono::Utc::now().timestamp();
    store
        .create_coupon(&CouponDraft {
            code: "BIGSPEND".into(),
            discount_percentage: Some(20.0),
            discount_amount_cents: None,
            min_purchase_cents: 10_000,
            max_uses: 5,
            valid_from: now - 60,
            valid_to: now + 60,
            is_active: true,
        })
        .unwrap();

    let check = store.check_coupon("BIGSPEND", 5_000).unwrap();
    assert!(!check.valid);
    assert!(check.discount_amount.is_zero());
}

#[test]
fn test_staff_status_update_stamps_times() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Tracked", 1_000, 5);

    store.add_to_cart(alice, book.id, 1).unwrap();
    let order = store.create_order(alice, &checkout()).unwrap();

    let shipped = store
        .update_order_status(
            order.id,
            &StatusUpdate {
                status: OrderStatus::Shipped,
                tracking_number: Some("TRK-1".into()),
                is_paid: Some(true),
            },
        )
        .unwrap();
    assert_eq!(shipped.tracking_number.as_deref(), Some("TRK-1"));
    assert!(shipped.is_paid);
    assert!(shipped.paid_at.is_some());
    assert!(shipped.delivered_at.is_none());

    let delivered = store
        .update_order_status(order.id, &StatusUpdate::new(OrderStatus::Delivered))
        .unwrap();
    assert!(delivered.delivered_at.is_some());
    assert_eq!(stock_of(&store, book.id), 4);

    let reloaded = store.order(alice, order.id).unwrap();
    assert_eq!(reloaded.status, OrderStatus::Delivered);
    assert_eq!(reloaded.tracking_number.as_deref(), Some("TRK-1"));
}

#[test]
fn test_cancelled_order_cannot_be_reopened() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Dune", 2_500, 5);

    store.add_to_cart(alice, book.id, 3).unwrap();
    let order = store.create_order(alice, &checkout()).unwrap();
    store.cancel_order(alice, order.id).unwrap();
    assert_eq!(stock_of(&store, book.id), 5);

    let err = store
        .update_order_status(order.id, &StatusUpdate::new(OrderStatus::Pending))
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(store.order(alice, order.id).unwrap().status, OrderStatus::Cancelled);

    assert!(store.cancel_order(alice, order.id).is_err());
    assert_eq!(stock_of(&store, book.id), 5);
}

#[test]
fn test_delivered_order_can_be_refunded_once() {
    let store = store();
    let alice = user(&store, "alice");
    let book = book(&store, "Refundable", 1_000, 5);

    store.add_to_cart(alice, book.id, 1).unwrap();
    let order = store.create_order(alice, &checkout()).unwrap();
    store
        .update_order_status(order.id, &StatusUpdate::new(OrderStatus::Delivered))
        .unwrap();
    let refunded = store
        .update_order_status(order.id, &StatusUpdate::new(OrderStatus::Refunded))
        .unwrap();
    assert_eq!(refunded.status, OrderStatus::Refunded);

    let err = store
        .update_order_status(order.id, &StatusUpdate::new(OrderStatus::Shipped))
        .unwrap_err();
    assert!(matches!(err, CommerceError::OrderClosed(_)));
}
