//! Checkout input.

use crate::checkout::{PaymentMethod, ShippingDetails};
use crate::ids::AddressId;
use serde::{Deserialize, Serialize};

/// What a customer submits to turn their cart into an order.
///
/// When `address_id` names a saved address its fields replace the inline
/// shipping fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub address_id: Option<AddressId>,
    #[serde(flatten)]
    pub shipping: ShippingDetails,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl CheckoutRequest {
    /// Ship to inline details.
    pub fn new(shipping: ShippingDetails) -> Self {
        Self {
            shipping,
            ..Self::default()
        }
    }

    /// Ship to a saved address.
    pub fn to_address(address_id: AddressId) -> Self {
        Self {
            address_id: Some(address_id),
            ..Self::default()
        }
    }

    /// Redeem a coupon.
    pub fn with_coupon(mut self, code: impl Into<String>) -> Self {
        self.coupon_code = Some(code.into());
        self
    }

    /// Set the payment method.
    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    /// Coupon code with surrounding whitespace removed; blank counts as none.
    pub fn coupon(&self) -> Option<&str> {
        self.coupon_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_flat_shipping_fields() {
        let req: CheckoutRequest = serde_json::from_str(
            r#"{"shipping_address":"1 Main St","shipping_city":"Bukhara","shipping_phone":"+998","coupon_code":" SAVE10 "}"#,
        )
        .unwrap();
        assert_eq!(req.shipping.shipping_city, "Bukhara");
        assert_eq!(req.payment_method, PaymentMethod::Cash);
        assert_eq!(req.coupon(), Some("SAVE10"));
    }

    #[test]
    fn test_phone_key_fills_shipping_phone() {
        let req: CheckoutRequest = serde_json::from_str(
            r#"{"shipping_address":"1 Main St","shipping_city":"Bukhara","phone":"+998"}"#,
        )
        .unwrap();
        assert_eq!(req.shipping.shipping_phone, "+998");
        assert!(req.shipping.validate().is_ok());
    }

    #[test]
    fn test_blank_coupon_is_none() {
        let req = CheckoutRequest::to_address(AddressId::new(3)).with_coupon("   ");
        assert_eq!(req.coupon(), None);
    }
}
