//! Coupon types.

use crate::error::CommerceError;
use crate::ids::CouponId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value of the discount a coupon grants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum DiscountValue {
    /// Percentage off (0.0 - 100.0).
    Percentage(f64),
    /// Fixed amount off.
    Fixed(Money),
}

impl DiscountValue {
    /// Calculate the discount amount for a given subtotal.
    pub fn calculate(&self, subtotal: &Money) -> Money {
        match self {
            DiscountValue::Percentage(percent) => subtotal.percentage(*percent),
            // Don't exceed subtotal
            DiscountValue::Fixed(amount) => (*amount).min(*subtotal),
        }
    }
}

/// Why a coupon cannot be applied.
///
/// Checks run in declaration order and only the first failure is reported.
#[derive(Error, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CouponRejection {
    #[error("Coupon is not active")]
    Inactive,
    #[error("Coupon is not yet valid")]
    NotYetValid,
    #[error("Coupon has expired")]
    Expired,
    #[error("Coupon usage limit reached")]
    UsageLimitReached,
    #[error("Minimum purchase of {minimum} required")]
    BelowMinimumPurchase { minimum: Money },
}

/// A discount coupon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    /// Unique coupon identifier.
    pub id: CouponId,
    /// Code shoppers enter (e.g., "SAVE10"), unique.
    pub code: String,
    /// Percentage off. Takes precedence over `discount_amount`.
    pub discount_percentage: Option<f64>,
    /// Flat amount off, capped at the subtotal.
    pub discount_amount: Option<Money>,
    /// Smallest subtotal the coupon applies to.
    pub min_purchase: Money,
    /// Maximum number of redemptions.
    pub max_uses: i64,
    /// Redemptions so far.
    pub used_count: i64,
    /// Unix timestamp the coupon becomes usable.
    pub valid_from: i64,
    /// Unix timestamp after which the coupon is expired.
    pub valid_to: i64,
    /// Whether the coupon is switched on.
    pub is_active: bool,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Coupon {
    /// Create a new percentage coupon valid over `[valid_from, valid_to]`.
    pub fn percentage(code: impl Into<String>, percent: f64, valid_from: i64, valid_to: i64) -> Self {
        let mut coupon = Self::blank(code, valid_from, valid_to);
        coupon.discount_percentage = Some(percent);
        coupon
    }

    /// Create a new fixed amount coupon valid over `[valid_from, valid_to]`.
    pub fn fixed_amount(code: impl Into<String>, amount: Money, valid_from: i64, valid_to: i64) -> Self {
        let mut coupon = Self::blank(code, valid_from, valid_to);
        coupon.discount_amount = Some(amount);
        coupon.min_purchase = Money::zero(amount.currency);
        coupon
    }

    fn blank(code: impl Into<String>, valid_from: i64, valid_to: i64) -> Self {
        let now = current_timestamp();
        Self {
            id: CouponId::new(0),
            code: code.into(),
            discount_percentage: None,
            discount_amount: None,
            min_purchase: Money::zero(Currency::default()),
            max_uses: 1,
            used_count: 0,
            valid_from,
            valid_to,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a minimum purchase condition.
    pub fn with_minimum_purchase(mut self, amount: Money) -> Self {
        self.min_purchase = amount;
        self
    }

    /// Set the redemption limit.
    pub fn with_max_uses(mut self, max_uses: i64) -> Self {
        self.max_uses = max_uses;
        self
    }

    /// The discount that actually applies, if any.
    ///
    /// A zero percentage counts as unset so a flat amount can still apply.
    pub fn effective_value(&self) -> Option<DiscountValue> {
        match (self.discount_percentage, self.discount_amount) {
            (Some(percent), _) if percent > 0.0 => Some(DiscountValue::Percentage(percent)),
            (_, Some(amount)) if amount.is_positive() => Some(DiscountValue::Fixed(amount)),
            _ => None,
        }
    }

    /// Check whether the coupon can be applied to `subtotal` right now.
    pub fn is_valid(&self, subtotal: &Money) -> Result<(), CouponRejection> {
        self.is_valid_at(subtotal, current_timestamp())
    }

    /// Check whether the coupon can be applied to `subtotal` at `now`.
    pub fn is_valid_at(&self, subtotal: &Money, now: i64) -> Result<(), CouponRejection> {
        if !self.is_active {
            return Err(CouponRejection::Inactive);
        }
        if now < self.valid_from {
            return Err(CouponRejection::NotYetValid);
        }
        if now > self.valid_to {
            return Err(CouponRejection::Expired);
        }
        if self.used_count >= self.max_uses {
            return Err(CouponRejection::UsageLimitReached);
        }
        if subtotal.amount_cents < self.min_purchase.amount_cents {
            return Err(CouponRejection::BelowMinimumPurchase {
                minimum: self.min_purchase,
            });
        }
        Ok(())
    }

    /// Discount granted on `subtotal`. Zero when the coupon carries no value.
    pub fn calculate_discount(&self, subtotal: &Money) -> Money {
        self.effective_value()
            .map(|value| value.calculate(subtotal))
            .unwrap_or_else(|| Money::zero(subtotal.currency))
    }

    /// Redemptions left before the usage limit is reached.
    pub fn remaining_uses(&self) -> i64 {
        (self.max_uses - self.used_count).max(0)
    }
}

/// Outcome of checking a code against a subtotal without redeeming it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CouponCheck {
    pub code: String,
    pub valid: bool,
    pub message: String,
    pub discount_amount: Money,
}

impl CouponCheck {
    /// Evaluate `coupon` against `subtotal` at `now`.
    pub fn evaluate(coupon: &Coupon, subtotal: &Money, now: i64) -> Self {
        match coupon.is_valid_at(subtotal, now) {
            Ok(()) => Self {
                code: coupon.code.clone(),
                valid: true,
                message: "Coupon is valid".to_string(),
                discount_amount: coupon.calculate_discount(subtotal),
            },
            Err(rejection) => Self {
                code: coupon.code.clone(),
                valid: false,
                message: rejection.to_string(),
                discount_amount: Money::zero(subtotal.currency),
            },
        }
    }
}

/// Input for creating a coupon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CouponDraft {
    pub code: String,
    #[serde(default)]
    pub discount_percentage: Option<f64>,
    #[serde(default)]
    pub discount_amount_cents: Option<i64>,
    #[serde(default)]
    pub min_purchase_cents: i64,
    #[serde(default = "default_max_uses")]
    pub max_uses: i64,
    pub valid_from: i64,
    pub valid_to: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_max_uses() -> i64 {
    1
}

fn default_active() -> bool {
    true
}

impl CouponDraft {
    /// Check field constraints.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.code.trim().is_empty() {
            return Err(CommerceError::MissingField("code"));
        }
        if matches!(self.discount_percentage, Some(p) if !(0.0..=100.0).contains(&p)) {
            return Err(CommerceError::ValidationError(
                "discount percentage must be between 0 and 100".to_string(),
            ));
        }
        if matches!(self.discount_amount_cents, Some(a) if a < 0) || self.min_purchase_cents < 0 {
            return Err(CommerceError::ValidationError(
                "coupon amounts cannot be negative".to_string(),
            ));
        }
        if self.max_uses < 0 {
            return Err(CommerceError::ValidationError(
                "max_uses cannot be negative".to_string(),
            ));
        }
        if self.valid_to < self.valid_from {
            return Err(CommerceError::ValidationError(
                "valid_to must not precede valid_from".to_string(),
            ));
        }
        Ok(())
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;
    const DAY: i64 = 86_400;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn ten_percent() -> Coupon {
        Coupon::percentage("SAVE10", 10.0, NOW - DAY, NOW + DAY).with_max_uses(5)
    }

    #[test]
    fn test_percentage_discount() {
        let coupon = ten_percent();
        assert_eq!(coupon.calculate_discount(&usd(100000)).amount_cents, 10000);
    }

    #[test]
    fn test_fixed_discount() {
        let coupon = Coupon::fixed_amount("SAVE5", usd(500), NOW - DAY, NOW + DAY);
        assert_eq!(coupon.calculate_discount(&usd(10000)).amount_cents, 500);
    }

    #[test]
    fn test_fixed_discount_capped() {
        let coupon = Coupon::fixed_amount("SAVE100", usd(10000), NOW - DAY, NOW + DAY);
        // Capped at subtotal
        assert_eq!(coupon.calculate_discount(&usd(5000)).amount_cents, 5000);
    }

    #[test]
    fn test_percentage_wins_over_fixed() {
        let mut coupon = ten_percent();
        coupon.discount_amount = Some(usd(5000));
        assert_eq!(coupon.calculate_discount(&usd(20000)).amount_cents, 2000);

        coupon.discount_percentage = Some(0.0);
        assert_eq!(coupon.calculate_discount(&usd(20000)).amount_cents, 5000);
    }

    #[test]
    fn test_no_value_means_no_discount() {
        let mut coupon = ten_percent();
        coupon.discount_percentage = None;
        assert!(coupon.calculate_discount(&usd(20000)).is_zero());
    }

    #[test]
    fn test_valid_coupon() {
        assert_eq!(ten_percent().is_valid_at(&usd(100), NOW), Ok(()));
    }

    #[test]
    fn test_rejection_order() {
        // Every check fails: inactive wins.
        let mut coupon = ten_percent().with_minimum_purchase(usd(1_000_000));
        coupon.used_count = coupon.max_uses;
        coupon.is_active = false;
        let before_start = NOW - 2 * DAY;
        assert_eq!(
            coupon.is_valid_at(&usd(1), before_start),
            Err(CouponRejection::Inactive)
        );

        coupon.is_active = true;
        assert_eq!(
            coupon.is_valid_at(&usd(1), before_start),
            Err(CouponRejection::NotYetValid)
        );

        let after_end = NOW + 2 * DAY;
        assert_eq!(
            coupon.is_valid_at(&usd(1), after_end),
            Err(CouponRejection::Expired)
        );

        assert_eq!(
            coupon.is_valid_at(&usd(1), NOW),
            Err(CouponRejection::UsageLimitReached)
        );

        coupon.used_count = 0;
        assert_eq!(
            coupon.is_valid_at(&usd(1), NOW),
            Err(CouponRejection::BelowMinimumPurchase {
                minimum: usd(1_000_000)
            })
        );
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let coupon = ten_percent();
        assert!(coupon.is_valid_at(&usd(1), coupon.valid_from).is_ok());
        assert!(coupon.is_valid_at(&usd(1), coupon.valid_to).is_ok());
    }

    #[test]
    fn test_minimum_purchase_message() {
        let rejection = CouponRejection::BelowMinimumPurchase { minimum: usd(5000) };
        assert_eq!(rejection.to_string(), "Minimum purchase of $50.00 required");
    }

    #[test]
    fn test_usage_tracking() {
        let mut coupon = ten_percent().with_max_uses(2);
        assert_eq!(coupon.remaining_uses(), 2);
        coupon.used_count = 2;
        assert_eq!(coupon.remaining_uses(), 0);
        assert_eq!(
            coupon.is_valid_at(&usd(1), NOW),
            Err(CouponRejection::UsageLimitReached)
        );
    }

    #[test]
    fn test_coupon_check() {
        let check = CouponCheck::evaluate(&ten_percent(), &usd(100000), NOW);
        assert!(check.valid);
        assert_eq!(check.discount_amount.amount_cents, 10000);

        let check = CouponCheck::evaluate(&ten_percent(), &usd(100000), NOW + 2 * DAY);
        assert!(!check.valid);
        assert_eq!(check.message, "Coupon has expired");
        assert!(check.discount_amount.is_zero());
    }

    #[test]
    fn test_draft_validation() {
        let draft = CouponDraft {
            code: "SPRING".to_string(),
            discount_percentage: Some(120.0),
            discount_amount_cents: None,
            min_purchase_cents: 0,
            max_uses: 1,
            valid_from: NOW,
            valid_to: NOW + DAY,
            is_active: true,
        };
        assert!(draft.validate().is_err());
    }
}
