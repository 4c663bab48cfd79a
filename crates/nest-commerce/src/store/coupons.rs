//! Coupon persistence.

use super::{current_timestamp, Store};
use crate::checkout::{Coupon, CouponCheck, CouponDraft};
use crate::error::CommerceError;
use crate::ids::CouponId;
use crate::money::{Currency, Money};
use nest_db::{params, Executor};
use serde::Deserialize;

const COUPON_SELECT: &str = "SELECT id, code, discount_percentage, discount_amount_cents, \
    min_purchase_cents, max_uses, used_count, valid_from, valid_to, is_active, created_at, \
    updated_at FROM coupons";

#[derive(Deserialize)]
struct CouponRow {
    id: CouponId,
    code: String,
    discount_percentage: Option<f64>,
    discount_amount_cents: Option<i64>,
    min_purchase_cents: i64,
    max_uses: i64,
    used_count: i64,
    valid_from: i64,
    valid_to: i64,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    is_active: bool,
    created_at: i64,
    updated_at: i64,
}

impl CouponRow {
    fn into_coupon(self, currency: Currency) -> Coupon {
        Coupon {
            id: self.id,
            code: self.code,
            discount_percentage: self.discount_percentage,
            discount_amount: self.discount_amount_cents.map(|c| Money::new(c, currency)),
            min_purchase: Money::new(self.min_purchase_cents, currency),
            max_uses: self.max_uses,
            used_count: self.used_count,
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Look up a coupon by code, ignoring case.
pub(super) fn find_coupon<E: Executor>(
    ex: &E,
    code: &str,
    currency: Currency,
) -> Result<Option<Coupon>, CommerceError> {
    let sql = format!("{} WHERE code = ? COLLATE NOCASE", COUPON_SELECT);
    Ok(ex
        .query_optional::<CouponRow>(&sql, params![code.trim()])?
        .map(|row| row.into_coupon(currency)))
}

impl Store {
    /// Create a coupon.
    pub fn create_coupon(&self, draft: &CouponDraft) -> Result<Coupon, CommerceError> {
        draft.validate()?;
        let now = current_timestamp();
        let code = draft.code.trim().to_uppercase();
        self.db().insert(
            "INSERT INTO coupons (code, discount_percentage, discount_amount_cents, \
             min_purchase_cents, max_uses, used_count, valid_from, valid_to, is_active, \
             created_at, updated_at) VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?, ?, ?)",
            params![
                &code,
                draft.discount_percentage,
                draft.discount_amount_cents,
                draft.min_purchase_cents,
                draft.max_uses,
                draft.valid_from,
                draft.valid_to,
                draft.is_active,
                now,
                now
            ],
        )?;
        tracing::info!(code = %code, "coupon created");
        self.coupon(&code)
    }

    /// Look up a coupon by code.
    pub fn coupon(&self, code: &str) -> Result<Coupon, CommerceError> {
        find_coupon(self.db(), code, self.settings().currency)?
            .ok_or_else(|| CommerceError::InvalidCouponCode(code.to_string()))
    }

    /// Report whether `code` applies to `subtotal_cents` and what it would
    /// take off, without redeeming it.
    pub fn check_coupon(&self, code: &str, subtotal_cents: i64) -> Result<CouponCheck, CommerceError> {
        let coupon = self.coupon(code)?;
        let subtotal = self.money(subtotal_cents);
        Ok(CouponCheck::evaluate(&coupon, &subtotal, current_timestamp()))
    }
}
