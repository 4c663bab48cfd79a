//! Checkout, order history and coupons.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use nest_commerce::checkout::{CheckoutRequest, Coupon, CouponCheck, CouponDraft, Order, StatusUpdate};
use nest_commerce::ids::OrderId;
use nest_commerce::Money;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, AuthUser, StaffUser};
use crate::state::AppState;

/// Coupon lookup against a prospective subtotal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckCoupon {
    pub code: String,
    /// Subtotal in major units, e.g. `100.00`.
    pub subtotal: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", get(order))
        .route("/orders/{id}/cancel", post(cancel_order))
        .route("/orders/{id}/status", put(update_status))
        .route("/coupons", post(create_coupon))
        .route("/coupons/check", post(check_coupon))
}

#[tracing::instrument(name = "GET /orders", skip_all, fields(user_id = %user.id()))]
async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Order>>, ApiError> {
    let id = user.id();
    Ok(Json(state.with_store(move |store| store.orders(id)).await?))
}

#[tracing::instrument(name = "POST /orders", skip_all, fields(user_id = %user.id()))]
async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let id = user.id();
    let order = state
        .with_store(move |store| store.create_order(id, &request))
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[tracing::instrument(name = "GET /orders/{id}", skip_all, fields(user_id = %user.id(), order_id = %order_id))]
async fn order(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(order_id): ApiPath<OrderId>,
) -> Result<Json<Order>, ApiError> {
    let id = user.id();
    Ok(Json(state.with_store(move |store| store.order(id, order_id)).await?))
}

#[tracing::instrument(name = "POST /orders/{id}/cancel", skip_all, fields(user_id = %user.id(), order_id = %order_id))]
async fn cancel_order(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(order_id): ApiPath<OrderId>,
) -> Result<Json<Order>, ApiError> {
    let id = user.id();
    Ok(Json(
        state
            .with_store(move |store| store.cancel_order(id, order_id))
            .await?,
    ))
}

#[tracing::instrument(name = "PUT /orders/{id}/status", skip_all, fields(staff_id = %staff.0.id(), order_id = %order_id))]
async fn update_status(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiPath(order_id): ApiPath<OrderId>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(
        state
            .with_store(move |store| store.update_order_status(order_id, &update))
            .await?,
    ))
}

#[tracing::instrument(name = "POST /coupons/check", skip_all, fields(user_id = %user.id(), code = %body.code))]
async fn check_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<CheckCoupon>,
) -> Result<Json<CouponCheck>, ApiError> {
    if !body.subtotal.is_finite() || body.subtotal < 0.0 {
        return Err(ApiError::bad_request("subtotal must not be negative"));
    }
    let subtotal = Money::from_decimal(body.subtotal, state.store.settings().currency);
    Ok(Json(
        state
            .with_store(move |store| store.check_coupon(&body.code, subtotal.amount_cents))
            .await?,
    ))
}

#[tracing::instrument(name = "POST /coupons", skip_all, fields(staff_id = %staff.0.id()))]
async fn create_coupon(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiJson(draft): ApiJson<CouponDraft>,
) -> Result<(StatusCode, Json<Coupon>), ApiError> {
    let coupon = state.with_store(move |store| store.create_coupon(&draft)).await?;
    Ok((StatusCode::CREATED, Json(coupon)))
}
