//! Shopping cart and wishlist.

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use nest_commerce::cart::{Cart, CartSummary, WishlistItem, WishlistToggle};
use nest_commerce::ids::{BookId, CartItemId};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, AuthUser};
use crate::state::AppState;

/// A cart with its display totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    #[serde(flatten)]
    pub cart: Cart,
    pub summary: CartSummary,
}

impl CartView {
    fn new(cart: Cart) -> Result<Self, ApiError> {
        let summary = cart.summary()?;
        Ok(Self { cart, summary })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddToCart {
    pub book_id: BookId,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuantity {
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleWishlist {
    pub book_id: BookId,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart).delete(clear_cart))
        .route("/cart/items", post(add_item))
        .route("/cart/items/{id}", put(update_item).delete(remove_item))
        .route("/wishlist", get(wishlist))
        .route("/wishlist/toggle", post(toggle_wishlist))
}

#[tracing::instrument(name = "GET /cart", skip_all, fields(user_id = %user.id()))]
async fn cart(State(state): State<AppState>, user: AuthUser) -> Result<Json<CartView>, ApiError> {
    let id = user.id();
    let cart = state.with_store(move |store| store.cart(id)).await?;
    Ok(Json(CartView::new(cart)?))
}

#[tracing::instrument(name = "DELETE /cart", skip_all, fields(user_id = %user.id()))]
async fn clear_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<CartView>, ApiError> {
    let id = user.id();
    let cart = state.with_store(move |store| store.clear_cart(id)).await?;
    Ok(Json(CartView::new(cart)?))
}

#[tracing::instrument(name = "POST /cart/items", skip_all, fields(user_id = %user.id(), book_id = %body.book_id))]
async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<AddToCart>,
) -> Result<Json<CartView>, ApiError> {
    let id = user.id();
    let cart = state
        .with_store(move |store| store.add_to_cart(id, body.book_id, body.quantity))
        .await?;
    Ok(Json(CartView::new(cart)?))
}

#[tracing::instrument(name = "PUT /cart/items/{id}", skip_all, fields(user_id = %user.id(), item_id = %item_id))]
async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(item_id): ApiPath<CartItemId>,
    ApiJson(body): ApiJson<UpdateQuantity>,
) -> Result<Json<CartView>, ApiError> {
    let id = user.id();
    let cart = state
        .with_store(move |store| store.update_cart_item(id, item_id, body.quantity))
        .await?;
    Ok(Json(CartView::new(cart)?))
}

#[tracing::instrument(name = "DELETE /cart/items/{id}", skip_all, fields(user_id = %user.id(), item_id = %item_id))]
async fn remove_item(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(item_id): ApiPath<CartItemId>,
) -> Result<Json<CartView>, ApiError> {
    let id = user.id();
    let cart = state
        .with_store(move |store| store.remove_cart_item(id, item_id))
        .await?;
    Ok(Json(CartView::new(cart)?))
}

#[tracing::instrument(name = "GET /wishlist", skip_all, fields(user_id = %user.id()))]
async fn wishlist(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<WishlistItem>>, ApiError> {
    let id = user.id();
    Ok(Json(state.with_store(move |store| store.wishlist(id)).await?))
}

#[tracing::instrument(name = "POST /wishlist/toggle", skip_all, fields(user_id = %user.id(), book_id = %body.book_id))]
async fn toggle_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<ToggleWishlist>,
) -> Result<Json<WishlistToggle>, ApiError> {
    let id = user.id();
    Ok(Json(
        state
            .with_store(move |store| store.toggle_wishlist(id, body.book_id))
            .await?,
    ))
}
