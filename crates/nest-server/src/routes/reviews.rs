use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use nest_commerce::ids::{BookId, ReviewId};
use nest_commerce::review::{Review, ReviewDraft, ReviewUpdate};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, AuthUser};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewListParams {
    pub book: Option<BookId>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route("/{id}", get(review).put(update_review).delete(delete_review))
        .route("/{id}/helpful", post(mark_helpful))
}

#[tracing::instrument(name = "GET /reviews", skip(state))]
async fn list_reviews(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ReviewListParams>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let book_id = params
        .book
        .ok_or_else(|| ApiError::bad_request("book query parameter is required"))?;
    Ok(Json(state.with_store(move |store| store.reviews_for_book(book_id)).await?))
}

#[tracing::instrument(name = "GET /reviews/{id}", skip(state))]
async fn review(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ReviewId>,
) -> Result<Json<Review>, ApiError> {
    Ok(Json(state.with_store(move |store| store.review(id)).await?))
}

#[tracing::instrument(name = "POST /reviews", skip_all, fields(user_id = %user.id(), book_id = %draft.book_id))]
async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(draft): ApiJson<ReviewDraft>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let user_id = user.id();
    let review = state
        .with_store(move |store| store.create_review(user_id, &draft))
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[tracing::instrument(name = "PUT /reviews/{id}", skip_all, fields(user_id = %user.id(), review_id = %id))]
async fn update_review(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<ReviewId>,
    ApiJson(update): ApiJson<ReviewUpdate>,
) -> Result<Json<Review>, ApiError> {
    let user_id = user.id();
    Ok(Json(
        state
            .with_store(move |store| store.update_review(user_id, id, &update))
            .await?,
    ))
}

#[tracing::instrument(name = "DELETE /reviews/{id}", skip_all, fields(user_id = %user.id(), review_id = %id))]
async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<ReviewId>,
) -> Result<StatusCode, ApiError> {
    let user_id = user.id();
    let is_staff = user.is_staff();
    state
        .with_store(move |store| store.delete_review(user_id, id, is_staff))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "POST /reviews/{id}/helpful", skip_all, fields(user_id = %user.id(), review_id = %id))]
async fn mark_helpful(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<ReviewId>,
) -> Result<Json<Review>, ApiError> {
    Ok(Json(state.with_store(move |store| store.mark_review_helpful(id)).await?))
}
