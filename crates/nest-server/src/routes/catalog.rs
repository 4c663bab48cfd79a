//! Categories, authors and publishers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use nest_commerce::catalog::{
    Author, AuthorDraft, Category, CategoryDraft, Publisher, PublisherDraft,
};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, StaffUser};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{slug}",
            get(category).put(update_category).delete(delete_category),
        )
        .route("/authors", get(list_authors).post(create_author))
        .route(
            "/authors/{slug}",
            get(author).put(update_author).delete(delete_author),
        )
        .route("/publishers", get(list_publishers).post(create_publisher))
        .route(
            "/publishers/{slug}",
            get(publisher).put(update_publisher).delete(delete_publisher),
        )
}

// ----- categories -----

#[tracing::instrument(name = "GET /categories", skip(state))]
async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.with_store(|store| store.list_categories()).await?))
}

#[tracing::instrument(name = "GET /categories/{slug}", skip(state))]
async fn category(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.with_store(move |store| store.category_by_slug(&slug)).await?))
}

#[tracing::instrument(name = "POST /categories", skip_all, fields(staff_id = %staff.0.id()))]
async fn create_category(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiJson(draft): ApiJson<CategoryDraft>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state.with_store(move |store| store.create_category(&draft)).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[tracing::instrument(name = "PUT /categories/{slug}", skip_all, fields(staff_id = %staff.0.id(), slug = %slug))]
async fn update_category(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiPath(slug): ApiPath<String>,
    ApiJson(draft): ApiJson<CategoryDraft>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(
        state
            .with_store(move |store| store.update_category(&slug, &draft))
            .await?,
    ))
}

#[tracing::instrument(name = "DELETE /categories/{slug}", skip_all, fields(staff_id = %staff.0.id(), slug = %slug))]
async fn delete_category(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiPath(slug): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    state.with_store(move |store| store.delete_category(&slug)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----- authors -----

#[tracing::instrument(name = "GET /authors", skip(state))]
async fn list_authors(State(state): State<AppState>) -> Result<Json<Vec<Author>>, ApiError> {
    Ok(Json(state.with_store(|store| store.list_authors()).await?))
}

#[tracing::instrument(name = "GET /authors/{slug}", skip(state))]
async fn author(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Author>, ApiError> {
    Ok(Json(state.with_store(move |store| store.author_by_slug(&slug)).await?))
}

#[tracing::instrument(name = "POST /authors", skip_all, fields(staff_id = %staff.0.id()))]
async fn create_author(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiJson(draft): ApiJson<AuthorDraft>,
) -> Result<(StatusCode, Json<Author>), ApiError> {
    let author = state.with_store(move |store| store.create_author(&draft)).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

#[tracing::instrument(name = "PUT /authors/{slug}", skip_all, fields(staff_id = %staff.0.id(), slug = %slug))]
async fn update_author(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiPath(slug): ApiPath<String>,
    ApiJson(draft): ApiJson<AuthorDraft>,
) -> Result<Json<Author>, ApiError> {
    Ok(Json(
        state
            .with_store(move |store| store.update_author(&slug, &draft))
            .await?,
    ))
}

#[tracing::instrument(name = "DELETE /authors/{slug}", skip_all, fields(staff_id = %staff.0.id(), slug = %slug))]
async fn delete_author(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiPath(slug): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    state.with_store(move |store| store.delete_author(&slug)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----- publishers -----

#[tracing::instrument(name = "GET /publishers", skip(state))]
async fn list_publishers(State(state): State<AppState>) -> Result<Json<Vec<Publisher>>, ApiError> {
    Ok(Json(state.with_store(|store| store.list_publishers()).await?))
}

#[tracing::instrument(name = "GET /publishers/{slug}", skip(state))]
async fn publisher(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Publisher>, ApiError> {
    Ok(Json(state.with_store(move |store| store.publisher_by_slug(&slug)).await?))
}

#[tracing::instrument(name = "POST /publishers", skip_all, fields(staff_id = %staff.0.id()))]
async fn create_publisher(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiJson(draft): ApiJson<PublisherDraft>,
) -> Result<(StatusCode, Json<Publisher>), ApiError> {
    let publisher = state
        .with_store(move |store| store.create_publisher(&draft))
        .await?;
    Ok((StatusCode::CREATED, Json(publisher)))
}

#[tracing::instrument(name = "PUT /publishers/{slug}", skip_all, fields(staff_id = %staff.0.id(), slug = %slug))]
async fn update_publisher(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiPath(slug): ApiPath<String>,
    ApiJson(draft): ApiJson<PublisherDraft>,
) -> Result<Json<Publisher>, ApiError> {
    Ok(Json(
        state
            .with_store(move |store| store.update_publisher(&slug, &draft))
            .await?,
    ))
}

#[tracing::instrument(name = "DELETE /publishers/{slug}", skip_all, fields(staff_id = %staff.0.id(), slug = %slug))]
async fn delete_publisher(
    State(state): State<AppState>,
    staff: StaffUser,
    ApiPath(slug): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    state.with_store(move |store| store.delete_publisher(&slug)).await?;
    Ok(StatusCode::NO_CONTENT)
}
