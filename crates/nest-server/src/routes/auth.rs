//! Registration, login, tokens, profile and saved addresses.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use nest_auth::{
    AccessToken, AuthError, ChangePassword, LoginRequest, ProfileUpdate, RegisterRequest,
    TokenPair, TokenType, UserAccount,
};
use nest_commerce::checkout::{Address, AddressDraft};
use nest_commerce::ids::AddressId;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, AuthUser};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/profile", get(profile).put(update_profile))
        .route("/change-password", post(change_password))
        .route("/addresses", get(list_addresses).post(create_address))
        .route("/addresses/{id}", put(update_address).delete(delete_address))
        .route("/addresses/{id}/set-default", put(set_default_address))
}

#[tracing::instrument(name = "POST /auth/register", skip_all, fields(username = %request.username))]
async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenPair>), ApiError> {
    let account = state.with_accounts(move |accounts| accounts.register(&request)).await?;
    let tokens = state.tokens.issue_pair(&account)?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

#[tracing::instrument(name = "POST /auth/login", skip_all, fields(username = %request.username))]
async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let account = state
        .with_accounts(move |accounts| accounts.authenticate(&request.username, &request.password))
        .await?;
    tracing::info!(user_id = %account.id, "login");
    Ok(Json(state.tokens.issue_pair(&account)?))
}

#[tracing::instrument(name = "POST /auth/refresh", skip_all)]
async fn refresh(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RefreshRequest>,
) -> Result<Json<AccessToken>, ApiError> {
    let claims = state.tokens.verify(&request.refresh_token, TokenType::Refresh)?;
    let user_id = claims.user_id()?;
    let account = state.with_accounts(move |accounts| accounts.get(user_id)).await?;
    if !account.is_active {
        return Err(AuthError::AccountDisabled.into());
    }
    Ok(Json(state.tokens.issue_access(&account)?))
}

#[tracing::instrument(name = "GET /auth/profile", skip_all, fields(user_id = %user.id()))]
async fn profile(user: AuthUser) -> Json<UserAccount> {
    Json(user.account)
}

#[tracing::instrument(name = "PUT /auth/profile", skip_all, fields(user_id = %user.id()))]
async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> Result<Json<UserAccount>, ApiError> {
    let id = user.id();
    let account = state
        .with_accounts(move |accounts| accounts.update_profile(id, &update))
        .await?;
    Ok(Json(account))
}

#[tracing::instrument(name = "POST /auth/change-password", skip_all, fields(user_id = %user.id()))]
async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(change): ApiJson<ChangePassword>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = user.id();
    state
        .with_accounts(move |accounts| accounts.change_password(id, &change))
        .await?;
    Ok(Json(MessageResponse {
        message: "password changed".to_string(),
    }))
}

#[tracing::instrument(name = "GET /auth/addresses", skip_all, fields(user_id = %user.id()))]
async fn list_addresses(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Address>>, ApiError> {
    let id = user.id();
    Ok(Json(state.with_store(move |store| store.addresses(id)).await?))
}

#[tracing::instrument(name = "POST /auth/addresses", skip_all, fields(user_id = %user.id()))]
async fn create_address(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(draft): ApiJson<AddressDraft>,
) -> Result<(StatusCode, Json<Address>), ApiError> {
    let id = user.id();
    let address = state
        .with_store(move |store| store.create_address(id, &draft))
        .await?;
    Ok((StatusCode::CREATED, Json(address)))
}

#[tracing::instrument(name = "PUT /auth/addresses/{id}", skip_all, fields(user_id = %user.id(), address_id = %address_id))]
async fn update_address(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(address_id): ApiPath<AddressId>,
    ApiJson(draft): ApiJson<AddressDraft>,
) -> Result<Json<Address>, ApiError> {
    let id = user.id();
    let address = state
        .with_store(move |store| store.update_address(id, address_id, &draft))
        .await?;
    Ok(Json(address))
}

#[tracing::instrument(name = "DELETE /auth/addresses/{id}", skip_all, fields(user_id = %user.id(), address_id = %address_id))]
async fn delete_address(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(address_id): ApiPath<AddressId>,
) -> Result<StatusCode, ApiError> {
    let id = user.id();
    state
        .with_store(move |store| store.delete_address(id, address_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "PUT /auth/addresses/{id}/set-default", skip_all, fields(user_id = %user.id(), address_id = %address_id))]
async fn set_default_address(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(address_id): ApiPath<AddressId>,
) -> Result<Json<Address>, ApiError> {
    let id = user.id();
    let address = state
        .with_store(move |store| store.set_default_address(id, address_id))
        .await?;
    Ok(Json(address))
}
