use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}

#[tracing::instrument(name = "GET /health", skip(state))]
async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.with_store(|store| store.ping()).await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: "ok".to_string(),
    }))
}
