//! HTTP server for the BookNest bookstore.
//!
//! [`app`] builds the axum router over an [`AppState`]; the `booknest`
//! binary wires it to configuration, logging and a listener.

pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod routes;
pub mod seed;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::not_found(format!("no route for {}", uri.path()))
}
