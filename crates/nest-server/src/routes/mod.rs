//! HTTP routes, mounted under `/api`.

use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod books;
pub mod cart;
pub mod catalog;
pub mod health;
pub mod orders;
pub mod reviews;

/// All API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/health", health::routes())
        .nest("/auth", auth::routes())
        .nest("/books", books::routes())
        .merge(catalog::routes())
        .merge(cart::routes())
        .merge(orders::routes())
        .nest("/reviews", reviews::routes())
}
