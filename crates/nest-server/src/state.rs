//! Shared application state.

use std::sync::Arc;

use nest_auth::{AccountStore, AuthError, TokenIssuer};
use nest_commerce::store::Store;
use nest_commerce::CommerceError;
use nest_db::Db;

use crate::config::ServerConfig;
use crate::error::ApiError;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub accounts: AccountStore,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    /// Build the state over an already migrated database.
    pub fn new(db: Arc<Db>, config: &ServerConfig) -> Self {
        let tokens = TokenIssuer::new(config.auth.jwt_secret.as_bytes())
            .with_access_ttl_minutes(config.auth.access_ttl_minutes)
            .with_refresh_ttl_days(config.auth.refresh_ttl_days);
        Self {
            store: Store::new(db.clone(), config.store),
            accounts: AccountStore::new(db),
            tokens: Arc::new(tokens),
        }
    }

    /// Run a store call on the blocking pool.
    pub async fn with_store<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Store) -> Result<T, CommerceError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        Ok(tokio::task::spawn_blocking(move || f(&store)).await??)
    }

    /// Run an account call on the blocking pool.
    pub async fn with_accounts<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&AccountStore) -> Result<T, AuthError> + Send + 'static,
        T: Send + 'static,
    {
        let accounts = self.accounts.clone();
        Ok(tokio::task::spawn_blocking(move || f(&accounts)).await??)
    }
}
