//! SQLite-backed persistence for the bookstore.
//!
//! [`Store`] wraps a shared [`Db`] together with the pricing settings the
//! rows are interpreted with. Its operations are split by area across the
//! submodules; every multi-row write runs inside one transaction.

mod addresses;
mod cart;
mod catalog;
mod coupons;
mod orders;
mod reviews;
mod wishlist;

pub use reviews::recompute_book_rating;

use crate::error::CommerceError;
use crate::money::{Currency, Money};
use nest_db::Db;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Pricing settings applied to every stored amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Currency of every stored amount.
    pub currency: Currency,
    /// Flat shipping charge added to each order, in minor units.
    pub shipping_cost_cents: i64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            currency: Currency::USD,
            shipping_cost_cents: 0,
        }
    }
}

/// Repository over the bookstore schema.
#[derive(Clone)]
pub struct Store {
    db: Arc<Db>,
    settings: StoreSettings,
}

impl Store {
    /// Create a store over an already migrated database.
    pub fn new(db: Arc<Db>, settings: StoreSettings) -> Self {
        Self { db, settings }
    }

    /// Get the underlying database.
    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Check the database answers.
    pub fn ping(&self) -> Result<(), CommerceError> {
        self.db.ping().map_err(CommerceError::from)
    }

    fn money(&self, cents: i64) -> Money {
        Money::new(cents, self.settings.currency)
    }

    fn shipping_cost(&self) -> Money {
        self.money(self.settings.shipping_cost_cents)
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
