//! Type-safe SQLite database layer for BookNest.
//!
//! Wraps a single SQLite connection with an ergonomic query API, typed
//! result deserialization and closure-scoped transactions.
//!
//! # Example
//!
//! ```rust,ignore
//! use nest_db::{params, Db, Executor};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Book {
//!     id: i64,
//!     title: String,
//!     stock: i64,
//! }
//!
//! let db = Db::open_in_memory()?;
//! db.migrate()?;
//!
//! let books: Vec<Book> = db.query_as(
//!     "SELECT id, title, stock FROM books WHERE stock > ?",
//!     params![0],
//! )?;
//!
//! db.transaction(|tx| {
//!     tx.execute("UPDATE books SET stock = stock - ? WHERE id = ?", params![1, 7])?;
//!     Ok::<_, nest_db::DbError>(())
//! })?;
//! ```

mod db;
mod error;
mod types;

pub use db::{Db, Executor, Tx};
pub use error::DbError;
pub use types::{QueryResult, Row, Value};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{params, Db, DbError, Executor, QueryResult, Row, Tx, Value};
}

/// Create a parameter list for SQL queries.
///
/// # Example
///
/// ```rust,ignore
/// use nest_db::params;
///
/// let params = params!["value1", 42, 3.14];
/// ```
#[macro_export]
macro_rules! params {
    () => {
        &[]
    };
    ($($param:expr),+ $(,)?) => {
        &[$($crate::Value::from($param)),+]
    };
}
