//! Database connection and query execution.

use crate::{DbError, QueryResult, Row, Value};
use rusqlite::{params_from_iter, Connection, Transaction};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Schema applied by [`Db::migrate`].
const SCHEMA: &str = include_str!("schema.sql");

/// Query execution shared by [`Db`] and [`Tx`].
///
/// Store code is written against this trait so the same helper runs either
/// directly on the database or inside an open transaction.
pub trait Executor {
    /// Run a closure against the underlying connection.
    fn with_connection<T, F>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError>;

    /// Execute a SQL statement that doesn't return rows.
    ///
    /// Returns the number of rows changed.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// db.execute(
    ///     "UPDATE books SET stock = stock + ? WHERE id = ?",
    ///     params![3, book_id],
    /// )?;
    /// ```
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, DbError> {
        self.with_connection(|conn| run_execute(conn, sql, params))
    }

    /// Execute an INSERT and return the new row id.
    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, DbError> {
        self.with_connection(|conn| {
            run_execute(conn, sql, params)?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Execute a SQL query and return raw results.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let result = db.query("SELECT title FROM books WHERE stock > ?", params![0])?;
    /// for row in result.iter() {
    ///     let title = row.get("title").and_then(|v| v.as_text());
    ///     println!("Book: {:?}", title);
    /// }
    /// ```
    fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        self.with_connection(|conn| run_query(conn, sql, params))
    }

    /// Execute a SQL query and deserialize results into a vector.
    fn query_as<T: DeserializeOwned>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>, DbError> {
        let result = self.query(sql, params)?;
        result.deserialize_all()
    }

    /// Execute a SQL query and return a single row.
    ///
    /// Returns [`DbError::NotFound`] if no rows are returned.
    fn query_one<T: DeserializeOwned>(&self, sql: &str, params: &[Value]) -> Result<T, DbError> {
        let result = self.query(sql, params)?;
        result.first().ok_or(DbError::NotFound)?.deserialize()
    }

    /// Execute a SQL query and return an optional single row.
    fn query_optional<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<T>, DbError> {
        let result = self.query(sql, params)?;
        match result.first() {
            Some(row) => Ok(Some(row.deserialize()?)),
            None => Ok(None),
        }
    }

    /// Execute a query whose first column of the first row is an integer,
    /// such as `SELECT COUNT(*) ...`.
    fn query_scalar(&self, sql: &str, params: &[Value]) -> Result<i64, DbError> {
        let result = self.query(sql, params)?;
        let value = result
            .first()
            .and_then(|row| row.get_index(0))
            .ok_or(DbError::NotFound)?;
        value
            .as_integer()
            .ok_or_else(|| DbError::TypeError(format!("expected integer, got {:?}", value)))
    }
}

/// SQLite database handle.
///
/// Owns one connection behind a mutex; callers on different threads are
/// serialized. Cloning is done by wrapping the handle in an `Arc`.
pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let path = path.as_ref();
        let conn = if path.as_os_str() == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(path)
        }
        .map_err(|e| DbError::OpenError(e.to_string()))?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::from_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory().map_err(|e| DbError::OpenError(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, DbError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| DbError::OpenError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Apply the embedded schema. Safe to run more than once.
    pub fn migrate(&self) -> Result<(), DbError> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| DbError::MigrationError(e.to_string()))?;
        tracing::info!("database schema is up to date");
        Ok(())
    }

    /// Round-trip a trivial query.
    pub fn ping(&self) -> Result<(), DbError> {
        self.query_scalar("SELECT 1", &[]).map(|_| ())
    }

    /// Run `f` inside a transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back when it
    /// returns `Err`; the error is handed back unchanged.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let order_id = db.transaction(|tx| {
    ///     let id = tx.insert("INSERT INTO orders (...) VALUES (...)", params![...])?;
    ///     tx.execute("DELETE FROM cart_items WHERE cart_id = ?", params![cart_id])?;
    ///     Ok::<_, CommerceError>(id)
    /// })?;
    /// ```
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Tx<'_>) -> Result<T, E>,
        E: From<DbError>,
    {
        let mut conn = self.lock()?;
        let tx = Tx {
            inner: conn.transaction().map_err(DbError::from)?,
        };

        match f(&tx) {
            Ok(value) => {
                tx.inner.commit().map_err(DbError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = tx.inner.rollback() {
                    tracing::error!(error = %rollback, "transaction rollback failed");
                }
                Err(e)
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }
}

impl Executor for Db {
    fn with_connection<T, F>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError>,
    {
        let conn = self.lock()?;
        f(&*conn)
    }
}

/// An open transaction, handed to the closure given to [`Db::transaction`].
pub struct Tx<'conn> {
    inner: Transaction<'conn>,
}

impl Executor for Tx<'_> {
    fn with_connection<T, F>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError>,
    {
        f(&*self.inner)
    }
}

fn run_execute(conn: &Connection, sql: &str, params: &[Value]) -> Result<usize, DbError> {
    let mut stmt = conn.prepare_cached(sql)?;
    Ok(stmt.execute(params_from_iter(params.iter()))?)
}

fn run_query(conn: &Connection, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
    let mut stmt = conn.prepare_cached(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query(params_from_iter(params.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let values = (0..columns.len())
            .map(|i| row.get_ref(i).map(Value::from))
            .collect::<Result<Vec<_>, _>>()?;
        out.push(Row::new(columns.clone(), values));
    }

    Ok(QueryResult::new(columns, out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Counter {
        id: i64,
        value: i64,
    }

    fn scratch_db() -> Db {
        let db = Db::open_in_memory().unwrap();
        db.execute(
            "CREATE TABLE counters (id INTEGER PRIMARY KEY, value INTEGER NOT NULL)",
            params![],
        )
        .unwrap();
        db
    }

    #[test]
    fn test_insert_and_query() {
        let db = scratch_db();
        let id = db
            .insert("INSERT INTO counters (value) VALUES (?)", params![5])
            .unwrap();

        let counter: Counter = db
            .query_one("SELECT id, value FROM counters WHERE id = ?", params![id])
            .unwrap();
        assert_eq!(counter.id, id);
        assert_eq!(counter.value, 5);
    }

    #[test]
    fn test_query_optional_missing() {
        let db = scratch_db();
        let counter: Option<Counter> = db
            .query_optional("SELECT id, value FROM counters WHERE id = ?", params![42])
            .unwrap();
        assert!(counter.is_none());
    }

    #[test]
    fn test_transaction_commits() {
        let db = scratch_db();
        db.transaction(|tx| {
            tx.execute("INSERT INTO counters (value) VALUES (?)", params![1])?;
            tx.execute("INSERT INTO counters (value) VALUES (?)", params![2])?;
            Ok::<_, DbError>(())
        })
        .unwrap();

        assert_eq!(
            db.query_scalar("SELECT COUNT(*) FROM counters", params![]).unwrap(),
            2
        );
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let db = scratch_db();
        let result: Result<(), DbError> = db.transaction(|tx| {
            tx.execute("INSERT INTO counters (value) VALUES (?)", params![1])?;
            Err(DbError::NotFound)
        });

        assert!(matches!(result, Err(DbError::NotFound)));
        assert_eq!(
            db.query_scalar("SELECT COUNT(*) FROM counters", params![]).unwrap(),
            0
        );
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let db = Db::open_in_memory().unwrap();
        db.migrate().unwrap();
        db.migrate().unwrap();
        db.ping().unwrap();
    }

    #[test]
    fn test_unique_violation_is_reported() {
        let db = Db::open_in_memory().unwrap();
        db.migrate().unwrap();
        db.execute(
            "INSERT INTO publishers (name, slug, created_at, updated_at) VALUES (?, ?, 0, 0)",
            params!["Penguin", "penguin"],
        )
        .unwrap();
        let err = db
            .execute(
                "INSERT INTO publishers (name, slug, created_at, updated_at) VALUES (?, ?, 0, 0)",
                params!["Penguin", "penguin"],
            )
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }
}
