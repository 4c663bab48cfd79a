//! Parameter and column values.
//!
//! Rows are decoded through `serde_json`: a [`Row`] becomes a JSON object
//! keyed by column name, then deserializes into any struct whose field
//! names match the selected columns.

use crate::DbError;
use base64::{engine::general_purpose::STANDARD, Engine};
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value as Json};

/// One SQLite value, either bound as a parameter or read from a column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Integers as-is, reals truncated.
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Value::Integer(i) => Some(i),
            Value::Real(f) => Some(f as i64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        *self == Value::Null
    }

    fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Integer(i) => Json::from(*i),
            Value::Real(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Value::Text(s) => Json::String(s.clone()),
            // Non-UTF-8 blobs travel as base64 text.
            Value::Blob(b) => match std::str::from_utf8(b) {
                Ok(s) => Json::String(s.to_string()),
                Err(_) => Json::String(STANDARD.encode(b)),
            },
        }
    }
}

macro_rules! integer_value {
    ($($ty:ty),+) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Integer(i64::from(v))
            }
        })+
    };
}

integer_value!(i32, i64, u32, bool);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(v: ValueRef<'_>) -> Self {
        match v {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let borrowed = match self {
            Value::Null => ValueRef::Null,
            Value::Integer(i) => ValueRef::Integer(*i),
            Value::Real(f) => ValueRef::Real(*f),
            Value::Text(s) => ValueRef::Text(s.as_bytes()),
            Value::Blob(b) => ValueRef::Blob(b),
        };
        Ok(ToSqlOutput::Borrowed(borrowed))
    }
}

/// A result row: column names paired with values.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.values.get(index)
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, DbError> {
        let object: Map<String, Json> = self
            .columns
            .iter()
            .cloned()
            .zip(self.values.iter().map(Value::to_json))
            .collect();
        serde_json::from_value(Json::Object(object))
            .map_err(|e| DbError::DeserializeError(e.to_string()))
    }
}

/// All rows returned by one statement.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn deserialize_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, DbError> {
        self.rows.iter().map(Row::deserialize).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct BookRow {
        id: i64,
        title: String,
        rating: f64,
        subtitle: Option<String>,
    }

    fn book_row() -> Row {
        Row::new(
            ["id", "title", "rating", "subtitle"].map(String::from).to_vec(),
            vec![
                Value::Integer(3),
                Value::Text("Xamsa".to_string()),
                Value::Real(4.5),
                Value::Null,
            ],
        )
    }

    #[test]
    fn test_parameter_conversions() {
        assert_eq!(Value::from(Some(5)), Value::Integer(5));
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(true), Value::Integer(1));
        assert_eq!(Value::from("uz"), Value::Text("uz".to_string()));
    }

    #[test]
    fn test_row_into_struct() {
        let book: BookRow = book_row().deserialize().unwrap();
        assert_eq!(
            book,
            BookRow {
                id: 3,
                title: "Xamsa".to_string(),
                rating: 4.5,
                subtitle: None,
            }
        );
    }

    #[test]
    fn test_column_lookup() {
        let row = book_row();
        assert_eq!(row.get("id").and_then(Value::as_integer), Some(3));
        assert_eq!(row.get_index(1).and_then(Value::as_text), Some("Xamsa"));
        assert!(row.get("isbn").is_none());
    }

    #[test]
    fn test_binary_blob_is_base64() {
        assert_eq!(Value::Blob(vec![0xff, 0xfe]).to_json(), Json::String("//4=".to_string()));
    }
}
