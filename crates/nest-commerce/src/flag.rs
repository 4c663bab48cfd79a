//! Boolean columns come back from SQLite as 0/1 integers.

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer};

/// Deserialize a bool from either a JSON bool or a 0/1 integer.
pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(b) => Ok(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            Some(other) => Err(de::Error::invalid_value(
                Unexpected::Signed(other),
                &"0 or 1 for boolean",
            )),
            None => Err(de::Error::custom("invalid numeric value for boolean")),
        },
        other => Err(de::Error::custom(format!("expected boolean, got {}", other))),
    }
}
