//! Newtype IDs for type-safe identifiers.
//!
//! Every table uses an integer rowid; wrapping it prevents passing a
//! BookId where a ReviewId is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A row identifier.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw row id.
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the raw row id.
            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        #[cfg(feature = "storage")]
        impl From<$name> for nest_db::Value {
            fn from(id: $name) -> Self {
                nest_db::Value::Integer(id.0)
            }
        }
    };
}

define_id!(UserId);
define_id!(AddressId);
define_id!(BookId);
define_id!(AuthorId);
define_id!(CategoryId);
define_id!(PublisherId);
define_id!(CartId);
define_id!(CartItemId);
define_id!(WishlistItemId);
define_id!(CouponId);
define_id!(OrderId);
define_id!(OrderItemId);
define_id!(ReviewId);
