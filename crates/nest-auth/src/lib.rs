//! Authentication for BookNest.
//!
//! Provides password hashing, signed bearer tokens, user roles and the
//! account records behind them.

mod error;
mod password;
mod token;
mod user;

#[cfg(feature = "storage")]
mod store;

pub use error::AuthError;
pub use password::PasswordHasher;
pub use token::{
    AccessToken, Claims, TokenIssuer, TokenPair, TokenType, DEFAULT_ACCESS_TTL_MINUTES,
    DEFAULT_REFRESH_TTL_DAYS,
};
pub use user::{ChangePassword, LoginRequest, ProfileUpdate, RegisterRequest, Role, UserAccount};

#[cfg(feature = "storage")]
pub use store::AccountStore;
