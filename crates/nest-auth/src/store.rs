//! Account persistence.

use crate::password::PasswordHasher;
use crate::user::{ChangePassword, ProfileUpdate, RegisterRequest, Role, UserAccount};
use crate::AuthError;
use nest_commerce::ids::UserId;
use nest_db::{params, Db, Executor};
use serde::Deserialize;
use std::sync::Arc;

const USER_SELECT: &str = "SELECT id, username, email, password_hash, first_name, last_name, \
    phone, role, is_active, is_email_verified, created_at, updated_at FROM users";

#[derive(Deserialize)]
struct UserRow {
    id: UserId,
    username: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    phone: Option<String>,
    role: Role,
    #[serde(deserialize_with = "nest_commerce::flag::deserialize")]
    is_active: bool,
    #[serde(deserialize_with = "nest_commerce::flag::deserialize")]
    is_email_verified: bool,
    created_at: i64,
    updated_at: i64,
}

impl UserRow {
    fn into_parts(self) -> (UserAccount, String) {
        let account = UserAccount {
            id: self.id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            role: self.role,
            is_active: self.is_active,
            is_email_verified: self.is_email_verified,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (account, self.password_hash)
    }
}

/// Repository over the `users` table.
#[derive(Clone)]
pub struct AccountStore {
    db: Arc<Db>,
    hasher: PasswordHasher,
}

impl AccountStore {
    pub fn new(db: Arc<Db>) -> Self {
        Self {
            db,
            hasher: PasswordHasher,
        }
    }

    /// Register a customer account.
    pub fn register(&self, request: &RegisterRequest) -> Result<UserAccount, AuthError> {
        self.create_user(request, Role::Customer)
    }

    /// Create an account with an explicit role.
    pub fn create_user(&self, request: &RegisterRequest, role: Role) -> Result<UserAccount, AuthError> {
        request.validate()?;
        let username = request.username.trim();
        let email = request.email.trim().to_lowercase();
        let hash = self.hasher.hash(&request.password)?;
        let now = current_timestamp();

        let id = self.db.transaction(|tx| {
            let taken = tx.query_scalar(
                "SELECT COUNT(*) FROM users WHERE username = ? OR email = ? COLLATE NOCASE",
                params![username, &email],
            )?;
            if taken > 0 {
                return Err(AuthError::UserAlreadyExists(
                    "username or email already exists".to_string(),
                ));
            }
            let id = tx.insert(
                "INSERT INTO users (username, email, password_hash, first_name, last_name, phone, \
                 role, is_active, is_email_verified, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, 1, 0, ?, ?)",
                params![
                    username,
                    &email,
                    hash,
                    request.first_name.trim(),
                    request.last_name.trim(),
                    request.phone.clone(),
                    role.as_str(),
                    now,
                    now
                ],
            )?;
            Ok(UserId::new(id))
        })?;

        tracing::info!(user_id = %id, username, role = role.as_str(), "account created");
        self.get(id)
    }

    /// Check a login (username or email) and password.
    pub fn authenticate(&self, login: &str, password: &str) -> Result<UserAccount, AuthError> {
        let login = login.trim();
        let row = match self.find_row("username = ?", login)? {
            Some(row) => Some(row),
            None => self.find_row("email = ? COLLATE NOCASE", login)?,
        };
        let (account, hash) = row.ok_or(AuthError::InvalidCredentials)?.into_parts();

        if !self.hasher.verify(password, &hash)? {
            tracing::debug!(user_id = %account.id, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }
        if !account.is_active {
            return Err(AuthError::AccountDisabled);
        }
        Ok(account)
    }

    pub fn get(&self, id: UserId) -> Result<UserAccount, AuthError> {
        self.find_row("id = ?", id)?
            .map(|row| row.into_parts().0)
            .ok_or(AuthError::UserNotFound(id))
    }

    /// Look up an account by username.
    pub fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, AuthError> {
        Ok(self
            .find_row("username = ?", username)?
            .map(|row| row.into_parts().0))
    }

    /// Apply a partial profile edit.
    pub fn update_profile(&self, id: UserId, update: &ProfileUpdate) -> Result<UserAccount, AuthError> {
        let mut account = self.get(id)?;
        update.apply(&mut account);
        self.db.execute(
            "UPDATE users SET first_name = ?, last_name = ?, phone = ?, updated_at = ? WHERE id = ?",
            params![
                &account.first_name,
                &account.last_name,
                account.phone.clone(),
                current_timestamp(),
                id
            ],
        )?;
        self.get(id)
    }

    /// Replace the password after checking the current one.
    pub fn change_password(&self, id: UserId, change: &ChangePassword) -> Result<(), AuthError> {
        let (_, hash) = self
            .find_row("id = ?", id)?
            .ok_or(AuthError::UserNotFound(id))?
            .into_parts();
        if !self.hasher.verify(&change.old_password, &hash)? {
            return Err(AuthError::IncorrectPassword);
        }
        change.validate()?;

        let new_hash = self.hasher.hash(&change.new_password)?;
        self.db.execute(
            "UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?",
            params![new_hash, current_timestamp(), id],
        )?;
        tracing::info!(user_id = %id, "password changed");
        Ok(())
    }

    /// Switch an account on or off.
    pub fn set_active(&self, id: UserId, active: bool) -> Result<(), AuthError> {
        let changed = self.db.execute(
            "UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?",
            params![active, current_timestamp(), id],
        )?;
        if changed == 0 {
            return Err(AuthError::UserNotFound(id));
        }
        Ok(())
    }

    fn find_row(
        &self,
        condition: &str,
        value: impl Into<nest_db::Value>,
    ) -> Result<Option<UserRow>, AuthError> {
        let sql = format!("{} WHERE {}", USER_SELECT, condition);
        Ok(self.db.query_optional::<UserRow>(&sql, &[value.into()])?)
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
