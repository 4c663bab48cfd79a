//! User types.

use crate::password::PasswordHasher;
use crate::AuthError;
use nest_commerce::ids::UserId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Shortest allowed username.
pub const MIN_USERNAME_LENGTH: usize = 3;
/// Longest allowed username.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular customer.
    #[default]
    Customer,
    /// Store staff; may edit the catalog and move orders along.
    Staff,
    /// Store administrator.
    Admin,
}

impl Role {
    /// Get role as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }

    /// Check if this role has at least the given permission level.
    pub fn has_permission(&self, required: Role) -> bool {
        self.level() >= required.level()
    }

    /// Get permission level (higher = more permissions).
    pub fn level(&self) -> u8 {
        match self {
            Role::Customer => 0,
            Role::Staff => 1,
            Role::Admin => 2,
        }
    }

    /// Staff or admin.
    pub fn is_staff(&self) -> bool {
        self.has_permission(Role::Staff)
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            other => Err(AuthError::Validation(format!("unknown role: {}", other))),
        }
    }
}

/// A registered user, without credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub is_email_verified: bool,
    /// Unix timestamp of registration.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl UserAccount {
    /// First and last name, or the username when both are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        match full.trim() {
            "" => self.username.clone(),
            name => name.to_string(),
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

/// Sign-up form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Must equal `password` when given.
    #[serde(default)]
    pub password_confirm: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl RegisterRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            username: username.into(),
            email: email.into(),
            password_confirm: Some(password.clone()),
            password,
            ..Self::default()
        }
    }

    /// Check every field.
    pub fn validate(&self) -> Result<(), AuthError> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        PasswordHasher::validate_password(&self.password)?;
        match &self.password_confirm {
            Some(confirm) if confirm != &self.password => Err(AuthError::PasswordMismatch),
            _ => Ok(()),
        }
    }
}

/// Login form. `username` may also be the account's email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Partial profile edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl ProfileUpdate {
    /// Apply present fields to `account`.
    pub fn apply(&self, account: &mut UserAccount) {
        if let Some(first) = &self.first_name {
            account.first_name = first.trim().to_string();
        }
        if let Some(last) = &self.last_name {
            account.last_name = last.trim().to_string();
        }
        if let Some(phone) = &self.phone {
            let phone = phone.trim();
            account.phone = (!phone.is_empty()).then(|| phone.to_string());
        }
    }
}

/// Password change form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangePassword {
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

impl ChangePassword {
    /// Check the new password pair. The old password is verified by the
    /// account store.
    pub fn validate(&self) -> Result<(), AuthError> {
        PasswordHasher::validate_password(&self.new_password)?;
        if self.new_password != self.new_password_confirm {
            return Err(AuthError::PasswordMismatch);
        }
        Ok(())
    }
}

fn validate_username(username: &str) -> Result<(), AuthError> {
    let username = username.trim();
    let length = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        return Err(AuthError::Validation(format!(
            "username must be between {} and {} characters",
            MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(AuthError::Validation(
            "username may only contain letters, digits and @.+-_".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let valid = match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    };
    if !valid {
        return Err(AuthError::Validation("enter a valid email address".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.has_permission(Role::Staff));
        assert!(Role::Staff.is_staff());
        assert!(!Role::Customer.is_staff());
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_register_validation() {
        assert!(RegisterRequest::new("reader", "reader@example.com", "longenough").validate().is_ok());
        assert!(RegisterRequest::new("ab", "reader@example.com", "longenough").validate().is_err());
        assert!(RegisterRequest::new("reader", "not-an-email", "longenough").validate().is_err());
        assert!(RegisterRequest::new("reader", "reader@example", "longenough").validate().is_err());
        assert!(RegisterRequest::new("reader", "reader@example.com", "short").validate().is_err());
        assert!(RegisterRequest::new("bad user", "reader@example.com", "longenough").validate().is_err());
    }

    #[test]
    fn test_register_password_mismatch() {
        let mut request = RegisterRequest::new("reader", "reader@example.com", "longenough");
        request.password_confirm = Some("different1".into());
        assert!(matches!(request.validate(), Err(AuthError::PasswordMismatch)));

        // Confirmation is optional.
        request.password_confirm = None;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_change_password_pair() {
        let change = ChangePassword {
            old_password: "oldpassword".into(),
            new_password: "newpassword".into(),
            new_password_confirm: "newpassw0rd".into(),
        };
        assert!(matches!(change.validate(), Err(AuthError::PasswordMismatch)));
    }

    #[test]
    fn test_profile_update_and_display_name() {
        let mut account = UserAccount {
            id: UserId::new(1),
            username: "reader".into(),
            email: "reader@example.com".into(),
            first_name: String::new(),
            last_name: String::new(),
            phone: Some("555".into()),
            role: Role::Customer,
            is_active: true,
            is_email_verified: false,
            created_at: 0,
            updated_at: 0,
        };
        assert_eq!(account.display_name(), "reader");

        ProfileUpdate {
            first_name: Some(" Ada ".into()),
            phone: Some("".into()),
            ..ProfileUpdate::default()
        }
        .apply(&mut account);
        assert_eq!(account.display_name(), "Ada");
        assert_eq!(account.phone, None);
    }
}
