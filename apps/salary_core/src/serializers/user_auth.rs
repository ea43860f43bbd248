use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::user;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 6;

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterReq {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterReq {
    pub fn validate(&self) -> Result<(), AppError> {
        let len = self.username.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
            return Err(AppError::Validation(format!(
                "username must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
            )));
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::Validation("email is not a valid email address".into()));
        }
        if self.password.chars().count() < PASSWORD_MIN {
            return Err(AppError::Validation(format!(
                "password must be at least {PASSWORD_MIN} characters"
            )));
        }
        Ok(())
    }
}

/// OAuth2 password-flow form body.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserPublic {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<&user::Model> for UserPublic {
    fn from(m: &user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username.clone(),
            email: m.email.clone(),
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResp {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// username
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// `local@domain.tld`: one `@`, no whitespace, dotted domain with non-empty labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    })
}

/// Lowercase the domain and keep the local part as typed, so
/// `a@Example.COM` and `a@example.com` are the same address.
/// Expects an address that passed [`is_valid_email`].
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}
