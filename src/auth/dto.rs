use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo_types::User;
use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_USERNAME_LEN: usize = 255;
pub const MAX_EMAIL_LEN: usize = 255;

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl RegisterRequest {
    /// Trims the username, lowercases the email and checks field rules.
    pub fn normalize(mut self) -> Result<Self, AppError> {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_lowercase();

        if self.username.is_empty() {
            return Err(AppError::Validation("username is required".into()));
        }
        if self.username.chars().count() > MAX_USERNAME_LEN {
            return Err(AppError::Validation(format!(
                "username must be at most {MAX_USERNAME_LEN} characters"
            )));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.email.chars().count() > MAX_EMAIL_LEN {
            return Err(AppError::Validation(format!(
                "email must be at most {MAX_EMAIL_LEN} characters"
            )));
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::Validation("invalid email".into()));
        }
        Ok(self)
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    /// Trims the username; both fields must be non-empty.
    pub fn normalize(mut self) -> Result<Self, AppError> {
        self.username = self.username.trim().to_string();
        if self.username.is_empty() || self.password.is_empty() {
            return Err(AppError::Validation(
                "username and password are required".into(),
            ));
        }
        Ok(self)
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Response returned after login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: PublicUser,
}
