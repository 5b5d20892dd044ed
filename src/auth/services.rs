use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::auth::{
    jwt::{TokenError, TokenService},
    password::{hash_password_blocking, verify_password_blocking},
    repo::UserStore,
    repo_types::{NewUser, User},
};
use crate::error::{AppError, StoreError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user not found")]
    UserNotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => AuthError::Conflict(msg),
            other => AuthError::Internal(other.into()),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        AuthError::Internal(e.into())
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::UserNotFound | AuthError::InvalidCredentials => {
                AppError::Unauthorized(e.to_string())
            }
            AuthError::Conflict(msg) => AppError::Validation(msg),
            AuthError::Internal(e) => AppError::Internal(e),
        }
    }
}

/// Registration and login over a credential store and the token service.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<User, AuthError> {
        let password_hash = hash_password_blocking(password.to_owned()).await?;
        let user = self
            .users
            .create(NewUser {
                username: username.to_owned(),
                password_hash,
                email: email.to_owned(),
            })
            .await?;
        info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(String, User), AuthError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            warn!(%username, "login unknown username");
            return Err(AuthError::UserNotFound);
        };

        let ok = verify_password_blocking(password.to_owned(), user.password_hash.clone()).await?;
        if !ok {
            warn!(%username, user_id = user.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        info!(user_id = user.id, "user logged in");
        Ok((token, user))
    }
}
