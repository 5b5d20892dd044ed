use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::jwt::TokenService;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user id attached to the request by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

impl AuthUser {
    pub const ANONYMOUS: AuthUser = AuthUser(0);

    /// The user id, or `Unauthorized` for the anonymous identity.
    pub fn id(self) -> Result<i64, AppError> {
        if self.0 > 0 {
            Ok(self.0)
        } else {
            Err(AppError::Unauthorized("authentication required".into()))
        }
    }
}

/// Reads the identity left by the gate. Nothing attached means identity 0.
#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .unwrap_or(AuthUser::ANONYMOUS))
    }
}

/// Route layer for protected routes: validates the bearer token and attaches
/// [`AuthUser`]. On failure the wrapped handler never runs.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Authorization header is required".into()))?;

    let token = header.strip_prefix("Bearer ").unwrap_or(header);

    let claims = state.tokens.validate(token).map_err(|e| {
        warn!(error = %e, "rejected bearer token");
        AppError::Unauthorized("Invalid or expired token".into())
    })?;

    let user = AuthUser(TokenService::extract_user_id(&claims));
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
