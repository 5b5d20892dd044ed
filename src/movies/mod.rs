mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

/// Movie routes, relative to the `/api` prefix. Callers must wrap them with
/// the auth gate.
pub fn router() -> Router<AppState> {
    handlers::movie_routes()
}
