use crate::auth::{jwt::TokenService, repo::PgUserStore, repo::UserStore, services::AuthService};
use crate::config::AppConfig;
use crate::movies::{
    repo::{MovieStore, PgMovieStore},
    services::MovieService,
};
use sqlx::PgPool;
use std::sync::Arc;

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub auth: AuthService,
    pub movies: MovieService,
}

impl AppState {
    pub fn init(config: AppConfig, db: PgPool) -> Self {
        Self::from_parts(
            config,
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgMovieStore::new(db)),
        )
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        movies: Arc<dyn MovieStore>,
    ) -> Self {
        let tokens = Arc::new(TokenService::from_config(&config.jwt));
        Self {
            config: Arc::new(config),
            auth: AuthService::new(users, tokens.clone()),
            movies: MovieService::new(movies),
            tokens,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::memory::{MemoryMovieStore, MemoryUserStore};

        let config = AppConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some("test-secret".into()),
            _ => None,
        })
        .expect("test config");

        Self::from_parts(
            config,
            Arc::new(MemoryUserStore::default()),
            Arc::new(MemoryMovieStore::default()),
        )
    }
}
