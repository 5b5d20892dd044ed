//! In-memory stores used by unit tests in place of Postgres.

use std::collections::BTreeMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::auth::{
    repo::UserStore,
    repo_types::{NewUser, User},
};
use crate::error::StoreError;
use crate::movies::{
    repo::MovieStore,
    repo_types::{Movie, MovieFields},
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("username already taken".into()));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("email already registered".into()));
        }
        let now = OffsetDateTime::now_utc();
        let created = User {
            id: users.len() as i64 + 1,
            username: user.username,
            password_hash: user.password_hash,
            email: user.email,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }
}

#[derive(Default)]
pub struct MemoryMovieStore {
    inner: RwLock<(i64, BTreeMap<i64, Movie>)>, // (last id, rows)
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn list(&self) -> Result<Vec<Movie>, StoreError> {
        Ok(self.inner.read().await.1.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Movie>, StoreError> {
        Ok(self.inner.read().await.1.get(&id).cloned())
    }

    async fn create(&self, owner_id: i64, fields: MovieFields) -> Result<Movie, StoreError> {
        let mut guard = self.inner.write().await;
        let (last_id, rows) = &mut *guard;
        *last_id += 1;
        let now = OffsetDateTime::now_utc();
        let movie = Movie {
            id: *last_id,
            title: fields.title,
            director: fields.director,
            year: fields.year,
            plot: fields.plot,
            genre: fields.genre,
            rating: fields.rating,
            user_id: owner_id,
            created_at: now,
            updated_at: now,
        };
        rows.insert(movie.id, movie.clone());
        Ok(movie)
    }

    async fn update(&self, id: i64, fields: MovieFields) -> Result<Movie, StoreError> {
        let mut guard = self.inner.write().await;
        let movie = guard.1.get_mut(&id).ok_or(StoreError::NotFound)?;
        movie.title = fields.title;
        movie.director = fields.director;
        movie.year = fields.year;
        movie.plot = fields.plot;
        movie.genre = fields.genre;
        movie.rating = fields.rating;
        movie.updated_at = OffsetDateTime::now_utc();
        Ok(movie.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut guard = self.inner.write().await;
        guard.1.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}
