use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::movies::repo_types::{Movie, MovieFields};

const MOVIE_COLUMNS: &str =
    "id, title, director, year, plot, genre, rating, user_id, created_at, updated_at";

/// Record store for movies, keyed by id and tagged with an owner.
#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Movie>, StoreError>;
    async fn get(&self, id: i64) -> Result<Option<Movie>, StoreError>;
    async fn create(&self, owner_id: i64, fields: MovieFields) -> Result<Movie, StoreError>;
    /// `StoreError::NotFound` when no row matched.
    async fn update(&self, id: i64, fields: MovieFields) -> Result<Movie, StoreError>;
    /// `StoreError::NotFound` when no row matched.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgMovieStore {
    db: PgPool,
}

impl PgMovieStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn list(&self) -> Result<Vec<Movie>, StoreError> {
        let rows = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY id"
        ))
        .fetch_all(&self.db)
        .await
        .context("list movies")?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<Movie>, StoreError> {
        let row = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get movie")?;
        Ok(row)
    }

    async fn create(&self, owner_id: i64, fields: MovieFields) -> Result<Movie, StoreError> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        let movie = sqlx::query_as::<_, Movie>(&format!(
            r#"
            INSERT INTO movies (title, director, year, plot, genre, rating, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {MOVIE_COLUMNS}
            "#
        ))
        .bind(&fields.title)
        .bind(&fields.director)
        .bind(fields.year)
        .bind(&fields.plot)
        .bind(&fields.genre)
        .bind(fields.rating)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await
        .context("insert movie")?;
        tx.commit().await.context("commit tx")?;
        Ok(movie)
    }

    async fn update(&self, id: i64, fields: MovieFields) -> Result<Movie, StoreError> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        let movie = sqlx::query_as::<_, Movie>(&format!(
            r#"
            UPDATE movies
               SET title = $2, director = $3, year = $4, plot = $5, genre = $6,
                   rating = $7, updated_at = now()
             WHERE id = $1
            RETURNING {MOVIE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.director)
        .bind(fields.year)
        .bind(&fields.plot)
        .bind(&fields.genre)
        .bind(fields.rating)
        .fetch_optional(&mut *tx)
        .await
        .context("update movie")?
        .ok_or(StoreError::NotFound)?;
        tx.commit().await.context("commit tx")?;
        Ok(movie)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete movie")?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        tx.commit().await.context("commit tx")?;
        Ok(())
    }
}
