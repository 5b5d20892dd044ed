use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{AppError, StoreError};
use crate::movies::repo::MovieStore;
use crate::movies::repo_types::{Movie, MovieFields};

#[derive(Debug, Clone, Copy)]
enum Action {
    Update,
    Delete,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

fn movie_not_found() -> AppError {
    AppError::NotFound("Movie not found".into())
}

/// Movie CRUD. Update and delete are limited to the owner.
#[derive(Clone)]
pub struct MovieService {
    movies: Arc<dyn MovieStore>,
}

impl MovieService {
    pub fn new(movies: Arc<dyn MovieStore>) -> Self {
        Self { movies }
    }

    pub async fn list(&self) -> Result<Vec<Movie>, AppError> {
        Ok(self.movies.list().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Movie, AppError> {
        self.movies.get(id).await?.ok_or_else(movie_not_found)
    }

    /// The owner is always the requester.
    pub async fn create(&self, requester: i64, fields: MovieFields) -> Result<Movie, AppError> {
        let movie = self.movies.create(requester, fields).await?;
        info!(movie_id = movie.id, user_id = requester, "movie created");
        Ok(movie)
    }

    pub async fn update(
        &self,
        requester: i64,
        id: i64,
        fields: MovieFields,
    ) -> Result<Movie, AppError> {
        self.owned_by(requester, id, Action::Update).await?;
        let movie = self.movies.update(id, fields).await.map_err(not_found_as_movie)?;
        info!(movie_id = id, user_id = requester, "movie updated");
        Ok(movie)
    }

    pub async fn delete(&self, requester: i64, id: i64) -> Result<(), AppError> {
        self.owned_by(requester, id, Action::Delete).await?;
        self.movies.delete(id).await.map_err(not_found_as_movie)?;
        info!(movie_id = id, user_id = requester, "movie deleted");
        Ok(())
    }

    async fn owned_by(&self, requester: i64, id: i64, action: Action) -> Result<Movie, AppError> {
        let movie = self.get(id).await?;
        if movie.user_id != requester {
            warn!(
                movie_id = id,
                owner = movie.user_id,
                user_id = requester,
                action = action.verb(),
                "ownership check failed"
            );
            return Err(AppError::Forbidden(format!(
                "You don't have permission to {} this movie",
                action.verb()
            )));
        }
        Ok(movie)
    }
}

// The row can vanish between the ownership check and the write.
fn not_found_as_movie(e: StoreError) -> AppError {
    match e {
        StoreError::NotFound => movie_not_found(),
        other => other.into(),
    }
}
