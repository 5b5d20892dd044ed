use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AppError;
use crate::movies::repo_types::{Movie, MovieFields};

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_DIRECTOR_LEN: usize = 255;
pub const MAX_GENRE_LEN: usize = 100;

fn check_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Body for create and update. Unknown fields (e.g. `user_id`) are ignored.
#[derive(Debug, Deserialize)]
pub struct MovieRequest {
    pub title: String,
    pub director: String,
    pub year: i32,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub rating: f32,
}

impl MovieRequest {
    pub fn into_fields(self) -> Result<MovieFields, AppError> {
        let title = self.title.trim().to_string();
        let director = self.director.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("title is required".into()));
        }
        if director.is_empty() {
            return Err(AppError::Validation("director is required".into()));
        }
        check_len("title", &title, MAX_TITLE_LEN)?;
        check_len("director", &director, MAX_DIRECTOR_LEN)?;
        if self.year <= 0 {
            return Err(AppError::Validation("year is required".into()));
        }
        let genre = self.genre.filter(|g| !g.trim().is_empty());
        if let Some(g) = &genre {
            check_len("genre", g, MAX_GENRE_LEN)?;
        }
        Ok(MovieFields {
            title,
            director,
            year: self.year,
            plot: self.plot.filter(|p| !p.trim().is_empty()),
            genre,
            rating: self.rating,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: i64,
    pub title: String,
    pub director: String,
    pub year: i32,
    pub plot: Option<String>,
    pub genre: Option<String>,
    pub rating: f32,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Movie> for MovieResponse {
    fn from(m: Movie) -> Self {
        Self {
            id: m.id,
            title: m.title,
            director: m.director,
            year: m.year,
            plot: m.plot,
            genre: m.genre,
            rating: m.rating,
            user_id: m.user_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieList {
    pub movies: Vec<MovieResponse>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
