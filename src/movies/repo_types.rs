use sqlx::{postgres::PgRow, FromRow, Row};
use time::OffsetDateTime;

/// Movie record in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub director: String,
    pub year: i32,
    pub plot: Option<String>,
    pub genre: Option<String>,
    pub rating: f32,
    pub user_id: i64, // owner
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Writable movie fields. Owner and timestamps are never taken from here.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieFields {
    pub title: String,
    pub director: String,
    pub year: i32,
    pub plot: Option<String>,
    pub genre: Option<String>,
    pub rating: f32,
}

impl<'r> FromRow<'r, PgRow> for Movie {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            director: row.try_get("director")?,
            year: row.try_get("year")?,
            plot: row.try_get("plot")?,
            genre: row.try_get("genre")?,
            rating: row.try_get("rating")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
