use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::middleware::AuthUser,
    error::AppError,
    state::AppState,
};

use super::dto::{MessageResponse, MovieList, MovieRequest, MovieResponse};

pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(list_movies).post(create_movie))
        .route(
            "/movies/:id",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
}

/// Ids are unsigned 32-bit decimals; signs, whitespace and overflow are 400.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    let invalid = || AppError::Validation("Invalid ID format".into());
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    raw.parse::<u32>().map(i64::from).map_err(|_| invalid())
}

fn parse_body(
    payload: Result<Json<MovieRequest>, JsonRejection>,
) -> Result<MovieRequest, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::Validation(e.body_text()))
}

#[instrument(skip(state))]
pub async fn list_movies(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<MovieList>, AppError> {
    user.id()?;
    let movies = state.movies.list().await?;
    Ok(Json(MovieList {
        movies: movies.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn get_movie(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MovieResponse>, AppError> {
    user.id()?;
    let id = parse_id(&id)?;
    let movie = state.movies.get(id).await?;
    Ok(Json(movie.into()))
}

#[instrument(skip(state, payload))]
pub async fn create_movie(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<MovieRequest>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<MovieResponse>), AppError> {
    let requester = user.id()?;
    let fields = parse_body(payload)?.into_fields()?;
    let movie = state.movies.create(requester, fields).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/movies/{}", movie.id)) {
        headers.insert(LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers, Json(movie.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_movie(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<MovieRequest>, JsonRejection>,
) -> Result<Json<MovieResponse>, AppError> {
    let requester = user.id()?;
    let id = parse_id(&id)?;
    let fields = parse_body(payload)?.into_fields()?;
    let movie = state.movies.update(requester, id, fields).await?;
    Ok(Json(movie.into()))
}

#[instrument(skip(state))]
pub async fn delete_movie(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let requester = user.id()?;
    let id = parse_id(&id)?;
    state.movies.delete(requester, id).await?;
    Ok(Json(MessageResponse {
        message: "Movie deleted successfully".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_rejects_non_numeric() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(matches!(parse_id("abc"), Err(AppError::Validation(_))));
        assert!(matches!(parse_id("1.5"), Err(AppError::Validation(_))));
    }

    #[test]
    fn parse_id_rejects_signs_and_overflow() {
        for raw in ["-1", "+1", "4294967296", "", " 1"] {
            assert!(
                matches!(parse_id(raw), Err(AppError::Validation(_))),
                "{raw:?} should be rejected"
            );
        }
        assert_eq!(parse_id("0").unwrap(), 0);
        assert_eq!(parse_id("4294967295").unwrap(), 4_294_967_295);
    }
}
