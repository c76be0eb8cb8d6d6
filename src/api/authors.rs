//! Author JSON API

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};

use super::dto::{
    ApiQuery, AuthorResponse, DeleteResponse, PageResponse, json_body, require_fields,
};
use crate::AppState;
use crate::data::{Author, AuthorSummary, AuthorUpdate, NewAuthor};
use crate::error::AppError;
use crate::pagination::{AUTHORS_PER_PAGE, Page};

/// Create author router
///
/// Routes:
/// - GET /api/authors - Authors with quotes in `lang`
/// - POST /api/authors - Create author
/// - GET /api/authors/:username - Author with quote count in `lang`
/// - PUT /api/authors/:username - Update author
/// - DELETE /api/authors/:username - Delete author and their quotes
pub fn authors_router() -> Router<AppState> {
    Router::new()
        .route("/api/authors", get(list_authors).post(create_author))
        .route(
            "/api/authors/:username",
            get(get_author).put(update_author).delete(delete_author),
        )
}

/// GET /api/authors
async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<ApiQuery>,
) -> Result<Json<PageResponse<AuthorSummary>>, AppError> {
    let locale = query.locale()?;
    let request = query.page(AUTHORS_PER_PAGE);

    let total = state.db.count_authors(locale).await?;
    let authors = state.db.get_authors(locale, request).await?;

    Ok(Json(PageResponse::new(authors, &Page::new(request, total))))
}

/// GET /api/authors/:username
async fn get_author(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<ApiQuery>,
) -> Result<Json<AuthorResponse>, AppError> {
    let locale = query.locale()?;
    let author = state
        .db
        .get_author_by_username(&username)
        .await?
        .ok_or(AppError::NotFound)?;
    let quote_count = state.db.count_quotes_by_author(&username, locale).await?;

    Ok(Json(AuthorResponse {
        author,
        quote_count,
    }))
}

/// POST /api/authors
async fn create_author(
    State(state): State<AppState>,
    body: Result<Json<NewAuthor>, JsonRejection>,
) -> Result<(StatusCode, Json<Author>), AppError> {
    let new_author = json_body(body)?;
    require_fields(&[&new_author.name, &new_author.avatar])?;

    let author = state.db.create_author(&new_author).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// PUT /api/authors/:username
async fn update_author(
    State(state): State<AppState>,
    Path(username): Path<String>,
    body: Result<Json<AuthorUpdate>, JsonRejection>,
) -> Result<Json<Author>, AppError> {
    let update = json_body(body)?;
    require_fields(&[&update.name, &update.avatar])?;

    let author = state
        .db
        .update_author(&username, &update)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(author))
}

/// DELETE /api/authors/:username
async fn delete_author(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    if !state.db.delete_author(&username).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(username = %username, "Author deleted");
    Ok(Json(DeleteResponse { success: true }))
}
