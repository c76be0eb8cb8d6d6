//! Quote JSON API

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};

use super::dto::{ApiQuery, DeleteResponse, PageResponse, json_body, require_fields};
use crate::AppState;
use crate::data::{NewQuote, Quote, QuoteUpdate};
use crate::error::AppError;
use crate::pagination::{LISTING_QUOTES_PER_PAGE, Page};

/// Create quote router
///
/// Routes:
/// - GET /api/quotes - Quotes in `lang`, optionally by `author` or `tag`
/// - POST /api/quotes - Create quote
/// - GET /api/quotes/:id - Quote in `lang`
/// - PUT /api/quotes/:id - Update quote
/// - DELETE /api/quotes/:id - Delete quote
pub fn quotes_router() -> Router<AppState> {
    Router::new()
        .route("/api/quotes", get(list_quotes).post(create_quote))
        .route(
            "/api/quotes/:id",
            get(get_quote).put(update_quote).delete(delete_quote),
        )
}

/// GET /api/quotes
async fn list_quotes(
    State(state): State<AppState>,
    Query(query): Query<ApiQuery>,
) -> Result<Json<PageResponse<Quote>>, AppError> {
    let locale = query.locale()?;
    let request = query.page(LISTING_QUOTES_PER_PAGE);
    let db = &state.db;

    let (total, quotes) = match (query.author.as_deref(), query.tag.as_deref()) {
        (Some(author), _) => (
            db.count_quotes_by_author(author, locale).await?,
            db.get_quotes_by_author(author, locale, request).await?,
        ),
        (None, Some(tag)) => (
            db.count_quotes_by_tag(tag, locale).await?,
            db.get_quotes_by_tag(tag, locale, request).await?,
        ),
        (None, None) => (
            db.count_quotes(locale).await?,
            db.get_quotes(locale, request).await?,
        ),
    };

    Ok(Json(PageResponse::new(quotes, &Page::new(request, total))))
}

/// GET /api/quotes/:id
async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ApiQuery>,
) -> Result<Json<Quote>, AppError> {
    let locale = query.locale()?;
    let quote = state
        .db
        .get_quote_by_id(&id, locale)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(quote))
}

/// POST /api/quotes
async fn create_quote(
    State(state): State<AppState>,
    body: Result<Json<NewQuote>, JsonRejection>,
) -> Result<(StatusCode, Json<Quote>), AppError> {
    let new_quote = json_body(body)?;
    require_fields(&[&new_quote.text, &new_quote.author_username])?;

    let quote = state.db.create_quote(&new_quote).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

/// PUT /api/quotes/:id
async fn update_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<QuoteUpdate>, JsonRejection>,
) -> Result<Json<Quote>, AppError> {
    let update = json_body(body)?;
    require_fields(&[&update.text])?;

    let quote = state
        .db
        .update_quote(&id, &update)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(quote))
}

/// DELETE /api/quotes/:id
async fn delete_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    if !state.db.delete_quote(&id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(quote_id = %id, "Quote deleted");
    Ok(Json(DeleteResponse { success: true }))
}
