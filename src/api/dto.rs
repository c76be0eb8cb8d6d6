//! JSON API request and response types

use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use crate::data::Author;
use crate::error::AppError;
use crate::locale::Locale;
use crate::pagination::{Page, PageRequest, parse_page};

/// Query parameters shared by the JSON read endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ApiQuery {
    pub lang: Option<String>,
    pub page: Option<String>,
    /// Restrict a quote listing to one author
    pub author: Option<String>,
    /// Restrict a quote listing to one tag
    pub tag: Option<String>,
}

impl ApiQuery {
    /// Requested locale; absent means English
    pub fn locale(&self) -> Result<Locale, AppError> {
        match self.lang.as_deref().map(str::trim) {
            None | Some("") => Ok(Locale::En),
            Some(lang) => lang
                .parse()
                .map_err(|e: crate::locale::UnsupportedLocale| AppError::Validation(e.to_string())),
        }
    }

    pub fn page(&self, per_page: u32) -> PageRequest {
        PageRequest::new(parse_page(self.page.as_deref()), per_page)
    }
}

/// One page of a JSON listing
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub total_pages: u32,
}

impl<T> PageResponse<T> {
    pub fn new(items: Vec<T>, page: &Page) -> Self {
        Self {
            items,
            page: page.current,
            per_page: page.per_page,
            total: page.total_items,
            total_pages: page.total_pages,
        }
    }
}

/// An author with their quote count in the requested locale
#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    #[serde(flatten)]
    pub author: Author,
    pub quote_count: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Turn a JSON body rejection into a 400 with the usual error body
pub fn json_body<T>(body: Result<axum::Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|axum::Json(value)| value).map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected JSON body");
        AppError::Validation("Missing required fields".to_string())
    })
}

/// Fail with "Missing required fields" when any value is blank
pub fn require_fields(values: &[&str]) -> Result<(), AppError> {
    if values.iter().any(|value| value.trim().is_empty()) {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }
    Ok(())
}
