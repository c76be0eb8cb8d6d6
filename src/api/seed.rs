//! Database seeding endpoint

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use serde::Deserialize;

use crate::AppState;
use crate::error::AppError;
use crate::locale::path_locale;

/// Create seed router
///
/// Routes:
/// - POST /api/seed - Create tables and load sample data
pub fn seed_router() -> Router<AppState> {
    Router::new().route("/api/seed", post(seed))
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedQuery {
    /// Local path to return to; set by the home page initializer form
    pub redirect: Option<String>,
}

impl SeedQuery {
    /// Only locale-prefixed paths on this site are followed
    fn redirect_path(&self) -> Option<&str> {
        self.redirect
            .as_deref()
            .filter(|path| !path.contains('\\') && path_locale(path).is_some())
    }
}

/// POST /api/seed
///
/// Returns the seed outcome as JSON, or redirects with 303 when the
/// request came from the initializer form.
async fn seed(
    State(state): State<AppState>,
    Query(query): Query<SeedQuery>,
) -> Result<Response, AppError> {
    let outcome = state.db.seed().await?;
    tracing::info!(?outcome, "Seed requested");

    match query.redirect_path() {
        Some(path) => Ok(Redirect::to(path).into_response()),
        None => Ok(Json(outcome).into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_local_redirects_are_followed() {
        let query = |redirect: &str| SeedQuery {
            redirect: Some(redirect.to_string()),
        };

        assert_eq!(query("/es").redirect_path(), Some("/es"));
        assert_eq!(query("/fr/authors").redirect_path(), Some("/fr/authors"));
        assert_eq!(query("/\\evil.example").redirect_path(), None);
        assert_eq!(query("/en/\\evil.example").redirect_path(), None);
        assert_eq!(query("/evil.example").redirect_path(), None);
        assert_eq!(query("//evil.example").redirect_path(), None);
        assert_eq!(query("https://evil.example").redirect_path(), None);
        assert_eq!(SeedQuery::default().redirect_path(), None);
    }
}
