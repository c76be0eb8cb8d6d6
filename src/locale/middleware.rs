//! Locale routing middleware
//!
//! Sends unprefixed page requests to their locale-prefixed path and
//! extracts the locale of prefixed ones.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::ACCEPT_LANGUAGE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::{Locale, path_locale, redirect_target};
use crate::AppState;
use crate::api::not_found_response;
use crate::metrics::LOCALE_REDIRECTS_TOTAL;

/// Middleware redirecting `/authors?page=2` to `/{locale}/authors?page=2`
///
/// The locale comes from `Accept-Language`. Redirects use 307 so the
/// method and body are preserved.
///
/// # Usage
/// ```ignore
/// let app = Router::new()
///     .route("/:lang", get(home))
///     .layer(middleware::from_fn_with_state(state, redirect_to_locale));
/// ```
pub async fn redirect_to_locale(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let accept_language = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let target = redirect_target(
        request.uri().path(),
        request.uri().query(),
        accept_language,
        state.config.site.default_locale,
    );

    match target {
        Some(target) => {
            let locale = path_locale(&target).unwrap_or(state.config.site.default_locale);
            LOCALE_REDIRECTS_TOTAL
                .with_label_values(&[locale.as_str()])
                .inc();
            tracing::debug!(from = %request.uri(), to = %target, "Redirecting to locale path");
            Redirect::temporary(&target).into_response()
        }
        None => next.run(request).await,
    }
}

/// Locale of a prefixed page request
///
/// Rejects with the localized 404 page when the first path segment is not
/// a supported locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLocale(pub Locale);

#[async_trait]
impl<S> FromRequestParts<S> for PageLocale
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match path_locale(parts.uri.path()) {
            Some(locale) => Ok(PageLocale(locale)),
            None => {
                let state = AppState::from_ref(state);
                let locale = state.config.site.default_locale;
                Err(not_found_response(&state, locale, parts.uri.path()))
            }
        }
    }
}
