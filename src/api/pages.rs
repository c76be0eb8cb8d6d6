//! HTML page routes
//!
//! Every page lives under a locale prefix. Handlers build a per-request
//! [`CatalogService`], gather the listing for the page, then hand plain
//! data to the renderer.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::AppState;
use crate::data::TagSort;
use crate::locale::{Locale, PageLocale, path_locale};
use crate::pagination::{
    AUTHORS_PER_PAGE, HOME_QUOTES_PER_PAGE, LISTING_QUOTES_PER_PAGE, PageRequest, TAGS_PER_PAGE,
    parse_page,
};
use crate::render::{self, PageContext};
use crate::service::CatalogService;

/// Tags shown under the home listing
const POPULAR_TAGS: u32 = 12;

/// Create page router
///
/// Routes:
/// - GET /:lang - Latest quotes
/// - GET /:lang/authors - Authors with quotes in the locale
/// - GET /:lang/authors/:username - Author profile and quotes
/// - GET /:lang/tags - Tags, by count or name
/// - GET /:lang/tags/:tag - Quotes with a tag
/// - GET /:lang/quotes/:id - Single quote
pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/:lang", get(home))
        .route("/:lang/authors", get(authors))
        .route("/:lang/authors/:username", get(author))
        .route("/:lang/tags", get(tags))
        .route("/:lang/tags/:tag", get(tag))
        .route("/:lang/quotes/:id", get(quote))
}

/// `page` and `sort` query parameters; both are lenient
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub page: Option<String>,
    pub sort: Option<String>,
}

impl ListingQuery {
    fn page(&self, per_page: u32) -> PageRequest {
        PageRequest::new(parse_page(self.page.as_deref()), per_page)
    }
}

/// Path without its locale prefix; `/es/authors` -> `/authors`, `/es` -> ``
fn unprefixed(path: &str) -> &str {
    match path_locale(path) {
        Some(locale) => &path[locale.as_str().len() + 1..],
        None => path,
    }
}

fn page_context<'a>(
    state: &'a AppState,
    locale: Locale,
    dictionary: &'a crate::i18n::Dictionary,
    path: &'a str,
) -> PageContext<'a> {
    PageContext {
        locale,
        dictionary,
        site_name: &state.config.site.name,
        path: unprefixed(path),
    }
}

/// Localized 404 page
pub fn not_found_response(state: &AppState, locale: Locale, path: &str) -> Response {
    let dictionary = state.dictionaries.get(locale);
    let ctx = page_context(state, locale, &dictionary, path);
    (StatusCode::NOT_FOUND, Html(render::not_found_page(&ctx))).into_response()
}

/// Fallback for unmatched paths
pub async fn not_found(State(state): State<AppState>, uri: Uri) -> Response {
    let locale = path_locale(uri.path()).unwrap_or(state.config.site.default_locale);
    not_found_response(&state, locale, uri.path())
}

/// GET /:lang
async fn home(
    State(state): State<AppState>,
    PageLocale(locale): PageLocale,
    Query(query): Query<ListingQuery>,
    uri: Uri,
) -> Html<String> {
    let catalog = CatalogService::new(state.db.clone());
    let listing = catalog
        .quotes(locale, query.page(HOME_QUOTES_PER_PAGE))
        .await;
    let popular_tags = catalog.popular_tags(locale, POPULAR_TAGS).await;

    let dictionary = state.dictionaries.get(locale);
    let ctx = page_context(&state, locale, &dictionary, uri.path());
    Html(render::home_page(&ctx, &listing, &popular_tags))
}

/// GET /:lang/authors
async fn authors(
    State(state): State<AppState>,
    PageLocale(locale): PageLocale,
    Query(query): Query<ListingQuery>,
    uri: Uri,
) -> Html<String> {
    let catalog = CatalogService::new(state.db.clone());
    let listing = catalog.authors(locale, query.page(AUTHORS_PER_PAGE)).await;

    let dictionary = state.dictionaries.get(locale);
    let ctx = page_context(&state, locale, &dictionary, uri.path());
    Html(render::authors_page(&ctx, &listing))
}

/// GET /:lang/authors/:username
async fn author(
    State(state): State<AppState>,
    PageLocale(locale): PageLocale,
    Path((_, username)): Path<(String, String)>,
    Query(query): Query<ListingQuery>,
    uri: Uri,
) -> Response {
    let catalog = CatalogService::new(state.db.clone());
    let Some(author) = catalog.author(&username).await else {
        return not_found_response(&state, locale, uri.path());
    };
    let listing = catalog
        .quotes_by_author(&username, locale, query.page(LISTING_QUOTES_PER_PAGE))
        .await;

    let dictionary = state.dictionaries.get(locale);
    let ctx = page_context(&state, locale, &dictionary, uri.path());
    Html(render::author_page(&ctx, &author, &listing)).into_response()
}

/// GET /:lang/tags
async fn tags(
    State(state): State<AppState>,
    PageLocale(locale): PageLocale,
    Query(query): Query<ListingQuery>,
    uri: Uri,
) -> Html<String> {
    let sort = TagSort::from_query(query.sort.as_deref());
    let catalog = CatalogService::new(state.db.clone());
    let listing = catalog
        .tags(locale, query.page(TAGS_PER_PAGE), sort)
        .await;

    let dictionary = state.dictionaries.get(locale);
    let ctx = page_context(&state, locale, &dictionary, uri.path());
    Html(render::tags_page(&ctx, &listing, sort))
}

/// GET /:lang/tags/:tag
async fn tag(
    State(state): State<AppState>,
    PageLocale(locale): PageLocale,
    Path((_, tag)): Path<(String, String)>,
    Query(query): Query<ListingQuery>,
    uri: Uri,
) -> Html<String> {
    let catalog = CatalogService::new(state.db.clone());
    let listing = catalog
        .quotes_by_tag(&tag, locale, query.page(LISTING_QUOTES_PER_PAGE))
        .await;

    let dictionary = state.dictionaries.get(locale);
    let ctx = page_context(&state, locale, &dictionary, uri.path());
    Html(render::tag_page(&ctx, &tag, &listing))
}

/// GET /:lang/quotes/:id
async fn quote(
    State(state): State<AppState>,
    PageLocale(locale): PageLocale,
    Path((_, id)): Path<(String, String)>,
    uri: Uri,
) -> Response {
    let catalog = CatalogService::new(state.db.clone());
    let Some(quote) = catalog.quote(&id, locale).await else {
        return not_found_response(&state, locale, uri.path());
    };

    let dictionary = state.dictionaries.get(locale);
    let ctx = page_context(&state, locale, &dictionary, uri.path());
    Html(render::quote_page(&ctx, &quote)).into_response()
}
