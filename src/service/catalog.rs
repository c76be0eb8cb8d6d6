//! Catalog service
//!
//! Read side used by page renders: count, paginate and fetch quotes,
//! authors and tags for one locale. Every call goes through the
//! request-scoped [`RenderCache`], and query failures are logged and
//! replaced by empty results so a page always renders.

use std::sync::Arc;

use crate::data::{
    Author, AuthorSummary, Database, QueryKey, Quote, RenderCache, TagCount, TagSort,
};
use crate::error::AppError;
use crate::locale::Locale;
use crate::pagination::{Page, PageRequest};

/// One page of a listing together with its pagination state
#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub items: Arc<Vec<T>>,
    pub page: Page,
}

impl<T> Listing<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Per-request catalog service
pub struct CatalogService {
    db: Arc<Database>,
    cache: RenderCache,
}

impl CatalogService {
    /// Create a service with a fresh cache for one request
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            cache: RenderCache::new(),
        }
    }

    /// Home listing, newest first
    pub async fn quotes(&self, locale: Locale, request: PageRequest) -> Listing<Quote> {
        let total = self
            .cache
            .count(QueryKey::Quotes(locale, None), self.db.count_quotes(locale))
            .await;
        let items = self
            .cache
            .quotes(
                QueryKey::Quotes(locale, Some(request)),
                self.db.get_quotes(locale, request),
            )
            .await;

        listing("quotes", request, total, items)
    }

    /// An author's quotes in `locale`
    pub async fn quotes_by_author(
        &self,
        username: &str,
        locale: Locale,
        request: PageRequest,
    ) -> Listing<Quote> {
        let total = self
            .cache
            .count(
                QueryKey::QuotesByAuthor(username.to_string(), locale, None),
                self.db.count_quotes_by_author(username, locale),
            )
            .await;
        let items = self
            .cache
            .quotes(
                QueryKey::QuotesByAuthor(username.to_string(), locale, Some(request)),
                self.db.get_quotes_by_author(username, locale, request),
            )
            .await;

        listing("quotes_by_author", request, total, items)
    }

    /// Quotes carrying `tag` in `locale`
    pub async fn quotes_by_tag(
        &self,
        tag: &str,
        locale: Locale,
        request: PageRequest,
    ) -> Listing<Quote> {
        let total = self
            .cache
            .count(
                QueryKey::QuotesByTag(tag.to_string(), locale, None),
                self.db.count_quotes_by_tag(tag, locale),
            )
            .await;
        let items = self
            .cache
            .quotes(
                QueryKey::QuotesByTag(tag.to_string(), locale, Some(request)),
                self.db.get_quotes_by_tag(tag, locale, request),
            )
            .await;

        listing("quotes_by_tag", request, total, items)
    }

    /// Authors with at least one quote in `locale`
    pub async fn authors(&self, locale: Locale, request: PageRequest) -> Listing<AuthorSummary> {
        let total = self
            .cache
            .count(QueryKey::Authors(locale, None), self.db.count_authors(locale))
            .await;
        let items = self
            .cache
            .authors(
                QueryKey::Authors(locale, Some(request)),
                self.db.get_authors(locale, request),
            )
            .await;

        listing("authors", request, total, items)
    }

    pub async fn tags(
        &self,
        locale: Locale,
        request: PageRequest,
        sort: TagSort,
    ) -> Listing<TagCount> {
        let total = self
            .cache
            .count(QueryKey::Tags(locale, None, sort), self.db.count_tags(locale))
            .await;
        let items = self
            .cache
            .tags(
                QueryKey::Tags(locale, Some(request), sort),
                self.db.get_tags(locale, request, sort),
            )
            .await;

        listing("tags", request, total, items)
    }

    pub async fn popular_tags(&self, locale: Locale, limit: u32) -> Arc<Vec<TagCount>> {
        let result = self
            .cache
            .tags(
                QueryKey::PopularTags(locale, limit),
                self.db.get_popular_tags(locale, limit),
            )
            .await;

        degrade("popular_tags", result, Arc::default())
    }

    pub async fn author(&self, username: &str) -> Option<Author> {
        degrade(
            "author",
            self.db.get_author_by_username(username).await,
            None,
        )
    }

    pub async fn quote(&self, id: &str, locale: Locale) -> Option<Quote> {
        degrade("quote", self.db.get_quote_by_id(id, locale).await, None)
    }
}

fn listing<T>(
    operation: &'static str,
    request: PageRequest,
    total: Result<i64, AppError>,
    items: Result<Arc<Vec<T>>, AppError>,
) -> Listing<T> {
    let total = degrade(operation, total, 0);
    let items = degrade(operation, items, Arc::new(Vec::new()));

    Listing {
        items,
        page: Page::new(request, total),
    }
}

fn degrade<T>(operation: &'static str, result: Result<T, AppError>, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(error) => {
            tracing::error!(operation, %error, "Query failed, rendering empty result");
            crate::metrics::ERRORS_TOTAL
                .with_label_values(&[error.kind(), "render"])
                .inc();
            fallback
        }
    }
}
