//! Data models
//!
//! Rust structs representing database entities and API inputs.
//! Quotes use UUID v4 ids; authors are keyed by username.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::locale::Locale;

// =============================================================================
// Author
// =============================================================================

/// A quoted person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    /// Identity key, e.g. "nelson_mandela"
    pub username: String,
    pub name: String,
    /// Avatar image URL or path
    pub avatar: String,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Author row for listings, with the number of quotes in one locale
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AuthorSummary {
    pub username: String,
    pub name: String,
    pub avatar: String,
    pub quote_count: i64,
}

/// Input for creating an author
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAuthor {
    /// Derived from `name` when omitted
    pub username: Option<String>,
    pub name: String,
    pub avatar: String,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
}

/// Input for updating an author; absent optional fields are cleared
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorUpdate {
    pub name: String,
    pub avatar: String,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
}

/// Absolute http(s) URL; anything else is never linked
pub fn is_web_url(value: &str) -> bool {
    url::Url::parse(value.trim())
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Lowercase ASCII slug of a display name: "Maya Angelou" -> "maya_angelou"
pub fn username_from_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

// =============================================================================
// Quote
// =============================================================================

/// Author fields embedded in a quote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteAuthor {
    pub username: String,
    pub name: String,
    pub avatar: String,
}

/// A quote in one language
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub id: String,
    pub text: String,
    pub language: String,
    pub tags: Vec<String>,
    pub author: QuoteAuthor,
    pub created_at: DateTime<Utc>,
}

/// Flat quote row joined with its author
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct QuoteRow {
    pub id: String,
    pub text: String,
    pub language: String,
    /// JSON array, NULL when untagged or when the schema has no tags column
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_username: String,
    pub author_name: String,
    pub author_avatar: String,
}

impl From<QuoteRow> for Quote {
    fn from(row: QuoteRow) -> Self {
        let tags = match row.tags.as_deref() {
            Some(raw) => serde_json::from_str::<Vec<String>>(raw).unwrap_or_else(|error| {
                tracing::warn!(quote_id = %row.id, %error, "Ignoring malformed tags");
                Vec::new()
            }),
            None => Vec::new(),
        };

        Self {
            id: row.id,
            text: row.text,
            language: row.language,
            tags,
            author: QuoteAuthor {
                username: row.author_username,
                name: row.author_name,
                avatar: row.author_avatar,
            },
            created_at: row.created_at,
        }
    }
}

/// Input for creating a quote
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuote {
    pub text: String,
    #[serde(alias = "authorId", alias = "authorUsername")]
    pub author_username: String,
    #[serde(default, alias = "lang")]
    pub language: Locale,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Input for updating a quote; `None` fields keep the stored values
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteUpdate {
    pub text: String,
    #[serde(default, alias = "lang")]
    pub language: Option<Locale>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Trim, drop empty and duplicate tags, keeping first-seen order
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !normalized.iter().any(|existing| existing == tag) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}

// =============================================================================
// Tag
// =============================================================================

/// A tag and the number of quotes carrying it in one locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct TagCount {
    pub name: String,
    pub count: i64,
}

/// Ordering of the tags listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSort {
    /// Most used first, then by name
    #[default]
    Count,
    /// Alphabetical
    Name,
}

impl TagSort {
    /// Parse a `sort` query value; unknown values use the default
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("name") => Self::Name,
            _ => Self::Count,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Name => "name",
        }
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Optional schema capabilities, probed at startup and after migrations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchemaFeatures {
    /// `authors` and `quotes` tables exist
    pub tables: bool,
    /// `quotes.tags` column exists
    pub tags: bool,
}

/// Result of `POST /api/seed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeedOutcome {
    AlreadySeeded,
    Seeded { authors: usize, quotes: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_are_slugs() {
        assert_eq!(username_from_name("Maya Angelou"), "maya_angelou");
        assert_eq!(username_from_name("  Dr. Martin  Luther King Jr. "), "dr_martin_luther_king_jr");
        assert_eq!(username_from_name("!!!"), "");
    }

    #[test]
    fn only_http_urls_are_web_urls() {
        assert!(is_web_url("https://mayaangelou.com"));
        assert!(is_web_url(" http://example.com/path "));
        assert!(!is_web_url("javascript:alert(document.cookie)"));
        assert!(!is_web_url("JavaScript:alert(1)"));
        assert!(!is_web_url("data:text/html,hi"));
        assert!(!is_web_url("/relative"));
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        let tags = vec![
            " wisdom ".to_string(),
            "life".to_string(),
            "wisdom".to_string(),
            "".to_string(),
        ];
        assert_eq!(normalize_tags(&tags), vec!["wisdom", "life"]);
    }

    #[test]
    fn tag_sort_defaults_to_count() {
        assert_eq!(TagSort::from_query(None), TagSort::Count);
        assert_eq!(TagSort::from_query(Some("bogus")), TagSort::Count);
        assert_eq!(TagSort::from_query(Some("name")), TagSort::Name);
    }

    #[test]
    fn new_quote_accepts_original_field_names() {
        let quote: NewQuote =
            serde_json::from_str(r#"{"text":"Hi","authorId":"walt_disney","lang":"es"}"#).unwrap();
        assert_eq!(quote.author_username, "walt_disney");
        assert_eq!(quote.language, Locale::Es);
        assert!(quote.tags.is_none());
    }

    #[test]
    fn quote_update_without_lang_leaves_language_unset() {
        let update: QuoteUpdate = serde_json::from_str(r#"{"text":"Hi"}"#).unwrap();
        assert!(update.language.is_none());

        let update: QuoteUpdate = serde_json::from_str(r#"{"text":"Hi","lang":"ar"}"#).unwrap();
        assert_eq!(update.language, Some(Locale::Ar));
    }
}
