//! SQLite database operations
//!
//! All database access goes through this module.
//! Uses SQLx with runtime-checked queries.

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use super::models::*;
use crate::error::AppError;
use crate::locale::Locale;
use crate::metrics::observe_db_query;
use crate::pagination::PageRequest;

const QUOTE_PROJECTION_WITH_TAGS: &str = r#"
    q.id, q.text, q.language, q.tags, q.created_at,
    a.username AS author_username, a.name AS author_name, a.avatar AS author_avatar
"#;

const QUOTE_PROJECTION_WITHOUT_TAGS: &str = r#"
    q.id, q.text, q.language, NULL AS tags, q.created_at,
    a.username AS author_username, a.name AS author_name, a.avatar AS author_avatar
"#;

/// Newest first; insertion order breaks timestamp ties
const QUOTE_ORDER: &str = "ORDER BY q.created_at DESC, q.rowid DESC";

/// Database connection pool wrapper.
///
/// Built once at startup and shared through `AppState`. Schema features are
/// cached here so queries never probe the schema themselves.
pub struct Database {
    pool: Pool<Sqlite>,
    has_tables: AtomicBool,
    has_tags: AtomicBool,
}

impl Database {
    // =========================================================================
    // Connection
    // =========================================================================

    /// Connect to SQLite database and apply migrations
    ///
    /// Creates the database file if it doesn't exist.
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        Self::connect_with_options(path, 5, true).await
    }

    /// Connect with an explicit pool size, optionally skipping migrations.
    ///
    /// Without migrations an empty file stays uninitialized until
    /// [`Database::migrate`] runs (for example from the seed endpoint).
    pub async fn connect_with_options(
        path: &Path,
        max_connections: u32,
        run_migrations: bool,
    ) -> Result<Self, AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self {
            pool,
            has_tables: AtomicBool::new(false),
            has_tags: AtomicBool::new(false),
        };

        if run_migrations {
            db.migrate().await?;
        } else {
            db.refresh_schema_features().await?;
        }

        tracing::info!(path = %path.display(), "Database connected");
        Ok(db)
    }

    /// Apply pending migrations and refresh the schema feature flags
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Migration(e)
            })?;

        let features = self.refresh_schema_features().await?;
        tracing::info!(tags = features.tags, "Database migrated successfully");
        Ok(())
    }

    /// Probe the live schema once and cache the result.
    pub async fn refresh_schema_features(&self) -> Result<SchemaFeatures, AppError> {
        let table_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('authors', 'quotes')",
        )
        .fetch_one(&self.pool)
        .await?;

        let tags_column = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM pragma_table_info('quotes') WHERE name = 'tags'",
        )
        .fetch_one(&self.pool)
        .await?;

        let features = SchemaFeatures {
            tables: table_count == 2,
            tags: tags_column > 0,
        };
        self.has_tables.store(features.tables, Ordering::Relaxed);
        self.has_tags.store(features.tags, Ordering::Relaxed);

        tracing::debug!(?features, "Schema features resolved");
        Ok(features)
    }

    /// Cached schema features
    pub fn schema_features(&self) -> SchemaFeatures {
        SchemaFeatures {
            tables: self.has_tables.load(Ordering::Relaxed),
            tags: self.has_tags.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    fn ready(&self) -> bool {
        self.has_tables.load(Ordering::Relaxed)
    }

    fn tags_enabled(&self) -> bool {
        self.ready() && self.has_tags.load(Ordering::Relaxed)
    }

    fn quote_projection(&self) -> &'static str {
        if self.tags_enabled() {
            QUOTE_PROJECTION_WITH_TAGS
        } else {
            QUOTE_PROJECTION_WITHOUT_TAGS
        }
    }

    // =========================================================================
    // Quotes
    // =========================================================================

    /// Count quotes in a locale
    pub async fn count_quotes(&self, locale: Locale) -> Result<i64, AppError> {
        if !self.ready() {
            return Ok(0);
        }

        let _timer = observe_db_query("COUNT", "quotes");
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quotes WHERE language = ?")
            .bind(locale.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Get one page of quotes in a locale, newest first
    pub async fn get_quotes(
        &self,
        locale: Locale,
        page: PageRequest,
    ) -> Result<Vec<Quote>, AppError> {
        if !self.ready() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT {}
            FROM quotes q
            JOIN authors a ON q.author_username = a.username
            WHERE q.language = ?
            {QUOTE_ORDER}
            LIMIT ? OFFSET ?
            "#,
            self.quote_projection()
        );

        let _timer = observe_db_query("SELECT", "quotes");
        let rows = sqlx::query_as::<_, QuoteRow>(&sql)
            .bind(locale.as_str())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Quote::from).collect())
    }

    /// Get a quote by id, only if it exists in `locale`
    pub async fn get_quote_by_id(&self, id: &str, locale: Locale) -> Result<Option<Quote>, AppError> {
        if !self.ready() {
            return Ok(None);
        }

        let sql = format!(
            r#"
            SELECT {}
            FROM quotes q
            JOIN authors a ON q.author_username = a.username
            WHERE q.id = ? AND q.language = ?
            "#,
            self.quote_projection()
        );

        let _timer = observe_db_query("SELECT", "quotes");
        let row = sqlx::query_as::<_, QuoteRow>(&sql)
            .bind(id)
            .bind(locale.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Quote::from))
    }

    /// Get a quote by id in whatever language it was written
    pub async fn get_quote(&self, id: &str) -> Result<Option<Quote>, AppError> {
        if !self.ready() {
            return Ok(None);
        }

        let sql = format!(
            r#"
            SELECT {}
            FROM quotes q
            JOIN authors a ON q.author_username = a.username
            WHERE q.id = ?
            "#,
            self.quote_projection()
        );

        let _timer = observe_db_query("SELECT", "quotes");
        let row = sqlx::query_as::<_, QuoteRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Quote::from))
    }

    /// Count an author's quotes in a locale
    pub async fn count_quotes_by_author(
        &self,
        username: &str,
        locale: Locale,
    ) -> Result<i64, AppError> {
        if !self.ready() {
            return Ok(0);
        }

        let _timer = observe_db_query("COUNT", "quotes");
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM quotes WHERE author_username = ? AND language = ?",
        )
        .bind(username)
        .bind(locale.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Get one page of an author's quotes in a locale, newest first
    pub async fn get_quotes_by_author(
        &self,
        username: &str,
        locale: Locale,
        page: PageRequest,
    ) -> Result<Vec<Quote>, AppError> {
        if !self.ready() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT {}
            FROM quotes q
            JOIN authors a ON q.author_username = a.username
            WHERE q.author_username = ? AND q.language = ?
            {QUOTE_ORDER}
            LIMIT ? OFFSET ?
            "#,
            self.quote_projection()
        );

        let _timer = observe_db_query("SELECT", "quotes");
        let rows = sqlx::query_as::<_, QuoteRow>(&sql)
            .bind(username)
            .bind(locale.as_str())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Quote::from).collect())
    }

    /// Count quotes carrying `tag` in a locale; 0 without a tags column
    pub async fn count_quotes_by_tag(&self, tag: &str, locale: Locale) -> Result<i64, AppError> {
        if !self.tags_enabled() {
            return Ok(0);
        }

        let _timer = observe_db_query("COUNT", "quotes");
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM quotes q
            WHERE q.language = ?
              AND q.tags IS NOT NULL
              AND EXISTS (SELECT 1 FROM json_each(q.tags) t WHERE t.value = ?)
            "#,
        )
        .bind(locale.as_str())
        .bind(tag)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Get one page of quotes carrying `tag`, newest first; empty without a tags column
    pub async fn get_quotes_by_tag(
        &self,
        tag: &str,
        locale: Locale,
        page: PageRequest,
    ) -> Result<Vec<Quote>, AppError> {
        if !self.tags_enabled() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT {QUOTE_PROJECTION_WITH_TAGS}
            FROM quotes q
            JOIN authors a ON q.author_username = a.username
            WHERE q.language = ?
              AND q.tags IS NOT NULL
              AND EXISTS (SELECT 1 FROM json_each(q.tags) t WHERE t.value = ?)
            {QUOTE_ORDER}
            LIMIT ? OFFSET ?
            "#
        );

        let _timer = observe_db_query("SELECT", "quotes");
        let rows = sqlx::query_as::<_, QuoteRow>(&sql)
            .bind(locale.as_str())
            .bind(tag)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Quote::from).collect())
    }

    /// Insert a quote
    ///
    /// # Errors
    /// `AppError::Validation` if the author does not exist
    pub async fn create_quote(&self, new_quote: &NewQuote) -> Result<Quote, AppError> {
        if self.get_author_by_username(&new_quote.author_username).await?.is_none() {
            return Err(AppError::Validation(format!(
                "Unknown author: {}",
                new_quote.author_username
            )));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let tags = new_quote.tags.as_deref().map(encode_tags).transpose()?;

        let _timer = observe_db_query("INSERT", "quotes");
        if self.tags_enabled() {
            sqlx::query(
                r#"
                INSERT INTO quotes (id, text, author_username, language, tags, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&id)
            .bind(new_quote.text.trim())
            .bind(&new_quote.author_username)
            .bind(new_quote.language.as_str())
            .bind(&tags)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        } else {
            sqlx::query(
                r#"
                INSERT INTO quotes (id, text, author_username, language, created_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&id)
            .bind(new_quote.text.trim())
            .bind(&new_quote.author_username)
            .bind(new_quote.language.as_str())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        }

        tracing::info!(quote_id = %id, author = %new_quote.author_username, "Quote created");

        self.get_quote(&id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("quote {id} vanished after insert")))
    }

    /// Update a quote's text, language and (when given) tags
    ///
    /// # Returns
    /// The updated quote or None if it does not exist
    pub async fn update_quote(
        &self,
        id: &str,
        update: &QuoteUpdate,
    ) -> Result<Option<Quote>, AppError> {
        if !self.ready() {
            return Ok(None);
        }

        let tags = update.tags.as_deref().map(encode_tags).transpose()?;

        let _timer = observe_db_query("UPDATE", "quotes");
        let result = if self.tags_enabled() {
            sqlx::query(
                "UPDATE quotes SET text = ?, language = COALESCE(?, language), tags = COALESCE(?, tags) WHERE id = ?",
            )
            .bind(update.text.trim())
            .bind(update.language.map(|l| l.as_str()))
            .bind(&tags)
            .bind(id)
            .execute(&self.pool)
            .await?
        } else {
            sqlx::query("UPDATE quotes SET text = ?, language = COALESCE(?, language) WHERE id = ?")
                .bind(update.text.trim())
                .bind(update.language.map(|l| l.as_str()))
                .bind(id)
                .execute(&self.pool)
                .await?
        };

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        tracing::info!(quote_id = %id, "Quote updated");
        self.get_quote(id).await
    }

    /// Delete a quote
    ///
    /// # Returns
    /// `true` if a row was deleted
    pub async fn delete_quote(&self, id: &str) -> Result<bool, AppError> {
        if !self.ready() {
            return Ok(false);
        }

        let _timer = observe_db_query("DELETE", "quotes");
        let result = sqlx::query("DELETE FROM quotes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Authors
    // =========================================================================

    /// Count authors with at least one quote in a locale
    pub async fn count_authors(&self, locale: Locale) -> Result<i64, AppError> {
        if !self.ready() {
            return Ok(0);
        }

        let _timer = observe_db_query("COUNT", "authors");
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM authors a
            WHERE EXISTS (
                SELECT 1 FROM quotes q
                WHERE q.author_username = a.username AND q.language = ?
            )
            "#,
        )
        .bind(locale.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Get one page of authors with quotes in a locale, by name
    pub async fn get_authors(
        &self,
        locale: Locale,
        page: PageRequest,
    ) -> Result<Vec<AuthorSummary>, AppError> {
        if !self.ready() {
            return Ok(Vec::new());
        }

        let _timer = observe_db_query("SELECT", "authors");
        let authors = sqlx::query_as::<_, AuthorSummary>(
            r#"
            SELECT a.username, a.name, a.avatar, COUNT(q.id) AS quote_count
            FROM authors a
            JOIN quotes q ON q.author_username = a.username AND q.language = ?
            GROUP BY a.username, a.name, a.avatar
            ORDER BY a.name, a.username
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(locale.as_str())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    /// Get an author by username
    pub async fn get_author_by_username(&self, username: &str) -> Result<Option<Author>, AppError> {
        if !self.ready() {
            return Ok(None);
        }

        let _timer = observe_db_query("SELECT", "authors");
        let author = sqlx::query_as::<_, Author>(
            r#"
            SELECT username, name, avatar, bio, website, twitter, instagram, facebook, created_at
            FROM authors
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(author)
    }

    /// Count all authors regardless of locale
    pub async fn count_all_authors(&self) -> Result<i64, AppError> {
        if !self.ready() {
            return Ok(0);
        }

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Insert an author
    ///
    /// # Errors
    /// `AppError::Validation` if the username is empty or already taken
    pub async fn create_author(&self, new_author: &NewAuthor) -> Result<Author, AppError> {
        if !self.ready() {
            self.migrate().await?;
        }

        check_website(new_author.website.as_deref())?;

        let username = match new_author.username.as_deref().map(str::trim) {
            Some(username) if !username.is_empty() => username.to_string(),
            _ => username_from_name(&new_author.name),
        };
        if username.is_empty() {
            return Err(AppError::Validation(
                "Cannot derive a username from the author name".to_string(),
            ));
        }

        if self.get_author_by_username(&username).await?.is_some() {
            return Err(AppError::Validation(format!(
                "Author already exists: {username}"
            )));
        }

        let _timer = observe_db_query("INSERT", "authors");
        sqlx::query(
            r#"
            INSERT INTO authors (
                username, name, avatar, bio, website, twitter, instagram, facebook, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&username)
        .bind(new_author.name.trim())
        .bind(new_author.avatar.trim())
        .bind(&new_author.bio)
        .bind(&new_author.website)
        .bind(&new_author.twitter)
        .bind(&new_author.instagram)
        .bind(&new_author.facebook)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::info!(username = %username, "Author created");

        self.get_author_by_username(&username).await?.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("author {username} vanished after insert"))
        })
    }

    /// Update an author's profile
    ///
    /// # Returns
    /// The updated author or None if it does not exist
    pub async fn update_author(
        &self,
        username: &str,
        update: &AuthorUpdate,
    ) -> Result<Option<Author>, AppError> {
        if !self.ready() {
            return Ok(None);
        }
        check_website(update.website.as_deref())?;

        let _timer = observe_db_query("UPDATE", "authors");
        let result = sqlx::query(
            r#"
            UPDATE authors
            SET name = ?, avatar = ?, bio = ?, website = ?, twitter = ?, instagram = ?, facebook = ?
            WHERE username = ?
            "#,
        )
        .bind(update.name.trim())
        .bind(update.avatar.trim())
        .bind(&update.bio)
        .bind(&update.website)
        .bind(&update.twitter)
        .bind(&update.instagram)
        .bind(&update.facebook)
        .bind(username)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        tracing::info!(username = %username, "Author updated");
        self.get_author_by_username(username).await
    }

    /// Delete an author and, through the foreign key, their quotes
    ///
    /// # Returns
    /// `true` if a row was deleted
    pub async fn delete_author(&self, username: &str) -> Result<bool, AppError> {
        if !self.ready() {
            return Ok(false);
        }

        let _timer = observe_db_query("DELETE", "authors");
        let result = sqlx::query("DELETE FROM authors WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// Count distinct tags used in a locale; 0 without a tags column
    pub async fn count_tags(&self, locale: Locale) -> Result<i64, AppError> {
        if !self.tags_enabled() {
            return Ok(0);
        }

        let _timer = observe_db_query("COUNT", "tags");
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT t.value)
            FROM quotes q, json_each(q.tags) t
            WHERE q.language = ? AND q.tags IS NOT NULL
            "#,
        )
        .bind(locale.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Get one page of tags with their quote counts in a locale
    pub async fn get_tags(
        &self,
        locale: Locale,
        page: PageRequest,
        sort: TagSort,
    ) -> Result<Vec<TagCount>, AppError> {
        if !self.tags_enabled() {
            return Ok(Vec::new());
        }

        let order = match sort {
            TagSort::Count => "ORDER BY count DESC, name ASC",
            TagSort::Name => "ORDER BY name ASC",
        };
        let sql = format!(
            r#"
            SELECT t.value AS name, COUNT(*) AS count
            FROM quotes q, json_each(q.tags) t
            WHERE q.language = ? AND q.tags IS NOT NULL
            GROUP BY t.value
            {order}
            LIMIT ? OFFSET ?
            "#
        );

        let _timer = observe_db_query("SELECT", "tags");
        let tags = sqlx::query_as::<_, TagCount>(&sql)
            .bind(locale.as_str())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(tags)
    }

    /// Most used tags in a locale
    pub async fn get_popular_tags(
        &self,
        locale: Locale,
        limit: u32,
    ) -> Result<Vec<TagCount>, AppError> {
        self.get_tags(locale, PageRequest::new(1, limit), TagSort::Count)
            .await
    }
}

fn check_website(website: Option<&str>) -> Result<(), AppError> {
    match website {
        Some(url) if !is_web_url(url) => Err(AppError::Validation(format!(
            "Website must be an http(s) URL: {url}"
        ))),
        _ => Ok(()),
    }
}

/// Normalize and serialize tags for the JSON column
pub(crate) fn encode_tags(tags: &[String]) -> Result<String, AppError> {
    serde_json::to_string(&normalize_tags(tags))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to encode tags: {e}")))
}
