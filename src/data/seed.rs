//! Bundled sample data
//!
//! `POST /api/seed` creates the tables if needed and loads a fixed set of
//! authors with their quotes in every translated locale. Seeding an
//! already populated database does nothing.

use chrono::Utc;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::database::{Database, encode_tags};
use super::models::SeedOutcome;
use crate::error::AppError;
use crate::locale::Locale;

const SEED_DATA: &str = include_str!("../../seed/quotes.json");

#[derive(Debug, Deserialize)]
pub(crate) struct SeedData {
    pub authors: Vec<SeedAuthor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeedAuthor {
    pub username: String,
    pub name: String,
    pub avatar: String,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    /// Quotes keyed by locale
    pub quotes: BTreeMap<Locale, Vec<SeedQuote>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeedQuote {
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SeedAuthor {
    pub fn quote_count(&self) -> usize {
        self.quotes.values().map(Vec::len).sum()
    }
}

/// Parse the bundled seed file
pub(crate) fn seed_data() -> Result<SeedData, AppError> {
    serde_json::from_str(SEED_DATA)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid seed data: {e}")))
}

impl Database {
    /// Create tables and load the sample data.
    ///
    /// Each author is inserted with their quotes in one transaction. An
    /// author that fails to insert is logged and skipped.
    ///
    /// # Errors
    /// Returns error if migrations fail or the seed file is invalid
    pub async fn seed(&self) -> Result<SeedOutcome, AppError> {
        self.migrate().await?;

        let existing = self.count_all_authors().await?;
        if existing > 0 {
            tracing::info!(authors = existing, "Database already seeded");
            return Ok(SeedOutcome::AlreadySeeded);
        }

        let data = seed_data()?;
        let with_tags = self.schema_features().tags;

        let mut authors = 0;
        let mut quotes = 0;
        for author in &data.authors {
            match self.insert_seed_author(author, with_tags).await {
                Ok(inserted) => {
                    tracing::debug!(
                        username = %author.username,
                        quotes = inserted,
                        expected = author.quote_count(),
                        "Seeded author"
                    );
                    authors += 1;
                    quotes += inserted;
                }
                Err(error) => {
                    tracing::error!(username = %author.username, %error, "Failed to seed author");
                }
            }
        }

        self.refresh_schema_features().await?;
        tracing::info!(authors, quotes, "Database seeded");

        Ok(SeedOutcome::Seeded { authors, quotes })
    }

    async fn insert_seed_author(
        &self,
        author: &SeedAuthor,
        with_tags: bool,
    ) -> Result<usize, AppError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO authors (
                username, name, avatar, bio, website, twitter, instagram, facebook, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&author.username)
        .bind(&author.name)
        .bind(&author.avatar)
        .bind(&author.bio)
        .bind(&author.website)
        .bind(&author.twitter)
        .bind(&author.instagram)
        .bind(&author.facebook)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let mut inserted = 0;
        for (locale, quotes) in &author.quotes {
            for quote in quotes {
                let id = uuid::Uuid::new_v4().to_string();
                if with_tags {
                    sqlx::query(
                        r#"
                        INSERT INTO quotes (id, text, author_username, language, tags, created_at)
                        VALUES (?, ?, ?, ?, ?, ?)
                        "#,
                    )
                    .bind(&id)
                    .bind(&quote.text)
                    .bind(&author.username)
                    .bind(locale.as_str())
                    .bind(encode_tags(&quote.tags)?)
                    .bind(Utc::now())
                    .execute(&mut *tx)
                    .await?;
                } else {
                    sqlx::query(
                        r#"
                        INSERT INTO quotes (id, text, author_username, language, created_at)
                        VALUES (?, ?, ?, ?, ?)
                        "#,
                    )
                    .bind(&id)
                    .bind(&quote.text)
                    .bind(&author.username)
                    .bind(locale.as_str())
                    .bind(Utc::now())
                    .execute(&mut *tx)
                    .await?;
                }
                inserted += 1;
            }
        }

        tx.commit().await?;
        tracing::debug!(username = %author.username, quotes = inserted, "Seeded author");
        Ok(inserted)
    }
}
