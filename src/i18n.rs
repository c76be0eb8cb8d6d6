//! UI dictionaries
//!
//! One JSON dictionary per locale is compiled into the binary. Partial
//! dictionaries are merged key by key over English before deserializing,
//! so every locale yields a complete [`Dictionary`].

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AppError;
use crate::locale::Locale;

const ENGLISH: &str = include_str!("../dictionaries/en.json");

fn source(locale: Locale) -> &'static str {
    match locale {
        Locale::En => ENGLISH,
        Locale::Es => include_str!("../dictionaries/es.json"),
        Locale::Ar => include_str!("../dictionaries/ar.json"),
        Locale::Fr => include_str!("../dictionaries/fr.json"),
        Locale::Pt => include_str!("../dictionaries/pt.json"),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dictionary {
    pub metadata: MetadataStrings,
    pub navigation: NavigationStrings,
    pub home: HomeStrings,
    pub quotes: QuoteStrings,
    pub authors: AuthorStrings,
    pub tags: TagStrings,
    pub pagination: PaginationStrings,
    pub footer: FooterStrings,
    pub not_found: NotFoundStrings,
    pub database: DatabaseStrings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataStrings {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationStrings {
    pub home: String,
    pub authors: String,
    pub tags: String,
    pub all_authors: String,
    pub back_to_home: String,
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeStrings {
    pub title: String,
    pub description: String,
    pub popular_tags: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteStrings {
    pub quote_by: String,
    pub not_found: String,
    pub view_quote: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorStrings {
    pub all_authors: String,
    pub quotes_by: String,
    pub explore_quotes_by: String,
    pub view_quotes: String,
    pub quote: String,
    pub quotes: String,
    pub no_quotes: String,
    pub not_found: String,
    pub description: String,
    pub website: String,
}

impl AuthorStrings {
    /// "1 quote" / "3 quotes"
    pub fn quote_count(&self, count: i64) -> String {
        let noun = if count == 1 { &self.quote } else { &self.quotes };
        format!("{count} {noun}")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagStrings {
    pub all_tags: String,
    pub description: String,
    pub no_tags: String,
    pub quotes_with_tag: String,
    pub explore_quotes_with_tag: String,
    pub no_quotes: String,
    pub sort_by_count: String,
    pub sort_by_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationStrings {
    pub previous: String,
    pub next: String,
    pub more_pages: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FooterStrings {
    pub copyright: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotFoundStrings {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseStrings {
    pub title: String,
    pub description: String,
    pub initialize: String,
}

/// All dictionaries, loaded once at startup
#[derive(Debug, Clone)]
pub struct Dictionaries {
    english: Arc<Dictionary>,
    by_locale: HashMap<Locale, Arc<Dictionary>>,
}

impl Dictionaries {
    /// Parse every bundled dictionary.
    ///
    /// # Errors
    /// Returns `AppError::Config` if a dictionary is not valid JSON or the
    /// English dictionary is missing a key.
    pub fn load() -> Result<Self, AppError> {
        let english: Value = parse(Locale::En, ENGLISH)?;

        let mut by_locale = HashMap::new();
        for locale in Locale::ALL {
            let mut merged = english.clone();
            if locale != Locale::En {
                let overrides = parse(locale, source(locale))?;
                merge(&mut merged, overrides);
            }

            let dictionary: Dictionary = serde_json::from_value(merged).map_err(|e| {
                AppError::Config(format!("dictionary for {locale} is incomplete: {e}"))
            })?;
            by_locale.insert(locale, Arc::new(dictionary));
        }

        let english = by_locale
            .get(&Locale::En)
            .cloned()
            .ok_or_else(|| AppError::Config("english dictionary failed to load".to_string()))?;

        tracing::debug!(locales = by_locale.len(), "Dictionaries loaded");
        Ok(Self { english, by_locale })
    }

    /// Dictionary for a locale
    pub fn get(&self, locale: Locale) -> Arc<Dictionary> {
        self.by_locale
            .get(&locale)
            .cloned()
            .unwrap_or_else(|| self.english.clone())
    }
}

fn parse(locale: Locale, raw: &str) -> Result<Value, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::Config(format!("dictionary for {locale} is not valid JSON: {e}")))
}

/// Deep-merge `overrides` into `base`; objects merge, everything else replaces.
fn merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overrides) => *base = overrides,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_locale_loads() {
        let dictionaries = Dictionaries::load().unwrap();
        for locale in Locale::ALL {
            assert!(!dictionaries.get(locale).pagination.next.is_empty());
        }
    }

    #[test]
    fn partial_locale_falls_back_to_english() {
        let dictionaries = Dictionaries::load().unwrap();
        let pt = dictionaries.get(Locale::Pt);
        let en = dictionaries.get(Locale::En);

        assert_eq!(pt.pagination.next, "Próximo");
        assert_eq!(pt.tags.all_tags, en.tags.all_tags);
        assert_eq!(pt.not_found.title, "Página não encontrada");
        assert_eq!(pt.not_found.message, en.not_found.message);
    }

    #[test]
    fn quote_count_pluralizes() {
        let dictionaries = Dictionaries::load().unwrap();
        let en = dictionaries.get(Locale::En);
        assert_eq!(en.authors.quote_count(1), "1 quote");
        assert_eq!(en.authors.quote_count(3), "3 quotes");
    }
}
