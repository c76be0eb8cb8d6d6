//! Locale resolution
//!
//! Handles:
//! - The fixed set of supported locales and their writing direction
//! - `Accept-Language` negotiation
//! - Deciding whether a request path needs a locale prefix

mod middleware;

pub use middleware::{PageLocale, redirect_to_locale};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported site locale
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
    Ar,
    Fr,
    /// Partially translated; missing strings fall back to English
    Pt,
}

/// Writing direction of a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Self::Rtl)
    }
}

impl Locale {
    /// Every supported locale, in switcher order
    pub const ALL: [Locale; 5] = [Locale::En, Locale::Es, Locale::Ar, Locale::Fr, Locale::Pt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Ar => "ar",
            Self::Fr => "fr",
            Self::Pt => "pt",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::Ar => Direction::Rtl,
            _ => Direction::Ltr,
        }
    }

    /// Name of the language in itself, for the language switcher
    pub fn native_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Español",
            Self::Ar => "العربية",
            Self::Fr => "Français",
            Self::Pt => "Português",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a supported locale code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::ALL
            .into_iter()
            .find(|locale| locale.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnsupportedLocale(s.to_string()))
    }
}

/// One entry of an `Accept-Language` header
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePreference {
    pub tag: String,
    pub quality: f32,
}

/// Parse an `Accept-Language` header into preferences, best first.
///
/// Entries with an unparsable or zero weight are dropped. Equal weights
/// keep header order.
pub fn parse_accept_language(header: &str) -> Vec<LanguagePreference> {
    let mut preferences: Vec<LanguagePreference> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() {
                return None;
            }

            let mut quality = 1.0_f32;
            for param in parts {
                let Some((key, value)) = param.split_once('=') else {
                    continue;
                };
                if key.trim().eq_ignore_ascii_case("q") {
                    quality = value.trim().parse::<f32>().ok()?;
                }
            }

            if !(quality > 0.0 && quality <= 1.0) {
                return None;
            }

            Some(LanguagePreference {
                tag: tag.to_string(),
                quality,
            })
        })
        .collect();

    // sort_by is stable, so ties keep header order
    preferences.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    preferences
}

/// Pick the best supported locale for an `Accept-Language` header.
///
/// Each preference is tried in order: an exact tag match first, then its
/// primary language subtag (`fr-FR` matches `fr`). `*` selects the default.
pub fn negotiate(header: &str, supported: &[Locale], default: Locale) -> Locale {
    for preference in parse_accept_language(header) {
        if preference.tag == "*" {
            return default;
        }

        if let Some(locale) = supported
            .iter()
            .find(|locale| locale.as_str().eq_ignore_ascii_case(&preference.tag))
        {
            return *locale;
        }

        let primary = preference
            .tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default();
        if let Some(locale) = supported
            .iter()
            .find(|locale| locale.as_str().eq_ignore_ascii_case(primary))
        {
            return *locale;
        }
    }

    default
}

/// Locale prefix of a path, when it has one.
///
/// A path is prefixed when it is exactly `/{locale}` or starts with
/// `/{locale}/`.
pub fn path_locale(path: &str) -> Option<Locale> {
    let rest = path.strip_prefix('/')?;
    let segment = rest.split('/').next()?;
    Locale::ALL
        .into_iter()
        .find(|locale| locale.as_str() == segment)
}

/// Paths that are never locale-prefixed
pub fn is_excluded_path(path: &str) -> bool {
    const EXCLUDED_PREFIXES: [&str; 5] = ["/_next", "/api", "/static", "/health", "/metrics"];

    EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
        || path.contains("/favicon.ico")
        || path.contains('.')
}

/// Where to redirect a request that lacks a locale prefix.
///
/// Returns `None` when the path already carries a locale or is excluded.
pub fn redirect_target(
    path: &str,
    query: Option<&str>,
    accept_language: &str,
    default: Locale,
) -> Option<String> {
    if path_locale(path).is_some() || is_excluded_path(path) {
        return None;
    }

    let locale = negotiate(accept_language, &Locale::ALL, default);
    let mut target = if path == "/" || path.is_empty() {
        format!("/{locale}")
    } else {
        format!("/{locale}{path}")
    };

    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }

    Some(target)
}
