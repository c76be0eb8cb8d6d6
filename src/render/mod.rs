//! Server-side HTML rendering
//!
//! Pages are plain strings built with `format!`. Every piece of data is
//! escaped on the way in: text with [`text`], attribute values with
//! [`attr`], and path segments with [`segment`].
//!
//! Inputs are passed explicitly through [`PageContext`]; nothing here
//! touches the database.

mod components;
mod layout;
mod pages;

pub use pages::{author_page, authors_page, home_page, not_found_page, quote_page, tag_page, tags_page};

use std::borrow::Cow;

use crate::i18n::Dictionary;
use crate::locale::Locale;

/// Everything shared by one page render
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub locale: Locale,
    pub dictionary: &'a Dictionary,
    pub site_name: &'a str,
    /// Request path without the locale prefix, e.g. `/authors`; empty for home
    pub path: &'a str,
}

impl<'a> PageContext<'a> {
    /// `/{locale}{suffix}`
    pub fn href(&self, suffix: &str) -> String {
        format!("/{}{}", self.locale, suffix)
    }
}

/// Escape text content
pub(crate) fn text(value: &str) -> Cow<'_, str> {
    html_escape::encode_text(value)
}

/// Escape a double-quoted attribute value
pub(crate) fn attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

/// Percent-encode one path segment
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}
