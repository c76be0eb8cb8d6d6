//! Page math and page-link lists
//!
//! Everything here is pure: no I/O, no state. A render computes a
//! [`Page`] from the total count and builds a [`PaginationView`] from it.

use serde::Serialize;

use crate::i18n::PaginationStrings;
use crate::locale::Direction;

/// Quotes on the home page
pub const HOME_QUOTES_PER_PAGE: u32 = 6;
/// Quotes on author and tag pages
pub const LISTING_QUOTES_PER_PAGE: u32 = 9;
/// Authors on the authors page
pub const AUTHORS_PER_PAGE: u32 = 12;
/// Tags on the tags page
pub const TAGS_PER_PAGE: u32 = 30;

/// Number of pages needed for `total` items; never less than 1.
pub fn total_pages(total: i64, per_page: u32) -> u32 {
    if total <= 0 || per_page == 0 {
        return 1;
    }
    let per_page = i64::from(per_page);
    let pages = (total + per_page - 1) / per_page;
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

/// Parse a `page` query value; anything that is not a positive integer is page 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

/// A requested slice of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page,
        }
    }

    /// Rows to skip: `(page - 1) * per_page`
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

/// One entry of a page-link list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "page")]
pub enum PageToken {
    Page(u32),
    Gap,
}

/// Page list: 1, the neighbours of `current`, and `total`, with gaps.
///
/// Neighbours are clamped to `[2, total - 1]`. A [`PageToken::Gap`] sits
/// between any two numbers that are not adjacent.
pub fn build_page_list(current: u32, total: u32) -> Vec<PageToken> {
    let mut numbers = vec![1u32];

    let low = current.saturating_sub(1).max(2);
    let high = current.saturating_add(1).min(total.saturating_sub(1));
    for page in low..=high {
        numbers.push(page);
    }

    if total > 1 {
        numbers.push(total);
    }

    let mut tokens = Vec::with_capacity(numbers.len() * 2);
    let mut previous: Option<u32> = None;
    for page in numbers {
        if let Some(prev) = previous {
            if page <= prev {
                continue;
            }
            if page > prev + 1 {
                tokens.push(PageToken::Gap);
            }
        }
        tokens.push(PageToken::Page(page));
        previous = Some(page);
    }

    tokens
}

/// Narrow-viewport variant: keep only the first, last and current page and gaps.
pub fn compact_page_list(tokens: &[PageToken], current: u32, total: u32) -> Vec<PageToken> {
    tokens
        .iter()
        .copied()
        .filter(|token| match token {
            PageToken::Gap => true,
            PageToken::Page(n) => *n == 1 || *n == total || *n == current,
        })
        .collect()
}

/// Link to page `n` of a listing rooted at `base_url`
pub fn page_href(base_url: &str, page: u32) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{separator}page={page}")
}

/// Pagination result for one listing render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub current: u32,
    pub total_pages: u32,
    pub per_page: u32,
    pub total_items: i64,
    pub tokens: Vec<PageToken>,
}

impl Page {
    pub fn new(request: PageRequest, total_items: i64) -> Self {
        let total_pages = total_pages(total_items, request.per_page);
        Self {
            current: request.page,
            total_pages,
            per_page: request.per_page,
            total_items,
            tokens: build_page_list(request.page, total_pages),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }
}

/// Which way an arrow icon points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrow {
    Left,
    Right,
}

/// A previous/next control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub href: String,
    /// Visible text
    pub label: String,
    /// Accessible name; always describes the real target
    pub aria_label: String,
    pub arrow: Arrow,
}

/// A numbered link or a gap marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub token: PageToken,
    pub href: Option<String>,
    pub is_current: bool,
    /// Hidden on narrow viewports
    pub wide_only: bool,
}

/// Everything the pagination control needs to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationView {
    pub previous: Option<NavLink>,
    pub links: Vec<PageLink>,
    pub next: Option<NavLink>,
}

impl PaginationView {
    /// Build links for `page` under `base_url`.
    ///
    /// In rtl locales the visible previous/next labels trade places and the
    /// arrows point the other way; hrefs and aria labels stay the same.
    pub fn new(
        page: &Page,
        base_url: &str,
        direction: Direction,
        strings: &PaginationStrings,
    ) -> Self {
        let rtl = direction.is_rtl();

        let previous = page.has_previous().then(|| NavLink {
            href: page_href(base_url, page.current - 1),
            label: if rtl {
                strings.next.clone()
            } else {
                strings.previous.clone()
            },
            aria_label: strings.previous.clone(),
            arrow: if rtl { Arrow::Right } else { Arrow::Left },
        });

        let next = page.has_next().then(|| NavLink {
            href: page_href(base_url, page.current + 1),
            label: if rtl {
                strings.previous.clone()
            } else {
                strings.next.clone()
            },
            aria_label: strings.next.clone(),
            arrow: if rtl { Arrow::Left } else { Arrow::Right },
        });

        let compact = compact_page_list(&page.tokens, page.current, page.total_pages);
        let links = page
            .tokens
            .iter()
            .map(|token| PageLink {
                token: *token,
                href: match token {
                    PageToken::Page(n) => Some(page_href(base_url, *n)),
                    PageToken::Gap => None,
                },
                is_current: *token == PageToken::Page(page.current),
                wide_only: !compact.contains(token),
            })
            .collect();

        Self {
            previous,
            links,
            next,
        }
    }

    /// A single page needs no control
    pub fn is_trivial(&self) -> bool {
        self.previous.is_none() && self.next.is_none()
    }
}
