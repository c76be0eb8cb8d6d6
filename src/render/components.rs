//! Reusable page fragments

use super::{PageContext, attr, segment, text};
use crate::data::{AuthorSummary, Quote, TagCount};
use crate::pagination::{Arrow, NavLink, PageToken, PaginationView};

pub(crate) fn quote_card(ctx: &PageContext<'_>, quote: &Quote) -> String {
    let quote_href = ctx.href(&format!("/quotes/{}", segment(&quote.id)));
    let author_href = ctx.href(&format!("/authors/{}", segment(&quote.author.username)));

    format!(
        r#"<article class="quote">
  <blockquote><a href="{quote_href}">{quote_text}</a></blockquote>
  <p class="quote-author"><img src="{avatar}" alt="" width="40" height="40" /> <a href="{author_href}">{author}</a></p>
  {tags}
</article>"#,
        quote_href = attr(&quote_href),
        quote_text = text(&quote.text),
        avatar = attr(&quote.author.avatar),
        author_href = attr(&author_href),
        author = text(&quote.author.name),
        tags = tag_list(ctx, quote.tags.iter().map(String::as_str)),
    )
}

pub(crate) fn quote_grid(ctx: &PageContext<'_>, quotes: &[Quote], empty_message: &str) -> String {
    if quotes.is_empty() {
        return format!(r#"<p class="empty">{}</p>"#, text(empty_message));
    }

    let cards: Vec<String> = quotes.iter().map(|q| quote_card(ctx, q)).collect();
    format!(r#"<section class="quotes">{}</section>"#, cards.join("\n"))
}

pub(crate) fn tag_list<'t>(ctx: &PageContext<'_>, tags: impl Iterator<Item = &'t str>) -> String {
    let chips: Vec<String> = tags.map(|tag| tag_chip(ctx, tag, None)).collect();
    if chips.is_empty() {
        return String::new();
    }
    format!(r#"<ul class="tags">{}</ul>"#, chips.join(""))
}

pub(crate) fn tag_chip(ctx: &PageContext<'_>, tag: &str, count: Option<i64>) -> String {
    let href = ctx.href(&format!("/tags/{}", segment(tag)));
    let count = count
        .map(|count| format!(r#" <span class="count">{count}</span>"#))
        .unwrap_or_default();
    format!(
        r#"<li><a href="{}">#{}</a>{count}</li>"#,
        attr(&href),
        text(tag),
    )
}

pub(crate) fn tag_cloud(ctx: &PageContext<'_>, tags: &[TagCount]) -> String {
    let chips: Vec<String> = tags
        .iter()
        .map(|tag| tag_chip(ctx, &tag.name, Some(tag.count)))
        .collect();
    format!(r#"<ul class="tags">{}</ul>"#, chips.join(""))
}

pub(crate) fn author_card(ctx: &PageContext<'_>, author: &AuthorSummary) -> String {
    let href = ctx.href(&format!("/authors/{}", segment(&author.username)));
    format!(
        r#"<article class="author">
  <img src="{avatar}" alt="" width="80" height="80" />
  <h2>{name}</h2>
  <p>{count}</p>
  <a href="{href}">{view}</a>
</article>"#,
        avatar = attr(&author.avatar),
        name = text(&author.name),
        count = text(&ctx.dictionary.authors.quote_count(author.quote_count)),
        href = attr(&href),
        view = text(&ctx.dictionary.authors.view_quotes),
    )
}

/// Previous/next and numbered page links; empty for a single page.
pub(crate) fn pagination(ctx: &PageContext<'_>, view: &PaginationView) -> String {
    if view.is_trivial() {
        return String::new();
    }

    let mut parts = Vec::with_capacity(view.links.len() + 2);
    if let Some(previous) = &view.previous {
        parts.push(nav_link(previous, "prev"));
    }

    for link in &view.links {
        let class = if link.wide_only { r#" class="wide-only""# } else { "" };
        let part = match (&link.token, &link.href) {
            (PageToken::Page(n), _) if link.is_current => {
                format!(r#"<span{class} aria-current="page">{n}</span>"#)
            }
            (PageToken::Page(n), Some(href)) => {
                format!(r#"<a{class} href="{}">{n}</a>"#, attr(href))
            }
            _ => format!(
                r#"<span{class} aria-label="{}">&hellip;</span>"#,
                attr(&ctx.dictionary.pagination.more_pages)
            ),
        };
        parts.push(part);
    }

    if let Some(next) = &view.next {
        parts.push(nav_link(next, "next"));
    }

    format!(
        r#"<nav class="pagination" aria-label="pagination">{}</nav>"#,
        parts.join(" ")
    )
}

fn nav_link(link: &NavLink, rel: &str) -> String {
    let arrow = match link.arrow {
        Arrow::Left => "&larr;",
        Arrow::Right => "&rarr;",
    };
    // the arrow leads on previous and trails on next, in reading order
    let content = if rel == "prev" {
        format!(r#"<span aria-hidden="true">{arrow}</span> {}"#, text(&link.label))
    } else {
        format!(r#"{} <span aria-hidden="true">{arrow}</span>"#, text(&link.label))
    };
    format!(
        r#"<a rel="{rel}" href="{}" aria-label="{}">{content}</a>"#,
        attr(&link.href),
        attr(&link.aria_label),
    )
}

/// Shown on the home page while the database holds no quotes
pub(crate) fn initializer(ctx: &PageContext<'_>) -> String {
    let strings = &ctx.dictionary.database;
    format!(
        r#"<section class="initializer">
  <h2>{title}</h2>
  <p>{description}</p>
  <form method="post" action="/api/seed?redirect={redirect}">
    <button type="submit">{button}</button>
  </form>
</section>"#,
        title = text(&strings.title),
        description = text(&strings.description),
        redirect = attr(&segment(&ctx.href(""))),
        button = text(&strings.initialize),
    )
}
