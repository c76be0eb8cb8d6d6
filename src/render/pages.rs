//! One function per route, each returning a complete HTML document.

use super::components::{author_card, initializer, pagination, quote_card, quote_grid, tag_cloud};
use super::layout::document;
use super::{PageContext, attr, segment, text};
use crate::data::{Author, AuthorSummary, Quote, TagCount, TagSort, is_web_url};
use crate::pagination::PaginationView;
use crate::service::Listing;

fn pagination_for<T>(ctx: &PageContext<'_>, listing: &Listing<T>, base_url: &str) -> String {
    let view = PaginationView::new(
        &listing.page,
        base_url,
        ctx.locale.direction(),
        &ctx.dictionary.pagination,
    );
    pagination(ctx, &view)
}

/// `/{locale}`: latest quotes and popular tags, or the initializer prompt
/// while there is nothing to show.
pub fn home_page(ctx: &PageContext<'_>, listing: &Listing<Quote>, popular_tags: &[TagCount]) -> String {
    let home = &ctx.dictionary.home;

    let body = if listing.page.total_items == 0 {
        initializer(ctx)
    } else {
        let tags = if popular_tags.is_empty() {
            String::new()
        } else {
            format!(
                r#"<section class="popular-tags"><h2>{}</h2>{}</section>"#,
                text(&home.popular_tags),
                tag_cloud(ctx, popular_tags),
            )
        };
        format!(
            "{}\n{}\n{}",
            quote_grid(ctx, &listing.items, &ctx.dictionary.quotes.not_found),
            pagination_for(ctx, listing, &ctx.href("")),
            tags,
        )
    };

    let main = format!(
        r#"<h1>{}</h1>
<p class="lead">{}</p>
{body}"#,
        text(&home.title),
        text(&home.description),
    );

    document(ctx, "", &ctx.dictionary.metadata.description, &main)
}

/// `/{locale}/authors`
pub fn authors_page(ctx: &PageContext<'_>, listing: &Listing<AuthorSummary>) -> String {
    let strings = &ctx.dictionary.authors;

    let cards = if listing.is_empty() {
        format!(r#"<p class="empty">{}</p>"#, text(&strings.no_quotes))
    } else {
        let cards: Vec<String> = listing.items.iter().map(|a| author_card(ctx, a)).collect();
        format!(r#"<section class="authors">{}</section>"#, cards.join("\n"))
    };

    let main = format!(
        r#"<h1>{}</h1>
<p class="lead">{}</p>
{cards}
{}"#,
        text(&strings.all_authors),
        text(&strings.description),
        pagination_for(ctx, listing, &ctx.href("/authors")),
    );

    document(ctx, &strings.all_authors, &strings.description, &main)
}

/// `/{locale}/authors/{username}`
pub fn author_page(ctx: &PageContext<'_>, author: &Author, listing: &Listing<Quote>) -> String {
    let strings = &ctx.dictionary.authors;

    let bio = author
        .bio
        .as_deref()
        .map(|bio| format!(r#"<p class="bio">{}</p>"#, text(bio)))
        .unwrap_or_default();
    let website = author
        .website
        .as_deref()
        .filter(|url| is_web_url(url))
        .map(|url| {
            format!(
                r#"<a href="{}" rel="noopener noreferrer">{}</a>"#,
                attr(url),
                text(&strings.website)
            )
        })
        .unwrap_or_default();
    let socials = [
        ("https://twitter.com/", author.twitter.as_deref(), "Twitter"),
        ("https://instagram.com/", author.instagram.as_deref(), "Instagram"),
        ("https://facebook.com/", author.facebook.as_deref(), "Facebook"),
    ]
    .into_iter()
    .filter_map(|(base, handle, label)| {
        handle.map(|handle| {
            format!(
                r#"<a href="{}" rel="noopener noreferrer">{label}</a>"#,
                attr(&format!("{base}{}", segment(handle)))
            )
        })
    })
    .collect::<Vec<_>>()
    .join(" ");

    let base_url = ctx.href(&format!("/authors/{}", segment(&author.username)));
    let main = format!(
        r#"<section class="author-profile">
  <img src="{avatar}" alt="" width="120" height="120" />
  <h1>{name}</h1>
  <p>{count}</p>
  {bio}
  <p class="links">{website} {socials}</p>
</section>
<h2>{quotes_by} {name}</h2>
{quotes}
{pagination}
<p><a href="{back}">{all_authors}</a></p>"#,
        avatar = attr(&author.avatar),
        name = text(&author.name),
        count = text(&strings.quote_count(listing.page.total_items)),
        quotes_by = text(&strings.quotes_by),
        quotes = quote_grid(ctx, &listing.items, &strings.no_quotes),
        pagination = pagination_for(ctx, listing, &base_url),
        back = attr(&ctx.href("/authors")),
        all_authors = text(&ctx.dictionary.navigation.all_authors),
    );

    let description = format!("{} {}", strings.explore_quotes_by, author.name);
    document(ctx, &author.name, &description, &main)
}

/// `/{locale}/tags`; the sort order is carried into every page link.
pub fn tags_page(ctx: &PageContext<'_>, listing: &Listing<TagCount>, sort: TagSort) -> String {
    let strings = &ctx.dictionary.tags;

    let sort_link = |target: TagSort, label: &str| {
        let href = ctx.href(&format!("/tags?sort={}", target.as_str()));
        let current = if target == sort { r#" aria-current="true""# } else { "" };
        format!(r#"<a href="{}"{current}>{}</a>"#, attr(&href), text(label))
    };

    let body = if listing.is_empty() {
        format!(r#"<p class="empty">{}</p>"#, text(&strings.no_tags))
    } else {
        tag_cloud(ctx, &listing.items)
    };

    let base_url = ctx.href(&format!("/tags?sort={}", sort.as_str()));
    let main = format!(
        r#"<h1>{}</h1>
<p class="lead">{}</p>
<nav class="sort">{} {}</nav>
{body}
{}"#,
        text(&strings.all_tags),
        text(&strings.description),
        sort_link(TagSort::Count, &strings.sort_by_count),
        sort_link(TagSort::Name, &strings.sort_by_name),
        pagination_for(ctx, listing, &base_url),
    );

    document(ctx, &strings.all_tags, &strings.description, &main)
}

/// `/{locale}/tags/{tag}`
pub fn tag_page(ctx: &PageContext<'_>, tag: &str, listing: &Listing<Quote>) -> String {
    let strings = &ctx.dictionary.tags;
    let base_url = ctx.href(&format!("/tags/{}", segment(tag)));

    let main = format!(
        r#"<h1>{} #{}</h1>
{}
{}
<p><a href="{}">{}</a></p>"#,
        text(&strings.quotes_with_tag),
        text(tag),
        quote_grid(ctx, &listing.items, &strings.no_quotes),
        pagination_for(ctx, listing, &base_url),
        attr(&ctx.href("/tags")),
        text(&strings.all_tags),
    );

    let title = format!("#{tag}");
    let description = format!("{} #{tag}", strings.explore_quotes_with_tag);
    document(ctx, &title, &description, &main)
}

/// `/{locale}/quotes/{id}`
pub fn quote_page(ctx: &PageContext<'_>, quote: &Quote) -> String {
    let main = format!(
        r#"{}
<p><a href="{}">{}</a></p>"#,
        quote_card(ctx, quote),
        attr(&ctx.href("")),
        text(&ctx.dictionary.navigation.back_to_home),
    );

    let title = format!("{} {}", ctx.dictionary.quotes.quote_by, quote.author.name);
    document(ctx, &title, &quote.text, &main)
}

/// Localized 404 page
pub fn not_found_page(ctx: &PageContext<'_>) -> String {
    let strings = &ctx.dictionary.not_found;
    let main = format!(
        r#"<h1>{}</h1>
<p>{}</p>
<p><a href="{}">{}</a></p>"#,
        text(&strings.title),
        text(&strings.message),
        attr(&ctx.href("")),
        text(&ctx.dictionary.navigation.back_to_home),
    );

    document(ctx, &strings.title, &strings.message, &main)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QuoteAuthor;
    use crate::i18n::Dictionaries;
    use crate::locale::Locale;
    use crate::pagination::{Page, PageRequest};
    use chrono::Utc;
    use std::sync::Arc;

    fn quote(text: &str, tags: &[&str]) -> Quote {
        Quote {
            id: "q-1".to_string(),
            text: text.to_string(),
            language: "en".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            author: QuoteAuthor {
                username: "maya_angelou".to_string(),
                name: "Maya Angelou".to_string(),
                avatar: "/placeholder.svg?height=80&width=80".to_string(),
            },
            created_at: Utc::now(),
        }
    }

    fn listing<T>(items: Vec<T>, page: u32, per_page: u32, total: i64) -> Listing<T> {
        Listing {
            items: Arc::new(items),
            page: Page::new(PageRequest::new(page, per_page), total),
        }
    }

    #[test]
    fn home_without_quotes_shows_initializer() {
        let dictionaries = Dictionaries::load().unwrap();
        let dictionary = dictionaries.get(Locale::En);
        let ctx = PageContext {
            locale: Locale::En,
            dictionary: &dictionary,
            site_name: "Sayings",
            path: "",
        };

        let html = home_page(&ctx, &listing(Vec::new(), 1, 6, 0), &[]);
        assert!(html.contains(&dictionary.database.initialize));
        assert!(html.contains(r#"action="/api/seed?redirect=%2Fen""#));
        assert!(!html.contains(r#"class="pagination""#));
    }

    #[test]
    fn arabic_pages_are_rtl_with_swapped_labels() {
        let dictionaries = Dictionaries::load().unwrap();
        let dictionary = dictionaries.get(Locale::Ar);
        let ctx = PageContext {
            locale: Locale::Ar,
            dictionary: &dictionary,
            site_name: "Sayings",
            path: "",
        };

        let quotes = vec![quote("q", &[])];
        let html = home_page(&ctx, &listing(quotes, 2, 6, 13), &[]);

        assert!(html.contains(r#"<html lang="ar" dir="rtl">"#));
        // previous link targets page 1 but reads "next"
        let previous = format!(
            r#"<a rel="prev" href="/ar?page=1" aria-label="{}"><span aria-hidden="true">&rarr;</span> {}</a>"#,
            dictionary.pagination.previous, dictionary.pagination.next
        );
        assert!(html.contains(&previous), "{html}");
    }

    #[test]
    fn user_text_is_escaped() {
        let dictionaries = Dictionaries::load().unwrap();
        let dictionary = dictionaries.get(Locale::En);
        let ctx = PageContext {
            locale: Locale::En,
            dictionary: &dictionary,
            site_name: "Sayings",
            path: "/quotes/q-1",
        };

        let html = quote_page(&ctx, &quote("<script>alert(1)</script>", &["a&b"]));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(r#"href="/en/tags/a%26b""#));
    }

    #[test]
    fn language_switcher_keeps_path() {
        let dictionaries = Dictionaries::load().unwrap();
        let dictionary = dictionaries.get(Locale::Fr);
        let ctx = PageContext {
            locale: Locale::Fr,
            dictionary: &dictionary,
            site_name: "Sayings",
            path: "/authors",
        };

        let html = authors_page(&ctx, &listing(Vec::new(), 1, 12, 0));
        for locale in Locale::ALL {
            assert!(html.contains(&format!(r#"href="/{locale}/authors""#)), "{locale}");
        }
        assert!(html.contains(&dictionary.authors.no_quotes));
    }

    #[test]
    fn tag_pagination_preserves_sort() {
        let dictionaries = Dictionaries::load().unwrap();
        let dictionary = dictionaries.get(Locale::En);
        let ctx = PageContext {
            locale: Locale::En,
            dictionary: &dictionary,
            site_name: "Sayings",
            path: "/tags",
        };

        let tags = vec![TagCount {
            name: "life".to_string(),
            count: 4,
        }];
        let html = tags_page(&ctx, &listing(tags, 1, 30, 45), TagSort::Name);
        assert!(html.contains(r#"href="/en/tags?sort=name&amp;page=2""#), "{html}");
    }

    #[test]
    fn not_found_page_is_localized() {
        let dictionaries = Dictionaries::load().unwrap();
        let dictionary = dictionaries.get(Locale::Es);
        let ctx = PageContext {
            locale: Locale::Es,
            dictionary: &dictionary,
            site_name: "Sayings",
            path: "/nope",
        };

        let html = not_found_page(&ctx);
        assert!(html.contains(&*text(&dictionary.not_found.title)));
        assert!(html.contains(r#"<html lang="es" dir="ltr">"#));
    }

    #[test]
    fn author_website_is_linked_only_for_http_urls() {
        let dictionaries = Dictionaries::load().unwrap();
        let dictionary = dictionaries.get(Locale::En);
        let ctx = PageContext {
            locale: Locale::En,
            dictionary: &dictionary,
            site_name: "Sayings",
            path: "/authors/maya_angelou",
        };
        let author = |website: &str| Author {
            username: "maya_angelou".to_string(),
            name: "Maya Angelou".to_string(),
            avatar: "/placeholder.svg".to_string(),
            bio: None,
            website: Some(website.to_string()),
            twitter: None,
            instagram: None,
            facebook: None,
            created_at: Utc::now(),
        };

        let html = author_page(
            &ctx,
            &author("javascript:alert(document.cookie)"),
            &listing(Vec::new(), 1, 9, 0),
        );
        assert!(!html.contains("javascript:"));

        let html = author_page(
            &ctx,
            &author("https://www.mayaangelou.com"),
            &listing(Vec::new(), 1, 9, 0),
        );
        assert!(html.contains(r#"href="https://www.mayaangelou.com""#));
    }

    #[test]
    fn pagination_uses_standard_link_types() {
        let dictionaries = Dictionaries::load().unwrap();
        let dictionary = dictionaries.get(Locale::En);
        let ctx = PageContext {
            locale: Locale::En,
            dictionary: &dictionary,
            site_name: "Sayings",
            path: "",
        };

        let html = home_page(&ctx, &listing(vec![quote("q", &[])], 2, 6, 13), &[]);
        assert!(html.contains(r#"rel="prev" href="/en?page=1""#));
        assert!(html.contains(r#"rel="next" href="/en?page=3""#));
        assert!(!html.contains(r#"rel="previous""#));
    }
}
