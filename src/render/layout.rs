//! Shared page shell: document head, navigation, language switcher, footer.

use chrono::{Datelike, Utc};

use super::{PageContext, attr, text};
use crate::locale::Locale;

/// Wrap `main` in the full document for `ctx.locale`.
pub(crate) fn document(ctx: &PageContext<'_>, title: &str, description: &str, main: &str) -> String {
    let full_title = if title.is_empty() {
        ctx.site_name.to_string()
    } else {
        format!("{title} | {}", ctx.site_name)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}" dir="{dir}">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{title}</title>
  <meta name="description" content="{description}" />
</head>
<body>
{header}
<main>
{main}
</main>
{footer}
</body>
</html>"#,
        lang = ctx.locale,
        dir = ctx.locale.direction().as_str(),
        title = text(&full_title),
        description = attr(description),
        header = header(ctx),
        main = main,
        footer = footer(ctx),
    )
}

fn header(ctx: &PageContext<'_>) -> String {
    let nav = &ctx.dictionary.navigation;
    format!(
        r#"<header>
  <a class="brand" href="{home}">{site}</a>
  <nav>
    <a href="{home}">{home_label}</a>
    <a href="{authors}">{authors_label}</a>
    <a href="{tags}">{tags_label}</a>
  </nav>
  {switcher}
</header>"#,
        home = attr(&ctx.href("")),
        site = text(ctx.site_name),
        home_label = text(&nav.home),
        authors = attr(&ctx.href("/authors")),
        authors_label = text(&nav.authors),
        tags = attr(&ctx.href("/tags")),
        tags_label = text(&nav.tags),
        switcher = language_switcher(ctx),
    )
}

/// Links to the current path under every locale
pub(crate) fn language_switcher(ctx: &PageContext<'_>) -> String {
    let links: Vec<String> = Locale::ALL
        .into_iter()
        .map(|locale| {
            let href = format!("/{locale}{}", ctx.path);
            let current = if locale == ctx.locale {
                r#" aria-current="true""#
            } else {
                ""
            };
            format!(
                r#"<a href="{}" hreflang="{locale}" lang="{locale}"{current}>{}</a>"#,
                attr(&href),
                text(locale.native_name()),
            )
        })
        .collect();

    format!(
        r#"<nav class="language-switcher" aria-label="{}">{}</nav>"#,
        attr(&ctx.dictionary.navigation.language),
        links.join(" "),
    )
}

fn footer(ctx: &PageContext<'_>) -> String {
    format!(
        r#"<footer><p>&copy; {} {}</p></footer>"#,
        Utc::now().year(),
        text(&ctx.dictionary.footer.copyright),
    )
}
