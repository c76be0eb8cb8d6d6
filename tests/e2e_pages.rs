//! E2E tests for the locale-prefixed HTML pages

mod common;

use common::TestServer;
use sayings::locale::Locale;

#[tokio::test]
async fn test_empty_home_shows_initializer() {
    let server = TestServer::new().await;
    let dictionary = server.state.dictionaries.get(Locale::En);

    let (status, body) = server.get_html("/en").await;

    assert_eq!(status, 200);
    assert!(body.contains(&dictionary.database.initialize));
    assert!(body.contains(r#"action="/api/seed?redirect=%2Fen""#));
}

#[tokio::test]
async fn test_initializer_form_seeds_and_returns_home() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/api/seed?redirect=%2Fes"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 303);
    assert_eq!(TestServer::location(&response).as_deref(), Some("/es"));

    let dictionary = server.state.dictionaries.get(Locale::Es);
    let (status, body) = server.get_html("/es").await;
    assert_eq!(status, 200);
    assert!(!body.contains(&dictionary.database.initialize));
    assert!(body.contains(r#"class="quote""#));
}

#[tokio::test]
async fn test_seed_ignores_offsite_redirect() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/api/seed?redirect=%2F%5Cevil.example"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert!(TestServer::location(&response).is_none());
}

#[tokio::test]
async fn test_seeded_home_lists_six_quotes_with_pagination() {
    let server = TestServer::seeded().await;

    let (status, body) = server.get_html("/en").await;

    assert_eq!(status, 200);
    assert_eq!(body.matches(r#"<article class="quote">"#).count(), 6);
    assert!(body.contains(r#"href="/en?page=2""#));
    assert!(body.contains(r#"class="popular-tags""#));
}

#[tokio::test]
async fn test_non_numeric_page_is_first_page() {
    let server = TestServer::seeded().await;

    let (_, first) = server.get_html("/en?page=1").await;
    let (status, odd) = server.get_html("/en?page=abc").await;

    assert_eq!(status, 200);
    assert_eq!(
        first.matches(r#"<article class="quote">"#).count(),
        odd.matches(r#"<article class="quote">"#).count()
    );
    assert!(odd.contains(r#"<span aria-current="page">1</span>"#));
}

#[tokio::test]
async fn test_authors_page_lists_authors_with_counts() {
    let server = TestServer::seeded().await;

    let (status, body) = server.get_html("/fr/authors").await;

    assert_eq!(status, 200);
    assert!(body.contains(r#"<article class="author">"#));
    assert!(body.contains(r#"href="/fr/authors/maya_angelou""#));
}

#[tokio::test]
async fn test_author_page_shows_profile_and_quotes() {
    let server = TestServer::seeded().await;

    let (status, body) = server.get_html("/en/authors/walt_disney").await;

    assert_eq!(status, 200);
    assert!(body.contains("Walt Disney"));
    assert!(body.contains(r#"<article class="quote">"#));
}

#[tokio::test]
async fn test_unknown_author_is_404() {
    let server = TestServer::seeded().await;

    let (status, body) = server.get_html("/en/authors/nobody").await;

    assert_eq!(status, 404);
    let dictionary = server.state.dictionaries.get(Locale::En);
    assert!(body.contains(&dictionary.not_found.title));
}

#[tokio::test]
async fn test_tags_page_sorts_and_links() {
    let server = TestServer::seeded().await;

    let (status, body) = server.get_html("/en/tags?sort=name").await;
    assert_eq!(status, 200);
    assert!(body.contains(r#"href="/en/tags?sort=name" aria-current="true""#));

    let tags = server
        .state
        .db
        .get_popular_tags(Locale::En, 1)
        .await
        .unwrap();
    let tag = &tags[0].name;

    let (status, body) = server.get_html(&format!("/en/tags/{tag}")).await;
    assert_eq!(status, 200);
    assert!(body.contains(&format!("#{tag}")));
    assert!(body.contains(r#"<article class="quote">"#));
}

#[tokio::test]
async fn test_quote_page_is_locale_specific() {
    let server = TestServer::seeded().await;

    let quotes = server
        .state
        .db
        .get_quotes(Locale::Ar, sayings::pagination::PageRequest::new(1, 1))
        .await
        .unwrap();
    let id = &quotes[0].id;

    let (status, body) = server.get_html(&format!("/ar/quotes/{id}")).await;
    assert_eq!(status, 200);
    assert!(body.contains(r#"dir="rtl""#));

    let (status, _) = server.get_html(&format!("/en/quotes/{id}")).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_language_switcher_links_same_page() {
    let server = TestServer::seeded().await;

    let (_, body) = server.get_html("/es/tags").await;

    for locale in Locale::ALL {
        assert!(body.contains(&format!(r#"href="/{locale}/tags""#)), "{locale}");
    }
}

#[tokio::test]
async fn test_partial_locale_renders() {
    let server = TestServer::seeded().await;

    let (status, body) = server.get_html("/pt").await;

    assert_eq!(status, 200);
    assert!(body.contains(r#"<html lang="pt" dir="ltr">"#));
}
