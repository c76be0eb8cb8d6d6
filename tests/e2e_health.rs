//! E2E tests for health check and basic server functionality

mod common;

use common::TestServer;

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_cors_headers() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/health"))
        .header("Origin", "https://sayings.test.example.com")
        .send()
        .await
        .unwrap();

    // CORS should allow the configured public origin.
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_metrics_exposed() {
    let server = TestServer::seeded().await;

    // Generate some traffic first
    server.get_html("/en").await;

    let response = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("sayings_http_requests_total"));
    assert!(body.contains("sayings_db_queries_total"));
}

#[tokio::test]
async fn test_404_for_unknown_routes() {
    let server = TestServer::new().await;

    let (status, body) = server.get_html("/en/unknown/route").await;

    assert_eq!(status, 404);
    assert!(body.contains(r#"<html lang="en""#));
}

#[tokio::test]
async fn test_404_is_localized() {
    let server = TestServer::new().await;

    let (status, body) = server.get_html("/es/no-existe").await;

    assert_eq!(status, 404);
    assert!(body.contains(r#"<html lang="es" dir="ltr">"#));
    let dictionary = server.state.dictionaries.get(sayings::locale::Locale::Es);
    assert!(body.contains(&dictionary.navigation.back_to_home));
}

#[tokio::test]
async fn test_pages_are_compressed_with_cors() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/en"))
        .header("Accept-Encoding", "gzip")
        .header("Origin", "https://sayings.test.example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("content-encoding")
            .and_then(|v| v.to_str().ok()),
        Some("gzip")
    );
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/api/authors"))
        .header("Content-Type", "application/json")
        .body(format!(
            r#"{{"name":"Big","avatar":"/a.png","bio":"{}"}}"#,
            "x".repeat(70 * 1024)
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 413);
}
