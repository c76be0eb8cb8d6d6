//! E2E tests for the JSON API

mod common;

use common::TestServer;
use serde_json::{Value, json};

#[tokio::test]
async fn test_seed_endpoint() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/api/seed"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "seeded");
    assert_eq!(body["authors"], 5);

    let response = server
        .client
        .post(server.url("/api/seed"))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "already_seeded");
}

#[tokio::test]
async fn test_list_quotes_paginates() {
    let server = TestServer::seeded().await;

    let response = server
        .client
        .get(server.url("/api/quotes?lang=es&page=2"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["page"], 2);
    assert_eq!(body["per_page"], 9);
    assert_eq!(body["total"], 15);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 6);
    assert!(
        body["items"]
            .as_array()
            .unwrap()
            .iter()
            .all(|q| q["language"] == "es")
    );
}

#[tokio::test]
async fn test_list_quotes_by_author() {
    let server = TestServer::seeded().await;

    let body: Value = server
        .client
        .get(server.url("/api/quotes?lang=fr&author=steve_jobs"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let items = body["items"].as_array().unwrap();
    assert_eq!(body["total"], items.len());
    assert!(items.iter().all(|q| q["author"]["username"] == "steve_jobs"));
}

#[tokio::test]
async fn test_unsupported_lang_is_400() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/api/quotes?lang=de"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("de"));
}

#[tokio::test]
async fn test_author_crud() {
    let server = TestServer::new().await;

    // Create
    let response = server
        .client
        .post(server.url("/api/authors"))
        .json(&json!({"name": "Rosalind Franklin", "avatar": "/rosalind.png"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let author: Value = response.json().await.unwrap();
    assert_eq!(author["username"], "rosalind_franklin");

    // Read
    let response = server
        .client
        .get(server.url("/api/authors/rosalind_franklin"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let author: Value = response.json().await.unwrap();
    assert_eq!(author["name"], "Rosalind Franklin");
    assert_eq!(author["quote_count"], 0);

    // Update
    let response = server
        .client
        .put(server.url("/api/authors/rosalind_franklin"))
        .json(&json!({"name": "Rosalind E. Franklin", "avatar": "/rf.png"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let author: Value = response.json().await.unwrap();
    assert_eq!(author["name"], "Rosalind E. Franklin");

    // Delete
    let response = server
        .client
        .delete(server.url("/api/authors/rosalind_franklin"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let response = server
        .client
        .get(server.url("/api/authors/rosalind_franklin"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_author_missing_fields_is_400() {
    let server = TestServer::new().await;

    for payload in [json!({"name": "No Avatar"}), json!({"name": "", "avatar": "/a.png"})] {
        let response = server
            .client
            .post(server.url("/api/authors"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400, "{payload}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Missing required fields");
    }
}

#[tokio::test]
async fn test_quote_crud() {
    let server = TestServer::seeded().await;

    // Create with the original field names
    let response = server
        .client
        .post(server.url("/api/quotes"))
        .json(&json!({
            "text": "La vida es sueño.",
            "authorId": "walt_disney",
            "lang": "es",
            "tags": ["vida", "sueños"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let quote: Value = response.json().await.unwrap();
    let id = quote["id"].as_str().unwrap().to_string();
    assert_eq!(quote["language"], "es");
    assert_eq!(quote["tags"], json!(["vida", "sueños"]));

    // Newest first on the listing
    let listing: Value = server
        .client
        .get(server.url("/api/quotes?lang=es"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listing["items"][0]["id"], id.as_str());

    // Read is locale specific
    let response = server
        .client
        .get(server.url(&format!("/api/quotes/{id}?lang=es")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let response = server
        .client
        .get(server.url(&format!("/api/quotes/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    // Update
    let response = server
        .client
        .put(server.url(&format!("/api/quotes/{id}")))
        .json(&json!({"text": "La vida es un sueño.", "lang": "es"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let quote: Value = response.json().await.unwrap();
    assert_eq!(quote["text"], "La vida es un sueño.");
    assert_eq!(quote["tags"], json!(["vida", "sueños"]));

    // Delete
    let response = server
        .client
        .delete(server.url(&format!("/api/quotes/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = server
        .client
        .delete(server.url(&format!("/api/quotes/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_quote_for_unknown_author_is_400() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/api/quotes"))
        .json(&json!({"text": "Orphaned", "authorId": "nobody"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("nobody"));
}

#[tokio::test]
async fn test_quote_missing_text_is_400() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/api/quotes"))
        .json(&json!({"authorId": "walt_disney"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing required fields");
}

#[tokio::test]
async fn test_list_authors_only_with_quotes_in_locale() {
    let server = TestServer::seeded().await;

    server
        .client
        .post(server.url("/api/authors"))
        .json(&json!({"name": "Quiet Person", "avatar": "/q.png"}))
        .send()
        .await
        .unwrap();

    let body: Value = server
        .client
        .get(server.url("/api/authors?lang=ar"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["total"], 5);
    let items = body["items"].as_array().unwrap();
    assert!(items.iter().all(|a| a["username"] != "quiet_person"));
    assert!(items.iter().all(|a| a["quote_count"].as_i64().unwrap() > 0));
}

#[tokio::test]
async fn test_quote_update_without_lang_keeps_locale() {
    let server = TestServer::seeded().await;

    let quote: Value = server
        .client
        .post(server.url("/api/quotes"))
        .json(&json!({"text": "Caminante, no hay camino.", "authorId": "walt_disney", "lang": "es"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = quote["id"].as_str().unwrap().to_string();

    let response = server
        .client
        .put(server.url(&format!("/api/quotes/{id}")))
        .json(&json!({"text": "Caminante, no hay camino, se hace camino al andar."}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let quote: Value = response.json().await.unwrap();
    assert_eq!(quote["language"], "es");

    let listing: Value = server
        .client
        .get(server.url("/api/quotes?lang=es"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listing["total"], 16);
    assert_eq!(listing["items"][0]["id"], id.as_str());
}
