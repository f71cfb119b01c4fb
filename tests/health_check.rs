//! Integration tests for the public endpoints

mod common;

use common::spawn_app;
use serde_json::Value;

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(&app.url("/health"))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "Healthy");
}

#[tokio::test]
async fn home_returns_json() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(&app.url("/"))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["health"], "/health");
}

#[tokio::test]
async fn protected_routes_reject_missing_token() {
    let app = spawn_app().await;

    for path in ["/administrators", "/administrators/me", "/vehicles", "/vehicles/1"] {
        let response = app
            .client
            .get(&app.url(path))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(
            401,
            response.status().as_u16(),
            "{} should require authentication",
            path
        );
    }
}

#[tokio::test]
async fn protected_routes_reject_garbage_token() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(&app.url("/vehicles"))
        .bearer_auth("not.a.jwt")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(401, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn cors_preflight_is_answered_for_any_origin() {
    let app = spawn_app().await;

    let response = app
        .client
        .request(reqwest::Method::OPTIONS, &app.url("/vehicles"))
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "authorization, content-type")
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
    assert!(response.headers().contains_key("access-control-allow-methods"));
}

#[tokio::test]
async fn cors_headers_are_added_to_regular_responses() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(&app.url("/health"))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
}
