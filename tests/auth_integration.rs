mod common;

use common::{spawn_app, SEED_EMAIL, SEED_PASSWORD};
use serde_json::{json, Value};

// --- Login Tests ---

#[tokio::test]
async fn login_returns_tokens_for_seed_administrator() {
    let app = spawn_app().await;

    let response = app.post_login(SEED_EMAIL, SEED_PASSWORD).await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], SEED_EMAIL);
    assert_eq!(body["role"], "Adm");
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3000);

    let access_token = body["access_token"].as_str().unwrap();
    assert_eq!(access_token.split('.').count(), 3);
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());

    assert_eq!(app.store.refresh_token_count().unwrap(), 1);
}

#[tokio::test]
async fn login_returns_401_for_wrong_password_and_stores_nothing() {
    let app = spawn_app().await;

    let response = app.post_login(SEED_EMAIL, "wrongpass").await;
    assert_eq!(401, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
    assert_eq!(app.store.refresh_token_count().unwrap(), 0);
}

#[tokio::test]
async fn login_gives_same_response_for_unknown_email() {
    let app = spawn_app().await;

    let unknown = app.post_login("nobody@teste.com", SEED_PASSWORD).await;
    let wrong_case = app.post_login("Administrador@teste.com", SEED_PASSWORD).await;

    assert_eq!(401, unknown.status().as_u16());
    assert_eq!(401, wrong_case.status().as_u16());

    let body: Value = unknown.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn login_returns_400_for_invalid_input() {
    let app = spawn_app().await;

    let test_cases = vec![
        (json!({ "email": "notanemail", "password": "123456" }), "invalid email"),
        (json!({ "email": SEED_EMAIL, "password": "" }), "empty password"),
        (json!({ "email": SEED_EMAIL }), "missing password"),
    ];

    for (body, description) in test_cases {
        let response = app
            .client
            .post(&app.url("/administrators/login"))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request for {}.",
            description
        );
    }
}

// --- Refresh Tests ---

#[tokio::test]
async fn refresh_token_can_be_redeemed_once() {
    let app = spawn_app().await;
    let login = app.login(SEED_EMAIL, SEED_PASSWORD).await;
    let refresh_token = login["refresh_token"].as_str().unwrap();

    let first = app.post_refresh(refresh_token).await;
    assert_eq!(200, first.status().as_u16());

    let body: Value = first.json().await.unwrap();
    let access_token = body["access_token"].as_str().unwrap();
    assert_ne!(access_token, login["access_token"].as_str().unwrap());
    assert!(body.get("refresh_token").is_none());

    // The new access token is accepted by protected routes
    let me = app
        .client
        .get(&app.url("/administrators/me"))
        .bearer_auth(access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(200, me.status().as_u16());

    let second = app.post_refresh(refresh_token).await;
    assert_eq!(401, second.status().as_u16());
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn refresh_rejects_unknown_and_empty_tokens() {
    let app = spawn_app().await;

    let unknown = app.post_refresh("bm90LWEtcmVhbC10b2tlbg==").await;
    assert_eq!(401, unknown.status().as_u16());

    let empty = app.post_refresh("   ").await;
    assert_eq!(400, empty.status().as_u16());
}

#[tokio::test]
async fn refresh_rejects_token_of_deactivated_administrator() {
    let app = spawn_app().await;
    let editor_email = "editor@teste.com";
    let editor_token = app.access_token_for_role(editor_email, "Editor").await;
    let login = app.login(editor_email, "secret123").await;
    let refresh_token = login["refresh_token"].as_str().unwrap();

    let me: Value = app
        .client
        .get(&app.url("/administrators/me"))
        .bearer_auth(&editor_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let editor_id = me["id"].as_i64().unwrap();

    let admin_token = app.seed_access_token().await;
    let response = app
        .client
        .delete(&app.url(&format!("/administrators/{}", editor_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(204, response.status().as_u16());

    let response = app.post_refresh(refresh_token).await;
    assert_eq!(401, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "SUBJECT_MISSING");

    let relogin = app.post_login(editor_email, "secret123").await;
    assert_eq!(401, relogin.status().as_u16());
}

// --- Logout and profile ---

#[tokio::test]
async fn logout_revokes_refresh_token() {
    let app = spawn_app().await;
    let login = app.login(SEED_EMAIL, SEED_PASSWORD).await;
    let access_token = login["access_token"].as_str().unwrap();
    let refresh_token = login["refresh_token"].as_str().unwrap();

    let response = app
        .client
        .post(&app.url("/administrators/logout"))
        .bearer_auth(access_token)
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(204, response.status().as_u16());

    let refresh = app.post_refresh(refresh_token).await;
    assert_eq!(401, refresh.status().as_u16());
}

#[tokio::test]
async fn logout_requires_authentication() {
    let app = spawn_app().await;
    let login = app.login(SEED_EMAIL, SEED_PASSWORD).await;

    let response = app
        .client
        .post(&app.url("/administrators/logout"))
        .json(&json!({ "refresh_token": login["refresh_token"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(401, response.status().as_u16());

    let refresh = app.post_refresh(login["refresh_token"].as_str().unwrap()).await;
    assert_eq!(200, refresh.status().as_u16());
}

#[tokio::test]
async fn me_returns_current_administrator() {
    let app = spawn_app().await;
    let access_token = app.seed_access_token().await;

    let response = app
        .client
        .get(&app.url("/administrators/me"))
        .bearer_auth(&access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email"], SEED_EMAIL);
    assert_eq!(body["role"], "Adm");
    assert!(body.get("password_hash").is_none());
}
