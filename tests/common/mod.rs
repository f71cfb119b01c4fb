#![allow(dead_code)]

use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::Arc;

use fleet_admin::auth::TokenIssuer;
use fleet_admin::configuration::{JwtSettings, SeedAdminSettings};
use fleet_admin::startup::{run, seed_administrator};
use fleet_admin::store::InMemoryStore;

pub const SEED_EMAIL: &str = "administrador@teste.com";
pub const SEED_PASSWORD: &str = "123456";

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryStore>,
    pub client: reqwest::Client,
}

/// Start the server on a random port, backed by a fresh in-memory store
/// holding the seed administrator.
pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(InMemoryStore::new());
    seed_administrator(
        store.as_ref(),
        &SeedAdminSettings {
            email: SEED_EMAIL.to_string(),
            password: SEED_PASSWORD.to_string(),
        },
    )
    .await
    .expect("Failed to seed administrator");

    let token_issuer = TokenIssuer::new(&JwtSettings {
        secret: "integration-test-secret-0123456789abcdef".to_string(),
        access_token_expiry: 3000,
        refresh_token_expiry: 604800,
    })
    .expect("Failed to build token issuer");

    let server = run(
        listener,
        store.clone(),
        token_issuer,
        chrono::Duration::seconds(604800),
    )
    .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        store,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(&self.url("/administrators/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_refresh(&self, refresh_token: &str) -> reqwest::Response {
        self.client
            .post(&self.url("/administrators/refresh"))
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Log in and return the parsed body; panics unless the login succeeds.
    pub async fn login(&self, email: &str, password: &str) -> Value {
        let response = self.post_login(email, password).await;
        assert_eq!(200, response.status().as_u16(), "login failed for {}", email);
        response.json().await.expect("Failed to parse response")
    }

    pub async fn seed_access_token(&self) -> String {
        let body = self.login(SEED_EMAIL, SEED_PASSWORD).await;
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Create an administrator through the API and return an access token for it.
    pub async fn access_token_for_role(&self, email: &str, role: &str) -> String {
        let admin_token = self.seed_access_token().await;
        let response = self
            .client
            .post(&self.url("/administrators"))
            .bearer_auth(&admin_token)
            .json(&json!({ "email": email, "password": "secret123", "role": role }))
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(201, response.status().as_u16());

        let body = self.login(email, "secret123").await;
        body["access_token"].as_str().unwrap().to_string()
    }
}
