//! Shared helpers for the integration tests.
//!
//! The tests in `tests/` drive a running server over HTTP. They require:
//! - A running `PostgreSQL` database with migrations applied
//!   (`cargo run -p shortcakes-cli -- migrate`)
//! - The server running (`cargo run -p shortcakes-server`)
//! - For admin tests, an admin account and its credentials in
//!   `SSC_TEST_ADMIN_EMAIL` / `SSC_TEST_ADMIN_PASSWORD`
//!
//! All tests that need a live server are `#[ignore]`d by default.

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SHORTCAKES_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder().build().expect("Failed to create HTTP client")
}

/// A unique throwaway email for registration tests.
#[must_use]
pub fn unique_email() -> String {
    format!("test-{}@example.test", Uuid::new_v4().simple())
}

/// Register a fresh account and return `(email, bearer token)`.
///
/// # Panics
///
/// Panics if registration or login fails.
pub async fn register_and_login(client: &Client) -> (String, String) {
    let base_url = base_url();
    let email = unique_email();
    let password = "test-password-1234";

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "email": email,
            "password": password,
            "first_name": "Test",
            "last_name": "Customer",
        }))
        .send()
        .await
        .expect("register request");
    assert!(resp.status().is_success(), "registration failed");

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("login request");
    assert!(resp.status().is_success(), "login failed");

    let body: Value = resp.json().await.expect("login response json");
    let token = body["token"].as_str().expect("token in response").to_string();
    (email, token)
}

/// Login as the configured test admin and return a bearer token.
///
/// # Panics
///
/// Panics if the admin credentials are missing or login fails.
pub async fn admin_token(client: &Client) -> String {
    let base_url = base_url();
    let email = std::env::var("SSC_TEST_ADMIN_EMAIL").expect("SSC_TEST_ADMIN_EMAIL not set");
    let password =
        std::env::var("SSC_TEST_ADMIN_PASSWORD").expect("SSC_TEST_ADMIN_PASSWORD not set");

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("admin login request");
    assert!(resp.status().is_success(), "admin login failed");

    let body: Value = resp.json().await.expect("admin login response json");
    body["token"].as_str().expect("token in response").to_string()
}
