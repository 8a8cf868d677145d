//! User account flow tests.
//!
//! Registration only sends an activation email, so these tests cannot
//! complete activation on their own. Tests that need a logged-in session
//! expect an already-activated account via `TEST_USER_EMAIL` and
//! `TEST_USER_PASSWORD`.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_owned())
}

fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("failed to build HTTP client")
}

/// Log in with the test account and return a client holding its session.
async fn logged_in_client() -> Client {
    let email = std::env::var("TEST_USER_EMAIL").expect("TEST_USER_EMAIL not set");
    let password = std::env::var("TEST_USER_PASSWORD").expect("TEST_USER_PASSWORD not set");

    let client = session_client();
    let response = client
        .post(format!("{}/api/v1/user/login-user", api_base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(response.status(), 200, "test account login failed");

    client
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn registration_is_repeatable_until_activation() {
    let email = format!("test-{}@example.com", Uuid::new_v4());
    let payload = json!({
        "name": "Test User",
        "email": email,
        "password": "s3cure-password",
        "phone": "5551234567",
    });

    let client = session_client();
    let first = client
        .post(format!("{}/api/v1/user/create-user", api_base_url()))
        .json(&payload)
        .send()
        .await
        .expect("request failed");
    assert_eq!(first.status(), 201);

    // Nothing is persisted before activation, so the same email can
    // register again.
    let second = client
        .post(format!("{}/api/v1/user/create-user", api_base_url()))
        .json(&payload)
        .send()
        .await
        .expect("request failed");
    assert_eq!(second.status(), 201);
}

#[tokio::test]
#[ignore = "Requires a running API server, database, and TEST_USER_* credentials"]
async fn registering_an_activated_email_is_rejected() {
    let email = std::env::var("TEST_USER_EMAIL").expect("TEST_USER_EMAIL not set");

    let response = session_client()
        .post(format!("{}/api/v1/user/create-user", api_base_url()))
        .json(&json!({
            "name": "Impostor",
            "email": email,
            "password": "s3cure-password",
            "phone": "5551234567",
        }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("invalid JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn login_with_wrong_password_returns_a_generic_error() {
    let response = session_client()
        .post(format!("{}/api/v1/user/login-user", api_base_url()))
        .json(&json!({
            "email": "nobody@example.com",
            "password": "wrong-password",
        }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), 401);

    // The message must not reveal whether the account exists.
    let body: Value = response.json().await.expect("invalid JSON");
    assert_eq!(body["message"], "Please provide the correct information");
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn login_with_missing_fields_is_a_bad_request() {
    let response = session_client()
        .post(format!("{}/api/v1/user/login-user", api_base_url()))
        .json(&json!({ "email": "nobody@example.com" }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("invalid JSON");
    assert_eq!(body["message"], "Please provide all fields");
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn current_user_requires_a_session() {
    let response = session_client()
        .get(format!("{}/api/v1/user/get-user", api_base_url()))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.expect("invalid JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "please login to continue");
}

#[tokio::test]
#[ignore = "Requires a running API server, database, and TEST_USER_* credentials"]
async fn login_logout_round_trip() {
    let client = logged_in_client().await;

    let me = client
        .get(format!("{}/api/v1/user/get-user", api_base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(me.status(), 200);

    let logout = client
        .get(format!("{}/api/v1/user/logout", api_base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(logout.status(), 200);

    // The session is gone after logout.
    let me_again = client
        .get(format!("{}/api/v1/user/get-user", api_base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(me_again.status(), 401);
}

#[tokio::test]
#[ignore = "Requires a running API server, database, and TEST_USER_* credentials"]
async fn address_kinds_are_unique_per_user() {
    let client = logged_in_client().await;

    let address = json!({
        "kind": "office",
        "country": "US",
        "city": "Portland",
        "zip_code": "97201",
        "address1": "100 Main St",
        "address2": null,
    });

    let first = client
        .put(format!("{}/api/v1/user/update-user-addresses", api_base_url()))
        .json(&address)
        .send()
        .await
        .expect("request failed");
    assert_eq!(first.status(), 200);

    let body: Value = first.json().await.expect("invalid JSON");
    let addresses = body["addresses"].as_array().expect("missing addresses");
    let office = addresses
        .iter()
        .find(|a| a["kind"] == "office")
        .expect("office address not saved");

    // A second insert of the same kind is rejected, but updating the
    // existing address by id is fine.
    let duplicate = client
        .put(format!("{}/api/v1/user/update-user-addresses", api_base_url()))
        .json(&address)
        .send()
        .await
        .expect("request failed");
    assert_eq!(duplicate.status(), 400);

    let update = client
        .put(format!("{}/api/v1/user/update-user-addresses", api_base_url()))
        .json(&json!({
            "id": office["id"],
            "kind": "office",
            "country": "US",
            "city": "Salem",
            "zip_code": "97301",
            "address1": "200 State St",
            "address2": "Suite 4",
        }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(update.status(), 200);

    // Clean up so the test can run again.
    let delete = client
        .delete(format!(
            "{}/api/v1/user/delete-user-address/{}",
            api_base_url(),
            office["id"]
        ))
        .send()
        .await
        .expect("request failed");
    assert_eq!(delete.status(), 200);
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn admin_listing_is_gated() {
    // No session at all.
    let anonymous = session_client()
        .get(format!("{}/api/v1/user/admin-all-users", api_base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(anonymous.status(), 401);
}

#[tokio::test]
#[ignore = "Requires a running API server, database, and non-admin TEST_USER_* credentials"]
async fn admin_listing_rejects_regular_users() {
    let client = logged_in_client().await;

    let response = client
        .get(format!("{}/api/v1/user/admin-all-users", api_base_url()))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), 403);

    let body: Value = response.json().await.expect("invalid JSON");
    assert_eq!(body["message"], "admin access required");
}
