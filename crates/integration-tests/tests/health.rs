//! Health endpoint tests.

use serde_json::Value;

fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_owned())
}

#[tokio::test]
#[ignore = "Requires a running API server"]
async fn health_returns_ok() {
    let response = reqwest::get(format!("{}/health", api_base_url()))
        .await
        .expect("request failed");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("invalid JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn readiness_checks_the_database() {
    let response = reqwest::get(format!("{}/health/ready", api_base_url()))
        .await
        .expect("request failed");

    // 200 when the database is reachable, 503 otherwise.
    assert!(
        response.status() == 200 || response.status() == 503,
        "unexpected status: {}",
        response.status()
    );
}
