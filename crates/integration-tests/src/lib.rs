//! Integration tests for Mandarin Market.
//!
//! The tests in `tests/` drive a running API instance over HTTP and are
//! `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p mandarin-cli -- migrate
//!
//! # Start the API
//! cargo run -p mandarin-api
//!
//! # Run integration tests
//! cargo test -p mandarin-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `API_BASE_URL` - Base URL of the running API (default
//!   `http://localhost:8000`)
//! - `TEST_USER_EMAIL` / `TEST_USER_PASSWORD` - Credentials of an activated
//!   account, for tests that need a logged-in session
