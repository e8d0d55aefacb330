// crates/ladder-server/src/api/tests.rs
// ============================================================================
// Module: HTTP API Unit Tests
// Description: Unit tests for handlers, validation, and status mapping.
// Purpose: Validate the API boundary against in-memory fixtures.
// Dependencies: ladder-core, axum, serde_json
// ============================================================================

//! ## Overview
//! Exercises the handlers directly with in-memory stores: registration and
//! login flows, bearer authentication, score validation, leaderboard
//! ordering with ranks, and telemetry recording.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::float_cmp,
    reason = "Test-only output, panic-based assertions, and exact score checks."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header;
use axum::response::Response;
use ladder_core::InMemoryIdentityStore;
use ladder_core::InMemoryScoreStore;
use ladder_core::SharedIdentityStore;
use ladder_core::SharedScoreStore;
use ladder_core::TokenManager;
use ladder_core::UserId;

use crate::auth::JwtTokenManager;
use crate::server::ServerState;
use crate::telemetry::ApiMethod;
use crate::telemetry::ApiMetrics;
use crate::telemetry::NoopApiMetrics;

use super::LoginRequest;
use super::RegisterRequest;
use super::SubmitScoreRequest;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Shared token secret for test state.
const SECRET: &str = "0123456789abcdef0123456789abcdef";

/// Builds server state over fresh in-memory stores.
fn test_state() -> ServerState {
    test_state_with_metrics(Arc::new(NoopApiMetrics))
}

/// Builds server state over fresh in-memory stores with a metrics sink.
fn test_state_with_metrics(metrics: Arc<dyn ApiMetrics>) -> ServerState {
    let identity = SharedIdentityStore::from_store(InMemoryIdentityStore::new());
    let scores = SharedScoreStore::from_store(InMemoryScoreStore::new());
    let tokens = JwtTokenManager::new(SECRET, 3_600);
    ServerState::new(identity, scores, tokens, metrics)
}

/// Metrics sink that records every event for assertions.
#[derive(Debug, Default)]
struct RecordingMetrics {
    /// Recorded (label, status) pairs.
    events: Mutex<Vec<(&'static str, u16)>>,
}

impl ApiMetrics for RecordingMetrics {
    fn record_request(&self, method: ApiMethod, status: u16, _latency: Duration) {
        self.events
            .lock()
            .expect("metrics lock")
            .push((method.as_label(), status));
    }
}

/// Calls the register handler.
async fn register(state: &ServerState, username: &str, password: &str) -> Response {
    super::register(
        State(state.clone()),
        Json(RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        }),
    )
    .await
}

/// Calls the login handler.
async fn login(state: &ServerState, username: &str, password: &str) -> Response {
    super::login(
        State(state.clone()),
        Json(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }),
    )
    .await
}

/// Calls the submit handler with the given headers.
async fn submit(state: &ServerState, headers: HeaderMap, score: f64) -> Response {
    super::submit_score(
        State(state.clone()),
        headers,
        Json(SubmitScoreRequest { score }),
    )
    .await
}

/// Registers and logs in a user, returning their bearer token.
async fn register_and_login(state: &ServerState, username: &str) -> String {
    let created = register(state, username, "hunter2").await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let response = login(state, username, "hunter2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["token"].as_str().expect("token").to_string()
}

/// Builds an Authorization header map carrying the given bearer token.
fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("header value"),
    );
    headers
}

/// Reads a response body as JSON.
async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

// ============================================================================
// SECTION: Registration and Login
// ============================================================================

#[tokio::test]
async fn register_creates_user() {
    let state = test_state();
    let response = register(&state, "alice", "hunter2").await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["username"], "alice");
    assert!(body["user_id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn register_rejects_empty_username() {
    let state = test_state();
    let response = register(&state, "", "hunter2").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_rejects_empty_password() {
    let state = test_state();
    let response = register(&state, "alice", "").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_rejects_duplicate_name() {
    let state = test_state();
    let first = register(&state, "alice", "hunter2").await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = register(&state, "alice", "other-password").await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_issues_verifiable_token() {
    let state = test_state();
    let created = register(&state, "alice", "hunter2").await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let response = login(&state, "alice", "hunter2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["token"].as_str().expect("token");
    let verified = state.tokens.verify(token).expect("verify");
    assert_eq!(verified.as_str(), body["user_id"].as_str().expect("id"));
}

#[tokio::test]
async fn login_unknown_user_is_not_found() {
    let state = test_state();
    let response = login(&state, "nobody", "hunter2").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_wrong_password_is_unauthorized() {
    let state = test_state();
    let created = register(&state, "alice", "hunter2").await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let response = login(&state, "alice", "wrong").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// SECTION: Score Submission
// ============================================================================

#[tokio::test]
async fn submit_requires_bearer_token() {
    let state = test_state();
    let response = submit(&state, HeaderMap::new(), 100.0).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok()),
        Some("Bearer")
    );
}

#[tokio::test]
async fn submit_rejects_non_bearer_scheme() {
    let state = test_state();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_static("Basic YWxpY2U6aHVudGVyMg=="),
    );
    let response = submit(&state, headers, 100.0).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn submit_rejects_tampered_token() {
    let state = test_state();
    let token = register_and_login(&state, "alice").await;
    let mut tampered = token;
    tampered.push('x');

    let response = submit(&state, bearer(&tampered), 100.0).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn submit_for_unknown_user_is_not_found() {
    let state = test_state();
    // Valid signature, but the subject was never registered.
    let ghost_token = state.tokens.issue(&UserId::new("ghost")).expect("issue");

    let response = submit(&state, bearer(&ghost_token), 100.0).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submit_rejects_non_positive_score() {
    let state = test_state();
    let token = register_and_login(&state, "alice").await;

    let zero = submit(&state, bearer(&token), 0.0).await;
    assert_eq!(zero.status(), StatusCode::BAD_REQUEST);

    let negative = submit(&state, bearer(&token), -5.0).await;
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_rejects_non_finite_score() {
    let state = test_state();
    let token = register_and_login(&state, "alice").await;

    let nan = submit(&state, bearer(&token), f64::NAN).await;
    assert_eq!(nan.status(), StatusCode::BAD_REQUEST);

    let infinite = submit(&state, bearer(&token), f64::INFINITY).await;
    assert_eq!(infinite.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_accepts_valid_score() {
    let state = test_state();
    let token = register_and_login(&state, "alice").await;

    let response = submit(&state, bearer(&token), 100.0).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ============================================================================
// SECTION: Leaderboard
// ============================================================================

#[tokio::test]
async fn leaderboard_requires_bearer_token() {
    let state = test_state();
    let response = super::leaderboard(State(state), HeaderMap::new()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn leaderboard_is_empty_before_any_submission() {
    let state = test_state();
    let token = register_and_login(&state, "alice").await;

    let response = super::leaderboard(State(state), bearer(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["entries"].as_array().expect("entries").len(), 0);
}

#[tokio::test]
async fn leaderboard_ranks_best_scores_descending() {
    let state = test_state();
    let alice = register_and_login(&state, "alice").await;
    let bob = register_and_login(&state, "bob").await;

    // Alice's later, lower score must not displace her best.
    assert_eq!(
        submit(&state, bearer(&alice), 100.0).await.status(),
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        submit(&state, bearer(&bob), 150.0).await.status(),
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        submit(&state, bearer(&alice), 80.0).await.status(),
        StatusCode::NO_CONTENT
    );

    let response = super::leaderboard(State(state), bearer(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let entries = body["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[0]["username"], "bob");
    assert_eq!(entries[0]["score"], 150.0);

    assert_eq!(entries[1]["rank"], 2);
    assert_eq!(entries[1]["username"], "alice");
    assert_eq!(entries[1]["score"], 100.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn full_flow_completes_on_multi_thread_runtime() {
    // Hashing and store access run on the blocking pool; the whole flow must
    // still complete under a multi-threaded runtime.
    let state = test_state();
    let token = register_and_login(&state, "alice").await;

    let submitted = submit(&state, bearer(&token), 42.0).await;
    assert_eq!(submitted.status(), StatusCode::NO_CONTENT);

    let response = super::leaderboard(State(state), bearer(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["entries"][0]["username"], "alice");
}

// ============================================================================
// SECTION: Health and Telemetry
// ============================================================================

#[tokio::test]
async fn healthz_reports_ready() {
    let state = test_state();
    let response = super::healthz(State(state)).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn metrics_record_request_outcomes() {
    let metrics = Arc::new(RecordingMetrics::default());
    let state = test_state_with_metrics(metrics.clone());

    let created = register(&state, "alice", "hunter2").await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let missing = login(&state, "nobody", "hunter2").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let events = metrics.events.lock().expect("metrics lock").clone();
    assert_eq!(events, vec![("register", 201), ("login", 404)]);
}
