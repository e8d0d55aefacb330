// crates/ladder-server/src/api.rs
// ============================================================================
// Module: HTTP API
// Description: Request/response types and handlers for the Ladder API.
// Purpose: Validate untrusted input and map runtime errors to status codes.
// Dependencies: ladder-core, axum, serde
// ============================================================================

//! ## Overview
//! Handlers for registration, login, score submission, leaderboard reads,
//! and the readiness probe. Each handler validates the request shape before
//! calling into the runtime, then maps the runtime's error taxonomy onto
//! transport status codes: invalid input is 400, missing or bad credentials
//! are 401, unknown users are 404, name collisions are 409, and every
//! internal failure collapses to an opaque 500. Password hashing and store
//! access are blocking, so each handler runs its work on the blocking pool
//! rather than an async worker thread.
//!
//! Security posture: request bodies and auth headers are untrusted. Internal
//! error detail is never echoed into a response.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::Response;
use ladder_core::AccountError;
use ladder_core::IdentityStore;
use ladder_core::RankingError;
use ladder_core::ScoreStore;
use ladder_core::TokenManager;
use ladder_core::UserId;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::server::ServerState;
use crate::telemetry::ApiMethod;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted username length in bytes.
const MAX_USERNAME_BYTES: usize = 64;
/// Maximum accepted password length in bytes.
const MAX_PASSWORD_BYTES: usize = 512;

// ============================================================================
// SECTION: Request and Response Types
// ============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    /// Requested display name.
    pub username: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
}

/// Registration response body.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Identifier assigned to the new user.
    pub user_id: UserId,
    /// Registered display name.
    pub username: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    /// Display name to authenticate.
    pub username: String,
    /// Plaintext password to verify.
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Authenticated user identifier.
    pub user_id: UserId,
    /// Authenticated display name.
    pub username: String,
    /// Bearer token for authenticated calls.
    pub token: String,
}

/// Score submission request body. The submitting user comes from the bearer
/// token, never from the body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitScoreRequest {
    /// Candidate score value.
    pub score: f64,
}

/// One leaderboard row.
#[derive(Debug, Serialize)]
pub struct LeaderboardRow {
    /// Position in the leaderboard, starting at 1.
    pub rank: usize,
    /// User identifier.
    pub user_id: UserId,
    /// Resolved display name.
    pub username: String,
    /// Best recorded score.
    pub score: f64,
}

/// Leaderboard response body.
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    /// Rows in descending score order.
    pub entries: Vec<LeaderboardRow>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// API boundary errors mapped to transport status codes.
///
/// # Invariants
/// - `Internal` carries no detail; diagnostics stay server-side.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request shape or values failed validation.
    #[error("invalid request: {0}")]
    Invalid(String),
    /// Missing, malformed, or unverifiable credentials.
    #[error("unauthorized")]
    Unauthorized,
    /// Referenced user does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Requested name is already registered.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Internal failure; detail is withheld from the response.
    #[error("internal error")]
    Internal,
}

impl ApiError {
    /// Returns the transport status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        if matches!(self, Self::Unauthorized) {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Stable human-readable error message.
    error: String,
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::UnknownUser(name) => Self::NotFound(format!("user: {name}")),
            AccountError::NameTaken(name) => Self::Conflict(format!("username taken: {name}")),
            AccountError::InvalidCredentials => Self::Unauthorized,
            AccountError::Identity(_) | AccountError::Hasher(_) | AccountError::Token(_) => {
                Self::Internal
            }
        }
    }
}

impl From<RankingError> for ApiError {
    fn from(err: RankingError) -> Self {
        if err.is_not_found() {
            Self::NotFound(err.to_string())
        } else {
            Self::Internal
        }
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a username/password pair for registration and login.
fn validate_credentials(username: &str, password: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::Invalid("username must not be empty".to_string()));
    }
    if username.len() > MAX_USERNAME_BYTES {
        return Err(ApiError::Invalid(format!(
            "username exceeds {MAX_USERNAME_BYTES} bytes"
        )));
    }
    if password.is_empty() {
        return Err(ApiError::Invalid("password must not be empty".to_string()));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ApiError::Invalid(format!(
            "password exceeds {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    Ok(())
}

/// Validates a candidate score before it reaches the ranking engine.
fn validate_score(score: f64) -> Result<(), ApiError> {
    if !score.is_finite() || score <= 0.0 {
        return Err(ApiError::Invalid(
            "score must be a finite positive number".to_string(),
        ));
    }
    Ok(())
}

/// Extracts and verifies the bearer token, returning the authenticated user.
fn authenticate(state: &ServerState, headers: &HeaderMap) -> Result<UserId, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::Unauthorized)?
        .to_str()
        .map_err(|_| ApiError::Unauthorized)?;
    let token = value.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;
    state
        .tokens
        .verify(token)
        .map_err(|_| ApiError::Unauthorized)
}

/// Records one completed request against the metrics sink.
fn observe(state: &ServerState, method: ApiMethod, start: Instant, status: StatusCode) {
    state
        .metrics
        .record_request(method, status.as_u16(), start.elapsed());
}

/// Runs a blocking account or store operation off the async workers.
///
/// A failed join collapses to [`ApiError::Internal`]; no detail leaks.
async fn run_blocking<T, F>(task: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|_| ApiError::Internal)?
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `POST /v1/users/register`: creates a new user with a unique name.
pub async fn register(
    State(state): State<ServerState>,
    Json(request): Json<RegisterRequest>,
) -> Response {
    let start = Instant::now();
    let worker = state.clone();
    let response = match run_blocking(move || register_inner(&worker, &request)).await {
        Ok(body) => (StatusCode::CREATED, Json(body)).into_response(),
        Err(err) => err.into_response(),
    };
    observe(&state, ApiMethod::Register, start, response.status());
    response
}

/// Validates and executes a registration request.
fn register_inner(
    state: &ServerState,
    request: &RegisterRequest,
) -> Result<RegisterResponse, ApiError> {
    validate_credentials(&request.username, &request.password)?;
    let user = state.accounts.register(&request.username, &request.password)?;
    Ok(RegisterResponse {
        user_id: user.id,
        username: user.name,
    })
}

/// `POST /v1/users/login`: authenticates a user and issues a session token.
pub async fn login(
    State(state): State<ServerState>,
    Json(request): Json<LoginRequest>,
) -> Response {
    let start = Instant::now();
    let worker = state.clone();
    let response = match run_blocking(move || login_inner(&worker, &request)).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => err.into_response(),
    };
    observe(&state, ApiMethod::Login, start, response.status());
    response
}

/// Validates and executes a login request.
fn login_inner(state: &ServerState, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
    validate_credentials(&request.username, &request.password)?;
    let session = state.accounts.login(&request.username, &request.password)?;
    Ok(LoginResponse {
        user_id: session.user_id,
        username: session.username,
        token: session.token,
    })
}

/// `POST /v1/leaderboard/scores`: submits a score for the authenticated user.
pub async fn submit_score(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(request): Json<SubmitScoreRequest>,
) -> Response {
    let start = Instant::now();
    let worker = state.clone();
    let response = match run_blocking(move || submit_score_inner(&worker, &headers, &request)).await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    };
    observe(&state, ApiMethod::SubmitScore, start, response.status());
    response
}

/// Authenticates, validates, and executes a score submission.
fn submit_score_inner(
    state: &ServerState,
    headers: &HeaderMap,
    request: &SubmitScoreRequest,
) -> Result<(), ApiError> {
    let user_id = authenticate(state, headers)?;
    validate_score(request.score)?;
    state.ranking.submit_score(&user_id, request.score)?;
    Ok(())
}

/// `GET /v1/leaderboard`: returns all best scores in descending order.
pub async fn leaderboard(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let worker = state.clone();
    let response = match run_blocking(move || leaderboard_inner(&worker, &headers)).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => err.into_response(),
    };
    observe(&state, ApiMethod::Leaderboard, start, response.status());
    response
}

/// Authenticates and materializes the leaderboard with 1-based ranks.
fn leaderboard_inner(
    state: &ServerState,
    headers: &HeaderMap,
) -> Result<LeaderboardResponse, ApiError> {
    authenticate(state, headers)?;
    let board = state.ranking.leaderboard()?;
    let entries = board
        .entries
        .into_iter()
        .enumerate()
        .map(|(index, row)| LeaderboardRow {
            rank: index + 1,
            user_id: row.user_id,
            username: row.username,
            score: row.score,
        })
        .collect();
    Ok(LeaderboardResponse { entries })
}

/// `GET /healthz`: readiness probe over both store seams.
pub async fn healthz(State(state): State<ServerState>) -> Response {
    let start = Instant::now();
    let worker = state.clone();
    let ready = run_blocking(move || {
        Ok(worker.identity_store.readiness().is_ok() && worker.score_store.readiness().is_ok())
    })
    .await
    .unwrap_or(false);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    observe(&state, ApiMethod::Health, start, status);
    status.into_response()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
