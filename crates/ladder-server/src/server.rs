// crates/ladder-server/src/server.rs
// ============================================================================
// Module: Server Bootstrap
// Description: Shared state, routing, and the HTTP serve loop.
// Purpose: Wire the runtime onto axum and run it against the configuration.
// Dependencies: ladder-core, ladder-config, ladder-store-sqlite, axum, tokio
// ============================================================================

//! ## Overview
//! The server opens the durable store once, shares it between the identity
//! and score seams, and builds the account service and ranking engine on
//! top. Routing is fixed; request bodies are capped by the configured limit.
//! Shutdown is cooperative: the serve loop drains in-flight requests when
//! the process receives an interrupt.
//!
//! Store calls are synchronous; handlers move them onto the blocking pool
//! and the store's internal locking provides the serialization.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::routing::post;
use ladder_config::LadderConfig;
use ladder_core::AccountService;
use ladder_core::RankingEngine;
use ladder_core::SharedIdentityStore;
use ladder_core::SharedScoreStore;
use ladder_store_sqlite::SqliteGameStore;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::api;
use crate::auth::Argon2PasswordHasher;
use crate::auth::JwtTokenManager;
use crate::telemetry::ApiMetrics;
use crate::telemetry::NoopApiMetrics;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server bootstrap and serve-loop errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Durable store could not be opened or initialized.
    #[error("store error: {0}")]
    Store(String),
    /// Listener could not bind the configured address.
    #[error("bind error: {0}")]
    Bind(String),
    /// Serve loop failed.
    #[error("serve error: {0}")]
    Serve(String),
}

// ============================================================================
// SECTION: Shared State
// ============================================================================

/// Shared per-request state handed to every handler.
#[derive(Clone)]
pub struct ServerState {
    /// Registration and login coordinator.
    pub accounts: Arc<AccountService<SharedIdentityStore, Argon2PasswordHasher, JwtTokenManager>>,
    /// Score submission and leaderboard coordinator.
    pub ranking: Arc<RankingEngine<SharedScoreStore, SharedIdentityStore>>,
    /// Session token verifier for authenticated routes.
    pub tokens: JwtTokenManager,
    /// Metrics sink for request outcomes.
    pub metrics: Arc<dyn ApiMetrics>,
    /// Identity store seam, kept for readiness probes.
    pub identity_store: SharedIdentityStore,
    /// Score store seam, kept for readiness probes.
    pub score_store: SharedScoreStore,
}

impl ServerState {
    /// Builds shared state over the given store seams and token manager.
    #[must_use]
    pub fn new(
        identity: SharedIdentityStore,
        scores: SharedScoreStore,
        tokens: JwtTokenManager,
        metrics: Arc<dyn ApiMetrics>,
    ) -> Self {
        let accounts = Arc::new(AccountService::new(
            identity.clone(),
            Argon2PasswordHasher::new(),
            tokens.clone(),
        ));
        let ranking = Arc::new(RankingEngine::new(scores.clone(), identity.clone()));
        Self {
            accounts,
            ranking,
            tokens,
            metrics,
            identity_store: identity,
            score_store: scores,
        }
    }
}

/// Builds shared state from configuration, opening the durable store.
///
/// The single store connection backs both the identity and score seams.
///
/// # Errors
///
/// Returns [`ServerError::Store`] when the store cannot be opened.
pub fn build_state(config: &LadderConfig) -> Result<ServerState, ServerError> {
    let store = Arc::new(
        SqliteGameStore::new(&config.store).map_err(|err| ServerError::Store(err.to_string()))?,
    );
    let identity = SharedIdentityStore::new(store.clone());
    let scores = SharedScoreStore::new(store);
    let tokens = JwtTokenManager::new(&config.auth.secret, config.auth.token_ttl_secs);
    Ok(ServerState::new(
        identity,
        scores,
        tokens,
        Arc::new(NoopApiMetrics),
    ))
}

// ============================================================================
// SECTION: Routing
// ============================================================================

/// Builds the API router with the configured request body cap.
#[must_use]
pub fn router(state: ServerState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/v1/users/register", post(api::register))
        .route("/v1/users/login", post(api::login))
        .route("/v1/leaderboard/scores", post(api::submit_score))
        .route("/v1/leaderboard", get(api::leaderboard))
        .route("/healthz", get(api::healthz))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// HTTP server bound to a validated configuration.
#[derive(Debug)]
pub struct LadderServer {
    /// Validated configuration the server runs against.
    config: LadderConfig,
}

impl LadderServer {
    /// Creates a server from validated configuration.
    #[must_use]
    pub const fn new(config: LadderConfig) -> Self {
        Self { config }
    }

    /// Opens the store, binds the listener, and serves until interrupted.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the store, the bind, or the serve loop
    /// fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let state = build_state(&self.config)?;
        let app = router(state, self.config.server.max_body_bytes);

        let listener = TcpListener::bind(self.config.server.bind_addr)
            .await
            .map_err(|err| ServerError::Bind(err.to_string()))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|err| ServerError::Serve(err.to_string()))
    }
}

/// Resolves when the process receives an interrupt. A signal-handler
/// installation failure also resolves, shutting the server down rather than
/// leaving it unkillable.
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

// ============================================================================
// SECTION: Tests
// ============================================================================
