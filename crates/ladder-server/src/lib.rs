// crates/ladder-server/src/lib.rs
// ============================================================================
// Module: Ladder Server Library
// Description: HTTP presentation boundary for the Ladder game backend.
// Purpose: Expose the router, credential tooling, and server bootstrap.
// Dependencies: ladder-core, ladder-config, ladder-store-sqlite, axum
// ============================================================================

//! ## Overview
//! `ladder-server` maps HTTP requests onto the Ladder runtime: registration
//! and login through the account service, authenticated score submission and
//! leaderboard reads through the ranking engine. The boundary owns request
//! shape validation and the translation of engine error conditions to
//! transport status codes; engine semantics live in `ladder-core`.
//!
//! Security posture: all request inputs are untrusted; internal error detail
//! never reaches a response body.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod api;
pub mod auth;
pub mod server;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use api::ApiError;
pub use auth::Argon2PasswordHasher;
pub use auth::JwtTokenManager;
pub use server::LadderServer;
pub use server::ServerError;
pub use server::ServerState;
pub use server::build_state;
pub use server::router;
pub use telemetry::ApiMethod;
pub use telemetry::ApiMetrics;
pub use telemetry::NoopApiMetrics;
