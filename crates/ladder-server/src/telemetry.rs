// crates/ladder-server/src/telemetry.rs
// ============================================================================
// Module: Server Telemetry
// Description: Observability hooks for API request handling.
// Purpose: Provide metric events and latency buckets without hard deps.
// Dependencies: none beyond std
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for API request counters and
//! latency histograms. It is intentionally dependency-light so deployments
//! can plug in Prometheus or OpenTelemetry without redesign.
//!
//! Security posture: telemetry must avoid leaking user identifiers or
//! credential material; labels are restricted to the fixed method set.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for API request histograms.
pub const API_LATENCY_BUCKETS_MS: &[u64] =
    &[1, 2, 5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// API request classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    /// User registration.
    Register,
    /// User login.
    Login,
    /// Authenticated score submission.
    SubmitScore,
    /// Authenticated leaderboard read.
    Leaderboard,
    /// Readiness probe.
    Health,
}

impl ApiMethod {
    /// Returns a stable label for the method.
    #[must_use]
    pub const fn as_label(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Login => "login",
            Self::SubmitScore => "submit_score",
            Self::Leaderboard => "leaderboard",
            Self::Health => "health",
        }
    }
}

// ============================================================================
// SECTION: Metrics Interface
// ============================================================================

/// Metrics sink for API request outcomes.
///
/// Implementations must be cheap and non-blocking; the server calls this on
/// every request.
pub trait ApiMetrics: Send + Sync {
    /// Records one completed request with its response status and latency.
    fn record_request(&self, method: ApiMethod, status: u16, latency: Duration);
}

/// Metrics sink that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopApiMetrics;

impl ApiMetrics for NoopApiMetrics {
    fn record_request(&self, _method: ApiMethod, _status: u16, _latency: Duration) {}
}
