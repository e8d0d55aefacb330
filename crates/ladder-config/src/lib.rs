// crates/ladder-config/src/lib.rs
// ============================================================================
// Module: Ladder Config Library
// Description: Canonical config model and validation for the Ladder backend.
// Purpose: Single source of truth for ladder.toml semantics.
// Dependencies: ladder-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `ladder-config` defines the canonical configuration model for the Ladder
//! backend. Parsing is strict (unknown fields rejected) and validation fails
//! closed: a server never starts with a short auth secret or a zero token
//! lifetime.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AuthConfig;
pub use config::ConfigError;
pub use config::LadderConfig;
pub use config::ServerConfig;
