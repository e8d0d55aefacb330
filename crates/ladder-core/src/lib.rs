// crates/ladder-core/src/lib.rs
// ============================================================================
// Module: Ladder Core Library
// Description: Public API surface for the Ladder game backend core.
// Purpose: Expose domain types, interfaces, and runtime services.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Ladder core provides the ranking engine and account service for a
//! competitive game backend. It is store-agnostic and integrates with
//! identity and score stores through explicit interfaces rather than
//! embedding any backend technology.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::Leaderboard;
pub use crate::core::ScoreEntry;
pub use crate::core::User;
pub use crate::core::UserId;
pub use crate::core::UserScore;
pub use interfaces::HasherError;
pub use interfaces::IdentityError;
pub use interfaces::IdentityStore;
pub use interfaces::PasswordHasher;
pub use interfaces::ScoreStore;
pub use interfaces::ScoreStoreError;
pub use interfaces::TokenError;
pub use interfaces::TokenManager;
pub use runtime::AccountError;
pub use runtime::AccountService;
pub use runtime::InMemoryIdentityStore;
pub use runtime::InMemoryScoreStore;
pub use runtime::LoginSession;
pub use runtime::RankingEngine;
pub use runtime::RankingError;
pub use runtime::SharedIdentityStore;
pub use runtime::SharedScoreStore;
