// crates/ladder-core/src/core/mod.rs
// ============================================================================
// Module: Ladder Core Types
// Description: Canonical domain structures for users, scores, and rankings.
// Purpose: Provide stable, serializable types shared by every Ladder crate.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types define the user identity record, raw score-store entries, and
//! the resolved leaderboard shape. These types are the canonical source of
//! truth for any derived API surfaces.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod leaderboard;
pub mod user;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::UserId;
pub use leaderboard::Leaderboard;
pub use leaderboard::ScoreEntry;
pub use leaderboard::UserScore;
pub use user::User;
