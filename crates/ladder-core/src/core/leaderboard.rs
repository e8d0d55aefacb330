// crates/ladder-core/src/core/leaderboard.rs
// ============================================================================
// Module: Ladder Leaderboard Types
// Description: Score-store entries and resolved leaderboard rows.
// Purpose: Provide the canonical ranked-result shapes for reads and writes.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! Two shapes cover the two halves of the read path: [`ScoreEntry`] is what
//! the score store holds (identifier and best score, no display name), and
//! [`UserScore`] is a leaderboard row after identity resolution. A
//! [`Leaderboard`] is a descending sequence of resolved rows; rank is the
//! 1-based position in the sequence and is never stored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Score Shapes
// ============================================================================

/// Raw score-store record: a user's current best score.
///
/// # Invariants
/// - At most one entry exists per user.
/// - `score` is non-negative and never decreases once set; monotonicity is
///   enforced by the submission policy, not by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// User the score belongs to.
    pub user_id: UserId,
    /// Best score ever accepted for the user.
    pub score: f64,
}

/// Resolved leaderboard row with display name.
///
/// # Invariants
/// - `username` is always resolved from the identity store; a row with an
///   unresolvable name never appears in a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserScore {
    /// User the score belongs to.
    pub user_id: UserId,
    /// Display name resolved at read time (denormalized, never stored with
    /// the score).
    pub username: String,
    /// Best score ever accepted for the user.
    pub score: f64,
}

// ============================================================================
// SECTION: Leaderboard
// ============================================================================

/// Descending-ordered materialization of all best scores.
///
/// # Invariants
/// - Entries are ordered by score descending; ties follow the score store's
///   native ordering.
/// - Every entry carries a resolved display name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    /// Ranked rows, highest score first.
    pub entries: Vec<UserScore>,
}

impl Leaderboard {
    /// Returns `true` when the leaderboard has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of ranked rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
