// crates/ladder-core/src/runtime/ranking.rs
// ============================================================================
// Module: Ladder Ranking Engine
// Description: Score submission policy and leaderboard materialization.
// Purpose: Enforce the monotonic best-score policy across two stores.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The ranking engine is a stateless coordinator over the identity and score
//! stores. Submissions keep only a user's best score: a candidate below the
//! current best is silently accepted without a write, while an equal or
//! higher candidate is written unconditionally. Leaderboard reads enumerate
//! the full descending score set and resolve display names in one batch
//! call; a scored user the identity store cannot resolve is a consistency
//! violation and fails the whole read.
//!
//! Concurrency is delegated to the score store's point read/write atomicity.
//! Two concurrent submissions for the same user may both pass the comparison
//! and both write; either winner is >= what was read, so the monotonic
//! intent survives the race.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;

use thiserror::Error;

use crate::core::Leaderboard;
use crate::core::UserId;
use crate::core::UserScore;
use crate::interfaces::IdentityError;
use crate::interfaces::IdentityStore;
use crate::interfaces::ScoreStore;
use crate::interfaces::ScoreStoreError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Ranking engine errors.
///
/// # Invariants
/// - `UnknownUser` is the only not-found condition; every other variant is
///   internal.
#[derive(Debug, Error)]
pub enum RankingError {
    /// Submitting user does not exist in the identity store.
    #[error("unknown user: {0}")]
    UnknownUser(UserId),
    /// A scored user could not be resolved by the identity store, meaning
    /// the two stores have diverged.
    #[error("identity missing for scored user: {0}")]
    MissingIdentity(UserId),
    /// Identity store failure.
    #[error(transparent)]
    Identity(#[from] IdentityError),
    /// Score store failure.
    #[error(transparent)]
    Score(#[from] ScoreStoreError),
}

impl RankingError {
    /// Returns `true` when the error is the not-found condition rather than
    /// an internal failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownUser(_))
    }
}

// ============================================================================
// SECTION: Ranking Engine
// ============================================================================

/// Stateless coordinator for score submission and leaderboard reads.
pub struct RankingEngine<S, I> {
    /// Score store implementation.
    scores: S,
    /// Identity store implementation.
    identity: I,
}

impl<S, I> RankingEngine<S, I>
where
    S: ScoreStore,
    I: IdentityStore,
{
    /// Creates a new ranking engine over the given stores.
    #[must_use]
    pub const fn new(scores: S, identity: I) -> Self {
        Self { scores, identity }
    }

    /// Submits a score for the given user under the best-score-only policy.
    ///
    /// The user's existence is verified before any score-store mutation so a
    /// failed submission never creates an orphan entry. A candidate strictly
    /// below the current best is accepted as a no-op; an equal candidate is
    /// rewritten, not elided. Score positivity is the presentation
    /// boundary's responsibility and is not re-checked here.
    ///
    /// # Errors
    ///
    /// Returns [`RankingError::UnknownUser`] when the user does not exist,
    /// or a store error when any read or write fails.
    pub fn submit_score(&self, user_id: &UserId, score: f64) -> Result<(), RankingError> {
        if !self.identity.exists(user_id)? {
            return Err(RankingError::UnknownUser(user_id.clone()));
        }

        // None means no prior best: implicitly lower than any candidate.
        if let Some(current) = self.scores.best_score(user_id)?
            && current.score > score
        {
            return Ok(());
        }

        self.scores.set_best_score(user_id, score)?;
        Ok(())
    }

    /// Materializes the leaderboard: all best scores descending, display
    /// names resolved in a single identity batch call.
    ///
    /// The read is all-or-nothing; no partial leaderboard is ever returned.
    ///
    /// # Errors
    ///
    /// Returns [`RankingError::MissingIdentity`] when a scored user is
    /// absent from the batch resolution, or a store error when enumeration
    /// or resolution fails.
    pub fn leaderboard(&self) -> Result<Leaderboard, RankingError> {
        let entries = self.scores.scores_descending()?;
        if entries.is_empty() {
            return Ok(Leaderboard::default());
        }

        let mut user_ids: Vec<UserId> = Vec::with_capacity(entries.len());
        for entry in &entries {
            if !user_ids.contains(&entry.user_id) {
                user_ids.push(entry.user_id.clone());
            }
        }

        let users = self.identity.resolve_many(&user_ids)?;
        let mut names: HashMap<&UserId, &str> = HashMap::with_capacity(users.len());
        for user in &users {
            names.insert(&user.id, user.name.as_str());
        }

        let mut rows = Vec::with_capacity(entries.len());
        for entry in &entries {
            let username = names
                .get(&entry.user_id)
                .ok_or_else(|| RankingError::MissingIdentity(entry.user_id.clone()))?;
            rows.push(UserScore {
                user_id: entry.user_id.clone(),
                username: (*username).to_string(),
                score: entry.score,
            });
        }

        Ok(Leaderboard { entries: rows })
    }
}
