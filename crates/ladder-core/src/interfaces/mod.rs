// crates/ladder-core/src/interfaces/mod.rs
// ============================================================================
// Module: Ladder Interfaces
// Description: Backend-agnostic interfaces for identity, scores, and auth.
// Purpose: Define the contract surfaces used by the Ladder runtime.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how Ladder integrates with its backing stores and
//! credential tooling without embedding backend-specific details. The
//! ranking engine and account service are written against these traits so
//! any ordered-store or identity technology can be substituted without
//! touching the runtime.
//!
//! A missing score (`Ok(None)` from [`ScoreStore::best_score`]) is valid
//! state, not an error; it is distinct from the identity store's "user does
//! not exist".

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ScoreEntry;
use crate::core::User;
use crate::core::UserId;

// ============================================================================
// SECTION: Score Store
// ============================================================================

/// Score store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ScoreStoreError {
    /// Score store I/O error.
    #[error("score store io error: {0}")]
    Io(String),
    /// Score store data is invalid.
    #[error("score store invalid data: {0}")]
    Invalid(String),
    /// Score store reported an error.
    #[error("score store error: {0}")]
    Store(String),
}

/// Ordered best-score store keyed by user identifier.
///
/// The store holds at most one entry per user and supports a full descending
/// enumeration. Ties are broken by the store's native ordering; callers must
/// not assume anything beyond score order.
pub trait ScoreStore {
    /// Returns the user's current best score, or `None` when the user has
    /// never submitted a score.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreStoreError`] when the lookup fails.
    fn best_score(&self, user_id: &UserId) -> Result<Option<ScoreEntry>, ScoreStoreError>;

    /// Unconditionally upserts the stored best score for the user.
    ///
    /// Writing an equal score is a rewrite, not an elision; stores must not
    /// skip the write on equality.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreStoreError`] when the write fails.
    fn set_best_score(&self, user_id: &UserId, score: f64) -> Result<(), ScoreStoreError>;

    /// Enumerates all entries, highest score first.
    ///
    /// The result is a best-effort snapshot; exact linearizability with
    /// concurrent writes is not required.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreStoreError`] when enumeration fails.
    fn scores_descending(&self) -> Result<Vec<ScoreEntry>, ScoreStoreError>;

    /// Reports store readiness for liveness/readiness probes.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreStoreError`] when the store is unavailable.
    fn readiness(&self) -> Result<(), ScoreStoreError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Identity Store
// ============================================================================

/// Identity store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Identity store I/O error.
    #[error("identity store io error: {0}")]
    Io(String),
    /// Identity store data is invalid.
    #[error("identity store invalid data: {0}")]
    Invalid(String),
    /// Identity store conflict (duplicate name).
    #[error("identity store conflict: {0}")]
    Conflict(String),
    /// Identity store reported an error.
    #[error("identity store error: {0}")]
    Store(String),
}

/// System of record for user existence and display names.
pub trait IdentityStore {
    /// Creates a user with the given name and password hash, assigning the
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Conflict`] when the name is already taken,
    /// or another [`IdentityError`] when creation fails.
    fn create(&self, name: &str, password_hash: &str) -> Result<User, IdentityError>;

    /// Looks a user up by display name.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the lookup fails.
    fn get_by_name(&self, name: &str) -> Result<Option<User>, IdentityError>;

    /// Reports whether a user with the given identifier exists.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the check fails.
    fn exists(&self, user_id: &UserId) -> Result<bool, IdentityError>;

    /// Reports whether a user with the given display name exists.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the check fails.
    fn exists_by_name(&self, name: &str) -> Result<bool, IdentityError>;

    /// Resolves a batch of identifiers in a single call.
    ///
    /// Returns a record for every identifier the store knows; unknown
    /// identifiers are omitted from the result and callers detect omissions.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when resolution fails.
    fn resolve_many(&self, user_ids: &[UserId]) -> Result<Vec<User>, IdentityError>;

    /// Reports store readiness for liveness/readiness probes.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the store is unavailable.
    fn readiness(&self) -> Result<(), IdentityError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Password Hasher
// ============================================================================

/// Password hasher errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum HasherError {
    /// Hashing or verification failed.
    #[error("password hasher error: {0}")]
    Hash(String),
}

/// Password hashing seam for the account service.
pub trait PasswordHasher {
    /// Hashes a plaintext password into a self-describing PHC string.
    ///
    /// # Errors
    ///
    /// Returns [`HasherError`] when hashing fails.
    fn hash_password(&self, password: &str) -> Result<String, HasherError>;

    /// Verifies a plaintext password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; only malformed hashes or hasher failures
    /// are errors.
    ///
    /// # Errors
    ///
    /// Returns [`HasherError`] when the stored hash cannot be parsed.
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, HasherError>;
}

// ============================================================================
// SECTION: Token Manager
// ============================================================================

/// Token manager errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token issuance failed.
    #[error("token issuance error: {0}")]
    Issue(String),
    /// Token is expired, forged, or malformed.
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Session token seam for the presentation boundary.
pub trait TokenManager {
    /// Issues a session token bound to the given user.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Issue`] when issuance fails.
    fn issue(&self, user_id: &UserId) -> Result<String, TokenError>;

    /// Verifies a token and returns the bound user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] for expired, forged, or malformed
    /// tokens.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
