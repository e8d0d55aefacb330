// crates/ladder-core/src/runtime/accounts.rs
// ============================================================================
// Module: Ladder Account Service
// Description: User registration and login over the identity store.
// Purpose: Coordinate credential hashing, uniqueness, and token issuance.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The account service owns the registration and login flows. Registration
//! checks name uniqueness before creating the user; a store-level conflict
//! from a lost check-then-create race is treated the same as a failed
//! uniqueness check. Login never reveals whether the name or the password
//! was wrong beyond the distinct error variants the presentation boundary
//! maps to status codes.
//!
//! Empty names and passwords are rejected by the presentation boundary
//! before reaching this service.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::core::User;
use crate::core::UserId;
use crate::interfaces::HasherError;
use crate::interfaces::IdentityError;
use crate::interfaces::IdentityStore;
use crate::interfaces::PasswordHasher;
use crate::interfaces::TokenError;
use crate::interfaces::TokenManager;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Account service errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling; the presentation
///   boundary maps them to transport status codes.
#[derive(Debug, Error)]
pub enum AccountError {
    /// No user with the given name exists.
    #[error("unknown user: {0}")]
    UnknownUser(String),
    /// The requested name is already registered.
    #[error("username taken: {0}")]
    NameTaken(String),
    /// The supplied password does not match the stored hash.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Identity store failure.
    #[error(transparent)]
    Identity(#[from] IdentityError),
    /// Password hasher failure.
    #[error(transparent)]
    Hasher(#[from] HasherError),
    /// Token manager failure.
    #[error(transparent)]
    Token(#[from] TokenError),
}

// ============================================================================
// SECTION: Login Session
// ============================================================================

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginSession {
    /// Authenticated user identifier.
    pub user_id: UserId,
    /// Display name of the authenticated user.
    pub username: String,
    /// Bearer token for subsequent authenticated calls.
    pub token: String,
}

// ============================================================================
// SECTION: Account Service
// ============================================================================

/// Registration and login coordinator over injected credential seams.
pub struct AccountService<I, H, T> {
    /// Identity store implementation.
    identity: I,
    /// Password hasher implementation.
    hasher: H,
    /// Token manager implementation.
    tokens: T,
}

impl<I, H, T> AccountService<I, H, T>
where
    I: IdentityStore,
    H: PasswordHasher,
    T: TokenManager,
{
    /// Creates a new account service over the given dependencies.
    #[must_use]
    pub const fn new(identity: I, hasher: H, tokens: T) -> Self {
        Self {
            identity,
            hasher,
            tokens,
        }
    }

    /// Registers a new user with a unique display name.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NameTaken`] when the name is already
    /// registered, or a dependency error when hashing or creation fails.
    pub fn register(&self, name: &str, password: &str) -> Result<User, AccountError> {
        if self.identity.exists_by_name(name)? {
            return Err(AccountError::NameTaken(name.to_string()));
        }

        let password_hash = self.hasher.hash_password(password)?;
        match self.identity.create(name, &password_hash) {
            Ok(user) => Ok(user),
            // Lost the check-then-create race: same outcome as the check.
            Err(IdentityError::Conflict(_)) => Err(AccountError::NameTaken(name.to_string())),
            Err(err) => Err(err.into()),
        }
    }

    /// Authenticates a user and issues a session token.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UnknownUser`] when no such name exists,
    /// [`AccountError::InvalidCredentials`] on a password mismatch, or a
    /// dependency error when verification or issuance fails.
    pub fn login(&self, name: &str, password: &str) -> Result<LoginSession, AccountError> {
        let Some(user) = self.identity.get_by_name(name)? else {
            return Err(AccountError::UnknownUser(name.to_string()));
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AccountError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.id)?;
        Ok(LoginSession {
            user_id: user.id,
            username: user.name,
            token,
        })
    }
}
