// crates/ladder-server/src/auth.rs
// ============================================================================
// Module: Credential Tooling
// Description: Password hashing and session token issuance.
// Purpose: Provide the production PasswordHasher and TokenManager backends.
// Dependencies: ladder-core, argon2, jsonwebtoken
// ============================================================================

//! ## Overview
//! This module supplies the two credential capabilities the account service
//! needs: Argon2id password hashing with per-password salts, and HS256
//! session tokens carrying the user id as subject. Both implement the
//! `ladder-core` capability traits so the runtime stays free of crypto
//! dependencies.
//!
//! Security posture: hashes and tokens are opaque at this boundary; error
//! payloads never include password or secret material.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use argon2::Argon2;
use argon2::PasswordHash;
use argon2::PasswordVerifier;
use argon2::password_hash::PasswordHasher as _;
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use ladder_core::HasherError;
use ladder_core::PasswordHasher;
use ladder_core::TokenError;
use ladder_core::TokenManager;
use ladder_core::UserId;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Password Hashing
// ============================================================================

/// Argon2id password hasher producing PHC-format hash strings.
///
/// Each hash carries its own random salt, so identical passwords never
/// produce identical hashes.
#[derive(Debug, Default, Clone)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Creates a hasher with default Argon2id parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> Result<String, HasherError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| HasherError::Hash(err.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, HasherError> {
        let parsed =
            PasswordHash::new(hash).map_err(|err| HasherError::Hash(err.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

// ============================================================================
// SECTION: Session Tokens
// ============================================================================

/// JWT claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the user id the token was issued for.
    sub: String,
    /// Issued-at timestamp in seconds since the Unix epoch.
    iat: u64,
    /// Expiry timestamp in seconds since the Unix epoch.
    exp: u64,
}

/// HS256 session token manager.
///
/// # Invariants
/// - Tokens are only valid for the lifetime configured at construction.
/// - Verification rejects expired or tampered tokens.
#[derive(Clone)]
pub struct JwtTokenManager {
    /// Symmetric signing key derived from the configured secret.
    encoding: EncodingKey,
    /// Symmetric verification key derived from the configured secret.
    decoding: DecodingKey,
    /// Token lifetime in seconds.
    ttl_secs: u64,
}

impl std::fmt::Debug for JwtTokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenManager")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl JwtTokenManager {
    /// Creates a token manager from the shared secret and lifetime.
    #[must_use]
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Returns the current Unix timestamp in seconds.
    fn now_secs() -> Result<u64, TokenError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .map_err(|_| TokenError::Issue("system clock before Unix epoch".to_string()))
    }
}

impl TokenManager for JwtTokenManager {
    fn issue(&self, user_id: &UserId) -> Result<String, TokenError> {
        let now = Self::now_secs()?;
        let claims = Claims {
            sub: user_id.as_str().to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::Issue(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|err| TokenError::Invalid(err.to_string()))?;
        Ok(UserId::new(data.claims.sub))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
