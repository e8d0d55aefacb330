// crates/ladder-server/src/auth/tests.rs
// ============================================================================
// Module: Credential Tooling Unit Tests
// Description: Unit tests for password hashing and session tokens.
// Purpose: Validate hash verification and token issue/verify behavior.
// Dependencies: ladder-core
// ============================================================================

//! ## Overview
//! Exercises Argon2 hash round trips and JWT issue/verify paths, including
//! tamper and expiry rejection.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use ladder_core::PasswordHasher;
use ladder_core::TokenError;
use ladder_core::TokenManager;
use ladder_core::UserId;

use super::Argon2PasswordHasher;
use super::Claims;
use super::JwtTokenManager;

/// Shared secret used across token tests.
const SECRET: &str = "0123456789abcdef0123456789abcdef";

#[test]
fn hashed_password_verifies() {
    let hasher = Argon2PasswordHasher::new();
    let hash = hasher.hash_password("hunter2").expect("hash");

    assert!(hasher.verify_password("hunter2", &hash).expect("verify"));
}

#[test]
fn wrong_password_does_not_verify() {
    let hasher = Argon2PasswordHasher::new();
    let hash = hasher.hash_password("hunter2").expect("hash");

    assert!(!hasher.verify_password("hunter3", &hash).expect("verify"));
}

#[test]
fn identical_passwords_produce_distinct_hashes() {
    let hasher = Argon2PasswordHasher::new();
    let first = hasher.hash_password("hunter2").expect("hash");
    let second = hasher.hash_password("hunter2").expect("hash");

    assert_ne!(first, second);
}

#[test]
fn malformed_hash_is_an_error_not_a_mismatch() {
    let hasher = Argon2PasswordHasher::new();
    let err = hasher
        .verify_password("hunter2", "not-a-phc-string")
        .expect_err("malformed hash");
    let message = err.to_string();

    assert!(!message.contains("hunter2"));
}

#[test]
fn issued_token_verifies_to_the_same_user() {
    let tokens = JwtTokenManager::new(SECRET, 3_600);
    let user = UserId::new("user-1");

    let token = tokens.issue(&user).expect("issue");
    let verified = tokens.verify(&token).expect("verify");

    assert_eq!(verified, user);
}

#[test]
fn token_signed_with_other_secret_is_rejected() {
    let tokens = JwtTokenManager::new(SECRET, 3_600);
    let other = JwtTokenManager::new("fedcba9876543210fedcba9876543210", 3_600);

    let token = other.issue(&UserId::new("user-1")).expect("issue");
    let err = tokens.verify(&token).expect_err("wrong secret");

    assert!(matches!(err, TokenError::Invalid(_)));
}

#[test]
fn expired_token_is_rejected() {
    let tokens = JwtTokenManager::new(SECRET, 3_600);
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_secs();
    // Expired well past the default validation leeway.
    let claims = Claims {
        sub: "user-1".to_string(),
        iat: now - 7_200,
        exp: now - 3_600,
    };
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("encode");

    let err = tokens.verify(&token).expect_err("expired token");
    assert!(matches!(err, TokenError::Invalid(_)));
}

#[test]
fn garbage_token_is_rejected() {
    let tokens = JwtTokenManager::new(SECRET, 3_600);
    let err = tokens.verify("not.a.token").expect_err("garbage");

    assert!(matches!(err, TokenError::Invalid(_)));
}
