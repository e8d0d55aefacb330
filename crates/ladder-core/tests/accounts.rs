// crates/ladder-core/tests/accounts.rs
// ============================================================================
// Module: Account Service Tests
// Description: Ensures registration uniqueness and login credential checks.
// ============================================================================
//! ## Overview
//! Validates registration and login flows with in-memory fixtures and stub
//! credential seams.

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

use ladder_core::AccountError;
use ladder_core::AccountService;
use ladder_core::HasherError;
use ladder_core::IdentityError;
use ladder_core::IdentityStore;
use ladder_core::InMemoryIdentityStore;
use ladder_core::PasswordHasher;
use ladder_core::TokenError;
use ladder_core::TokenManager;
use ladder_core::User;
use ladder_core::UserId;

/// Reversible stub hasher for deterministic assertions.
struct StubHasher;

impl PasswordHasher for StubHasher {
    fn hash_password(&self, password: &str) -> Result<String, HasherError> {
        Ok(format!("stub:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, HasherError> {
        Ok(hash == format!("stub:{password}"))
    }
}

/// Stub token manager embedding the user id in the token.
struct StubTokens;

impl TokenManager for StubTokens {
    fn issue(&self, user_id: &UserId) -> Result<String, TokenError> {
        Ok(format!("token-for-{user_id}"))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        token
            .strip_prefix("token-for-")
            .map(UserId::from)
            .ok_or_else(|| TokenError::Invalid("bad stub token".to_string()))
    }
}

/// Identity store whose `create` always reports a name conflict, simulating
/// a lost check-then-create race.
struct ConflictingIdentityStore {
    inner: InMemoryIdentityStore,
}

impl IdentityStore for ConflictingIdentityStore {
    fn create(&self, name: &str, _password_hash: &str) -> Result<User, IdentityError> {
        Err(IdentityError::Conflict(format!("name already exists: {name}")))
    }

    fn get_by_name(&self, name: &str) -> Result<Option<User>, IdentityError> {
        self.inner.get_by_name(name)
    }

    fn exists(&self, user_id: &UserId) -> Result<bool, IdentityError> {
        self.inner.exists(user_id)
    }

    fn exists_by_name(&self, _name: &str) -> Result<bool, IdentityError> {
        // The uniqueness check passes; the create then loses the race.
        Ok(false)
    }

    fn resolve_many(&self, user_ids: &[UserId]) -> Result<Vec<User>, IdentityError> {
        self.inner.resolve_many(user_ids)
    }
}

fn service() -> AccountService<InMemoryIdentityStore, StubHasher, StubTokens> {
    AccountService::new(InMemoryIdentityStore::new(), StubHasher, StubTokens)
}

#[test]
fn register_assigns_id_and_hashes_password() {
    let accounts = service();
    let user = accounts.register("alice", "hunter2").expect("register");

    assert_eq!(user.name, "alice");
    assert_eq!(user.password_hash, "stub:hunter2");
    assert!(!user.id.as_str().is_empty());
}

#[test]
fn register_rejects_duplicate_name() {
    let accounts = service();
    accounts.register("alice", "one").expect("first register");

    let err = accounts.register("alice", "two").expect_err("duplicate");
    assert!(matches!(err, AccountError::NameTaken(name) if name == "alice"));
}

#[test]
fn register_maps_store_conflict_to_name_taken() {
    let accounts = AccountService::new(
        ConflictingIdentityStore {
            inner: InMemoryIdentityStore::new(),
        },
        StubHasher,
        StubTokens,
    );

    let err = accounts.register("alice", "pw").expect_err("lost race");
    assert!(matches!(err, AccountError::NameTaken(_)));
}

#[test]
fn login_returns_session_with_token() {
    let accounts = service();
    let user = accounts.register("alice", "hunter2").expect("register");

    let session = accounts.login("alice", "hunter2").expect("login");
    assert_eq!(session.user_id, user.id);
    assert_eq!(session.username, "alice");
    assert_eq!(session.token, format!("token-for-{}", user.id));
}

#[test]
fn login_rejects_unknown_user() {
    let accounts = service();
    let err = accounts.login("nobody", "pw").expect_err("unknown user");
    assert!(matches!(err, AccountError::UnknownUser(name) if name == "nobody"));
}

#[test]
fn login_rejects_wrong_password() {
    let accounts = service();
    accounts.register("alice", "hunter2").expect("register");

    let err = accounts.login("alice", "wrong").expect_err("bad password");
    assert!(matches!(err, AccountError::InvalidCredentials));
}
