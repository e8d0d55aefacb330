// crates/ladder-core/src/core/user.rs
// ============================================================================
// Module: Ladder User Record
// Description: Identity-store user record with credential material.
// Purpose: Provide the canonical user shape owned by the identity store.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! The identity store is the system of record for user existence and display
//! names. The stored password hash is a PHC-formatted string produced by a
//! [`crate::interfaces::PasswordHasher`]; no plaintext credential ever
//! appears in this type.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: User Record
// ============================================================================

/// User record owned by the identity store.
///
/// # Invariants
/// - `id` is unique and stable for the lifetime of the account.
/// - `name` is unique across the identity store.
/// - `password_hash` is an opaque PHC string, never a plaintext password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable user identifier assigned at creation.
    pub id: UserId,
    /// Unique display name chosen at registration.
    pub name: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
}
