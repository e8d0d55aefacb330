// crates/ladder-store-sqlite/src/lib.rs
// ============================================================================
// Module: Ladder SQLite Store Library
// Description: Durable identity and score store backed by SQLite.
// Purpose: Expose the SQLite-backed store and its configuration types.
// Dependencies: ladder-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides [`SqliteGameStore`], a durable implementation of both
//! Ladder store interfaces over a single embedded `SQLite` database. The
//! store fails closed on schema mismatches and invalid configuration.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteGameStore;
pub use store::SqliteJournalMode;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteSyncMode;
