// crates/ladder-core/src/runtime/mod.rs
// ============================================================================
// Module: Ladder Runtime
// Description: Ranking engine, account service, and in-memory stores.
// Purpose: Execute Ladder submission and leaderboard flows over store seams.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the stateless coordinators of the Ladder
//! backend. All external interfaces must call into the same engine logic so
//! the monotonic best-score policy holds regardless of transport.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod accounts;
pub mod ranking;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use accounts::AccountError;
pub use accounts::AccountService;
pub use accounts::LoginSession;
pub use ranking::RankingEngine;
pub use ranking::RankingError;
pub use store::InMemoryIdentityStore;
pub use store::InMemoryScoreStore;
pub use store::SharedIdentityStore;
pub use store::SharedScoreStore;
