// crates/ladder-core/src/runtime/store.rs
// ============================================================================
// Module: Ladder In-Memory Stores
// Description: Simple in-memory identity and score stores for tests and demos.
// Purpose: Provide deterministic store implementations without external deps.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! This module provides in-memory implementations of [`ScoreStore`] and
//! [`IdentityStore`] for tests and local demos, plus shared `Arc` wrappers
//! so stores can be injected as explicitly constructed, process-scoped
//! dependencies. The in-memory implementations are not intended for
//! production use.
//!
//! The in-memory score store's native tie order is user identifier
//! ascending.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::ScoreEntry;
use crate::core::User;
use crate::core::UserId;
use crate::interfaces::IdentityError;
use crate::interfaces::IdentityStore;
use crate::interfaces::ScoreStore;
use crate::interfaces::ScoreStoreError;

// ============================================================================
// SECTION: In-Memory Score Store
// ============================================================================

/// In-memory best-score store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryScoreStore {
    /// Best score per user, protected by a mutex. Clones share state.
    entries: Arc<Mutex<BTreeMap<UserId, f64>>>,
}

impl InMemoryScoreStore {
    /// Creates a new empty in-memory score store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

impl ScoreStore for InMemoryScoreStore {
    fn best_score(&self, user_id: &UserId) -> Result<Option<ScoreEntry>, ScoreStoreError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| ScoreStoreError::Store("score store mutex poisoned".to_string()))?;
        Ok(guard.get(user_id).map(|score| ScoreEntry {
            user_id: user_id.clone(),
            score: *score,
        }))
    }

    fn set_best_score(&self, user_id: &UserId, score: f64) -> Result<(), ScoreStoreError> {
        self.entries
            .lock()
            .map_err(|_| ScoreStoreError::Store("score store mutex poisoned".to_string()))?
            .insert(user_id.clone(), score);
        Ok(())
    }

    fn scores_descending(&self) -> Result<Vec<ScoreEntry>, ScoreStoreError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| ScoreStoreError::Store("score store mutex poisoned".to_string()))?;
        let mut entries: Vec<ScoreEntry> = guard
            .iter()
            .map(|(user_id, score)| ScoreEntry {
                user_id: user_id.clone(),
                score: *score,
            })
            .collect();
        // BTreeMap iteration gives id-ascending tie order after the sort.
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(entries)
    }
}

// ============================================================================
// SECTION: In-Memory Identity Store
// ============================================================================

/// Mutable state behind the in-memory identity store mutex.
#[derive(Debug, Default)]
struct IdentityInner {
    /// User records keyed by identifier.
    users: BTreeMap<UserId, User>,
    /// Sequence counter for assigned identifiers.
    next_id: u64,
}

/// In-memory identity store for tests and examples.
///
/// Identifiers are assigned as a `user-N` sequence.
#[derive(Debug, Default, Clone)]
pub struct InMemoryIdentityStore {
    /// Store state protected by a mutex. Clones share state.
    inner: Arc<Mutex<IdentityInner>>,
}

impl InMemoryIdentityStore {
    /// Creates a new empty in-memory identity store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(IdentityInner::default())),
        }
    }

    /// Locks the inner state, surfacing poisoning as a store error.
    fn locked(&self) -> Result<std::sync::MutexGuard<'_, IdentityInner>, IdentityError> {
        self.inner
            .lock()
            .map_err(|_| IdentityError::Store("identity store mutex poisoned".to_string()))
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn create(&self, name: &str, password_hash: &str) -> Result<User, IdentityError> {
        let mut guard = self.locked()?;
        if guard.users.values().any(|user| user.name == name) {
            return Err(IdentityError::Conflict(format!("name already exists: {name}")));
        }

        guard.next_id += 1;
        let user = User {
            id: UserId::new(format!("user-{}", guard.next_id)),
            name: name.to_string(),
            password_hash: password_hash.to_string(),
        };
        guard.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn get_by_name(&self, name: &str) -> Result<Option<User>, IdentityError> {
        let guard = self.locked()?;
        Ok(guard.users.values().find(|user| user.name == name).cloned())
    }

    fn exists(&self, user_id: &UserId) -> Result<bool, IdentityError> {
        let guard = self.locked()?;
        Ok(guard.users.contains_key(user_id))
    }

    fn exists_by_name(&self, name: &str) -> Result<bool, IdentityError> {
        let guard = self.locked()?;
        Ok(guard.users.values().any(|user| user.name == name))
    }

    fn resolve_many(&self, user_ids: &[UserId]) -> Result<Vec<User>, IdentityError> {
        let guard = self.locked()?;
        Ok(user_ids
            .iter()
            .filter_map(|id| guard.users.get(id).cloned())
            .collect())
    }
}

// ============================================================================
// SECTION: Shared Store Wrappers
// ============================================================================

/// Shared score store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedScoreStore {
    /// Inner store implementation.
    inner: Arc<dyn ScoreStore + Send + Sync>,
}

impl SharedScoreStore {
    /// Wraps a score store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl ScoreStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn ScoreStore + Send + Sync>) -> Self {
        Self { inner: store }
    }
}

impl ScoreStore for SharedScoreStore {
    fn best_score(&self, user_id: &UserId) -> Result<Option<ScoreEntry>, ScoreStoreError> {
        self.inner.best_score(user_id)
    }

    fn set_best_score(&self, user_id: &UserId, score: f64) -> Result<(), ScoreStoreError> {
        self.inner.set_best_score(user_id, score)
    }

    fn scores_descending(&self) -> Result<Vec<ScoreEntry>, ScoreStoreError> {
        self.inner.scores_descending()
    }

    fn readiness(&self) -> Result<(), ScoreStoreError> {
        self.inner.readiness()
    }
}

/// Shared identity store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedIdentityStore {
    /// Inner store implementation.
    inner: Arc<dyn IdentityStore + Send + Sync>,
}

impl SharedIdentityStore {
    /// Wraps an identity store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl IdentityStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn IdentityStore + Send + Sync>) -> Self {
        Self { inner: store }
    }
}

impl IdentityStore for SharedIdentityStore {
    fn create(&self, name: &str, password_hash: &str) -> Result<User, IdentityError> {
        self.inner.create(name, password_hash)
    }

    fn get_by_name(&self, name: &str) -> Result<Option<User>, IdentityError> {
        self.inner.get_by_name(name)
    }

    fn exists(&self, user_id: &UserId) -> Result<bool, IdentityError> {
        self.inner.exists(user_id)
    }

    fn exists_by_name(&self, name: &str) -> Result<bool, IdentityError> {
        self.inner.exists_by_name(name)
    }

    fn resolve_many(&self, user_ids: &[UserId]) -> Result<Vec<User>, IdentityError> {
        self.inner.resolve_many(user_ids)
    }

    fn readiness(&self) -> Result<(), IdentityError> {
        self.inner.readiness()
    }
}
