// crates/ladder-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Game Store
// Description: Durable IdentityStore and ScoreStore backed by SQLite WAL.
// Purpose: Persist user records and best scores with an ordered rank index.
// Dependencies: ladder-core, rusqlite, serde, thiserror, uuid
// ============================================================================

//! ## Overview
//! This module implements both Ladder store interfaces over one embedded
//! `SQLite` database: `users` is the system of record for identity, and
//! `best_scores` holds at most one row per user with a `(score DESC,
//! user_id ASC)` index backing the descending enumeration. The store fails
//! closed on unknown schema versions and invalid configuration.
//!
//! `set_best_score` is an unconditional upsert; the monotonic best-score
//! policy lives in the ranking engine, not here. Writing an equal score
//! touches the row again rather than being elided.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use ladder_core::IdentityError;
use ladder_core::IdentityStore;
use ladder_core::ScoreEntry;
use ladder_core::ScoreStore;
use ladder_core::ScoreStoreError;
use ladder_core::User;
use ladder_core::UserId;
use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use rusqlite::params_from_iter;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Upper bound on the resolve batch to keep the `IN` clause sane.
const MAX_RESOLVE_BATCH: usize = 10_000;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteJournalMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteJournalMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Returns the default busy timeout in milliseconds.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// `SQLite` store configuration.
///
/// # Invariants
/// - `path` points at a writable database file location.
/// - `busy_timeout_ms` is non-zero after validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteStoreConfig {
    /// Database file path.
    pub path: PathBuf,
    /// Journal mode pragma.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
    /// Synchronous mode pragma.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl SqliteStoreConfig {
    /// Creates a config with defaults for the given database path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            journal_mode: SqliteJournalMode::default(),
            sync_mode: SqliteSyncMode::default(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    /// Validates runtime limits, failing closed on nonsense values.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Invalid`] when a limit is out of range.
    pub fn validate(&self) -> Result<(), SqliteStoreError> {
        if self.busy_timeout_ms == 0 {
            return Err(SqliteStoreError::Invalid(
                "busy_timeout_ms must be non-zero".to_string(),
            ));
        }
        if self.path.as_os_str().is_empty() {
            return Err(SqliteStoreError::Invalid("path must not be empty".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding credential material.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data or configuration.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Uniqueness conflict.
    #[error("sqlite store conflict: {0}")]
    Conflict(String),
}

impl From<SqliteStoreError> for ScoreStoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) | SqliteStoreError::Conflict(message) => {
                Self::Store(message)
            }
            SqliteStoreError::VersionMismatch(message) | SqliteStoreError::Invalid(message) => {
                Self::Invalid(message)
            }
        }
    }
}

impl From<SqliteStoreError> for IdentityError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Conflict(message) => Self::Conflict(message),
            SqliteStoreError::VersionMismatch(message) | SqliteStoreError::Invalid(message) => {
                Self::Invalid(message)
            }
        }
    }
}

/// Maps a rusqlite error, classifying uniqueness violations as conflicts.
fn map_db_error(err: &rusqlite::Error) -> SqliteStoreError {
    if let rusqlite::Error::SqliteFailure(failure, _) = err
        && failure.code == ErrorCode::ConstraintViolation
    {
        return SqliteStoreError::Conflict(err.to_string());
    }
    SqliteStoreError::Db(err.to_string())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed identity and score store.
///
/// # Invariants
/// - Connection access is serialized through a mutex.
/// - `best_scores` holds at most one row per user.
#[derive(Debug)]
pub struct SqliteGameStore {
    /// Serialized `SQLite` connection.
    connection: Mutex<Connection>,
}

impl SqliteGameStore {
    /// Opens (or creates) the database and initializes the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the config is invalid, the database
    /// cannot be opened, or the on-disk schema version is unsupported.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        config.validate()?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Opens an in-memory database, mainly for tests.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened.
    pub fn in_memory() -> Result<Self, SqliteStoreError> {
        let mut connection =
            Connection::open_in_memory().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Locks the connection, surfacing poisoning as a store error.
    fn locked(&self) -> Result<std::sync::MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("sqlite connection mutex poisoned".to_string()))
    }

    /// Runs a cheap liveness query against the connection.
    fn check_connection(&self) -> Result<(), SqliteStoreError> {
        let guard = self.locked()?;
        guard
            .query_row("SELECT 1", params![], |_| Ok(()))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))
    }
}

/// Opens the database connection with the configured pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS users (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    password_hash TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS best_scores (
                    user_id TEXT PRIMARY KEY,
                    score REAL NOT NULL CHECK (score >= 0)
                );
                CREATE INDEX IF NOT EXISTS idx_best_scores_rank
                    ON best_scores (score DESC, user_id ASC);",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(found) if found == SCHEMA_VERSION => {}
        Some(found) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "found schema version {found}, expected {SCHEMA_VERSION}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

// ============================================================================
// SECTION: Identity Store Impl
// ============================================================================

impl IdentityStore for SqliteGameStore {
    fn create(&self, name: &str, password_hash: &str) -> Result<User, IdentityError> {
        if name.is_empty() {
            return Err(IdentityError::Invalid("name must not be empty".to_string()));
        }
        let id = Uuid::new_v4().to_string();
        let guard = self.locked()?;
        guard
            .execute(
                "INSERT INTO users (id, name, password_hash) VALUES (?1, ?2, ?3)",
                params![id, name, password_hash],
            )
            .map_err(|err| IdentityError::from(map_db_error(&err)))?;
        Ok(User {
            id: UserId::new(id),
            name: name.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    fn get_by_name(&self, name: &str) -> Result<Option<User>, IdentityError> {
        let guard = self.locked()?;
        guard
            .query_row(
                "SELECT id, name, password_hash FROM users WHERE name = ?1",
                params![name],
                |row| {
                    Ok(User {
                        id: UserId::new(row.get::<_, String>(0)?),
                        name: row.get(1)?,
                        password_hash: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|err| IdentityError::Store(err.to_string()))
    }

    fn exists(&self, user_id: &UserId) -> Result<bool, IdentityError> {
        let guard = self.locked()?;
        let found: Option<i64> = guard
            .query_row("SELECT 1 FROM users WHERE id = ?1", params![user_id.as_str()], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|err| IdentityError::Store(err.to_string()))?;
        Ok(found.is_some())
    }

    fn exists_by_name(&self, name: &str) -> Result<bool, IdentityError> {
        let guard = self.locked()?;
        let found: Option<i64> = guard
            .query_row("SELECT 1 FROM users WHERE name = ?1", params![name], |row| row.get(0))
            .optional()
            .map_err(|err| IdentityError::Store(err.to_string()))?;
        Ok(found.is_some())
    }

    fn resolve_many(&self, user_ids: &[UserId]) -> Result<Vec<User>, IdentityError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        if user_ids.len() > MAX_RESOLVE_BATCH {
            return Err(IdentityError::Invalid(format!(
                "resolve batch too large: {} ids (max {MAX_RESOLVE_BATCH})",
                user_ids.len()
            )));
        }

        let placeholders = vec!["?"; user_ids.len()].join(", ");
        let sql =
            format!("SELECT id, name, password_hash FROM users WHERE id IN ({placeholders})");
        let guard = self.locked()?;
        let mut statement =
            guard.prepare(&sql).map_err(|err| IdentityError::Store(err.to_string()))?;
        let rows = statement
            .query_map(params_from_iter(user_ids.iter().map(UserId::as_str)), |row| {
                Ok(User {
                    id: UserId::new(row.get::<_, String>(0)?),
                    name: row.get(1)?,
                    password_hash: row.get(2)?,
                })
            })
            .map_err(|err| IdentityError::Store(err.to_string()))?;

        let mut users = Vec::with_capacity(user_ids.len());
        for row in rows {
            users.push(row.map_err(|err| IdentityError::Store(err.to_string()))?);
        }
        Ok(users)
    }

    fn readiness(&self) -> Result<(), IdentityError> {
        self.check_connection().map_err(IdentityError::from)
    }
}

// ============================================================================
// SECTION: Score Store Impl
// ============================================================================

impl ScoreStore for SqliteGameStore {
    fn best_score(&self, user_id: &UserId) -> Result<Option<ScoreEntry>, ScoreStoreError> {
        let guard = self.locked().map_err(ScoreStoreError::from)?;
        guard
            .query_row(
                "SELECT score FROM best_scores WHERE user_id = ?1",
                params![user_id.as_str()],
                |row| row.get::<_, f64>(0),
            )
            .optional()
            .map_err(|err| ScoreStoreError::Store(err.to_string()))
            .map(|score| {
                score.map(|score| ScoreEntry {
                    user_id: user_id.clone(),
                    score,
                })
            })
    }

    fn set_best_score(&self, user_id: &UserId, score: f64) -> Result<(), ScoreStoreError> {
        if !score.is_finite() || score < 0.0 {
            return Err(ScoreStoreError::Invalid(format!(
                "score must be finite and non-negative, got {score}"
            )));
        }
        let guard = self.locked().map_err(ScoreStoreError::from)?;
        guard
            .execute(
                "INSERT INTO best_scores (user_id, score) VALUES (?1, ?2)
                 ON CONFLICT (user_id) DO UPDATE SET score = excluded.score",
                params![user_id.as_str(), score],
            )
            .map_err(|err| ScoreStoreError::Store(err.to_string()))?;
        Ok(())
    }

    fn scores_descending(&self) -> Result<Vec<ScoreEntry>, ScoreStoreError> {
        let guard = self.locked().map_err(ScoreStoreError::from)?;
        let mut statement = guard
            .prepare("SELECT user_id, score FROM best_scores ORDER BY score DESC, user_id ASC")
            .map_err(|err| ScoreStoreError::Store(err.to_string()))?;
        let rows = statement
            .query_map(params![], |row| {
                Ok(ScoreEntry {
                    user_id: UserId::new(row.get::<_, String>(0)?),
                    score: row.get(1)?,
                })
            })
            .map_err(|err| ScoreStoreError::Store(err.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|err| ScoreStoreError::Store(err.to_string()))?);
        }
        Ok(entries)
    }

    fn readiness(&self) -> Result<(), ScoreStoreError> {
        self.check_connection().map_err(ScoreStoreError::from)
    }
}
