// crates/ladder-config/src/config.rs
// ============================================================================
// Module: Ladder Configuration
// Description: Configuration loading and validation for the Ladder backend.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: ladder-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits. Missing
//! or invalid configuration fails closed. The auth secret may be supplied
//! via environment variable instead of the file so it never has to live on
//! disk.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::Ipv4Addr;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use ladder_store_sqlite::SqliteStoreConfig;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "ladder.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "LADDER_CONFIG";
/// Environment variable overriding the auth secret.
pub(crate) const AUTH_SECRET_ENV_VAR: &str = "LADDER_AUTH_SECRET";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Minimum auth secret length in bytes.
pub(crate) const MIN_AUTH_SECRET_LENGTH: usize = 32;
/// Maximum request body size the server will accept.
const MAX_BODY_BYTES_CEILING: usize = 16 * 1024 * 1024;
/// Maximum token lifetime in seconds (30 days).
const MAX_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Returns the default server bind address.
fn default_bind_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 8080))
}

/// Returns the default maximum request body size.
const fn default_max_body_bytes() -> usize {
    64 * 1024
}

/// Returns the default token lifetime in seconds (24 hours).
const fn default_token_ttl_secs() -> u64 {
    24 * 60 * 60
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Messages never echo secret material.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file exceeds the size limit.
    #[error("config file too large: {actual} bytes (max {max})")]
    TooLarge {
        /// Maximum allowed bytes.
        max: usize,
        /// Actual file size in bytes.
        actual: usize,
    },
    /// Config file failed to parse.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config failed validation.
    #[error("config invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// HTTP server configuration.
///
/// # Invariants
/// - `max_body_bytes` is non-zero and bounded after validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Authentication configuration.
///
/// # Invariants
/// - `secret` is at least [`MIN_AUTH_SECRET_LENGTH`] bytes after validation.
/// - `token_ttl_secs` is non-zero and bounded after validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC secret for session tokens. May be omitted from the file and
    /// supplied via `LADDER_AUTH_SECRET` instead.
    #[serde(default)]
    pub secret: String,
    /// Session token lifetime in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_ttl_secs: default_token_ttl_secs(),
        }
    }
}

/// Top-level Ladder configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LadderConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Durable store settings.
    pub store: SqliteStoreConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
}

impl LadderConfig {
    /// Loads configuration from the given path, the `LADDER_CONFIG`
    /// environment variable, or `ladder.toml` in the working directory.
    ///
    /// The auth secret is overridden by `LADDER_AUTH_SECRET` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved: PathBuf = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => env::var(CONFIG_ENV_VAR)
                .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from),
        };

        let metadata = fs::metadata(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        let actual = usize::try_from(metadata.len())
            .map_err(|_| ConfigError::Io("config file size overflow".to_string()))?;
        if actual > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                max: MAX_CONFIG_FILE_SIZE,
                actual,
            });
        }

        let contents =
            fs::read_to_string(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        let mut config: Self =
            toml::from_str(&contents).map_err(|err| ConfigError::Parse(err.to_string()))?;

        if let Ok(secret) = env::var(AUTH_SECRET_ENV_VAR) {
            config.auth.secret = secret;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string without touching the
    /// filesystem or environment. Mainly for tests.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration, failing closed on unsafe values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when any field is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.secret.len() < MIN_AUTH_SECRET_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "auth secret must be at least {MIN_AUTH_SECRET_LENGTH} bytes"
            )));
        }
        if self.auth.token_ttl_secs == 0 || self.auth.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "token_ttl_secs must be in 1..={MAX_TOKEN_TTL_SECS}"
            )));
        }
        if self.server.max_body_bytes == 0 || self.server.max_body_bytes > MAX_BODY_BYTES_CEILING {
            return Err(ConfigError::Invalid(format!(
                "max_body_bytes must be in 1..={MAX_BODY_BYTES_CEILING}"
            )));
        }
        self.store.validate().map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Ok(())
    }
}
