//! Store configuration.
//!
//! # Responsibility
//! - Parse the single connection string that names the note store.
//! - Resolve the connection string from flag, environment or default.
//!
//! # Invariants
//! - Only SQLite locations are accepted; other schemes are rejected early
//!   instead of failing later at open time.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Environment variable holding the connection string.
pub const DB_URL_ENV: &str = "QUICKNOTE_DB_URL";

const DEFAULT_DB_FILE_NAME: &str = "quicknote.sqlite3";
const MEMORY_FORMS: &[&str] = &["sqlite::memory:", ":memory:", "sqlite://:memory:"];

/// Where the note store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Process-private in-memory database.
    Memory,
    /// Database file on disk. Created on first open.
    File(PathBuf),
}

impl Display for StoreLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "sqlite::memory:"),
            Self::File(path) => write!(f, "sqlite://{}", path.display()),
        }
    }
}

/// Parsed store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
}

impl StoreConfig {
    /// Parses a connection string.
    ///
    /// Accepted forms:
    /// - `sqlite::memory:` / `:memory:`
    /// - `sqlite://<path>` / `sqlite:<path>`
    /// - a bare filesystem path
    ///
    /// # Errors
    /// - `Empty` for blank input.
    /// - `UnsupportedScheme` for any other `<scheme>:` prefix. A single
    ///   letter before `:` is a drive letter, not a scheme; a bare path
    ///   whose first segment contains `:` needs a `./` or `sqlite:` prefix.
    /// - `MissingPath` for `sqlite://` with nothing after it.
    pub fn from_connection_string(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Empty);
        }

        if MEMORY_FORMS.contains(&trimmed) {
            return Ok(Self::memory());
        }

        if let Some(rest) = trimmed
            .strip_prefix("sqlite://")
            .or_else(|| trimmed.strip_prefix("sqlite:"))
        {
            if rest.is_empty() {
                return Err(ConfigError::MissingPath(trimmed.to_string()));
            }
            return Ok(Self::file(rest));
        }

        if let Some(scheme) = url_scheme(trimmed) {
            return Err(ConfigError::UnsupportedScheme(scheme.to_string()));
        }

        Ok(Self::file(trimmed))
    }

    /// Resolves configuration from `QUICKNOTE_DB_URL`, falling back to
    /// [`StoreConfig::default_file`] when the variable is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(DB_URL_ENV) {
            Ok(raw) if !raw.trim().is_empty() => Self::from_connection_string(&raw),
            _ => Ok(Self::default_file()),
        }
    }

    /// `<tmp>/quicknote.sqlite3`.
    pub fn default_file() -> Self {
        Self {
            location: StoreLocation::File(std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
        }
    }

    pub fn memory() -> Self {
        Self {
            location: StoreLocation::Memory,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
        }
    }
}

/// Returns the URL scheme of `raw`, if it starts with one.
///
/// Single-letter prefixes such as `C:` are treated as drive letters.
fn url_scheme(raw: &str) -> Option<&str> {
    let (scheme, _) = raw.split_once(':')?;
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|ch| ch.is_ascii_alphabetic());
    let rest_valid = chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '.'));
    (starts_alpha && rest_valid && scheme.len() > 1).then_some(scheme)
}

/// Connection-string parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Empty,
    UnsupportedScheme(String),
    MissingPath(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "connection string cannot be empty"),
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "unsupported store scheme `{scheme}`; expected sqlite://<path> or sqlite::memory:"
            ),
            Self::MissingPath(raw) => write!(f, "connection string `{raw}` names no database path"),
        }
    }
}

impl Error for ConfigError {}
