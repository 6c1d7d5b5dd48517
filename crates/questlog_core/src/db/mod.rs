//! SQLite storage bootstrap, schema creation and default seeding.
//!
//! # Responsibility
//! - Open and configure SQLite connections for QuestLog core.
//! - Create the avatar/category/quest schema in deterministic order.
//! - Seed the single avatar, the default categories and their join rows.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before `initialize` succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod open;
pub mod schema;
pub mod seed;

pub use open::{initialize, open_db, open_db_in_memory};
pub use schema::{schema_version, SCHEMA_VERSION};
pub use seed::{seed_defaults, SeedReport, DEFAULT_AVATAR_NAME, DEFAULT_CATEGORIES};

/// Environment variable overriding the database file location.
pub const DB_PATH_ENV: &str = "QUESTLOG_DB_PATH";
/// Database file name used when no override is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "app-db.db";

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Resolves the database file path for process startup.
///
/// Uses `QUESTLOG_DB_PATH` when set and non-blank, otherwise `app-db.db`
/// relative to the working directory.
pub fn resolve_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    PathBuf::from(DEFAULT_DB_FILE_NAME)
}
