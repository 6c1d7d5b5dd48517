//! Table creation for the quest log database.
//!
//! # Invariants
//! - `PRAGMA user_version` is `0` on a fresh file and [`SCHEMA_VERSION`] once
//!   the tables exist.
//! - `schema.sql` only uses `IF NOT EXISTS`, so files written by builds that
//!   never recorded a version are adopted as is.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates missing tables and stamps the version, in one transaction.
pub(crate) fn create_schema(conn: &mut Connection) -> DbResult<()> {
    match schema_version(conn)? {
        SCHEMA_VERSION => Ok(()),
        found if found > SCHEMA_VERSION => Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: SCHEMA_VERSION,
        }),
        found => {
            let tx = conn.transaction()?;
            tx.execute_batch(SCHEMA_SQL)?;
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tx.commit()?;
            info!(
                "event=db_schema module=db status=ok from_version={found} to_version={SCHEMA_VERSION}"
            );
            Ok(())
        }
    }
}

/// Reads the version stamped in the database header.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}
