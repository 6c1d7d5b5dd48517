//! Default data bootstrap.
//!
//! # Responsibility
//! - Guarantee the single placeholder avatar exists.
//! - Guarantee every default category exists.
//! - Guarantee one `avatar_category` row per (avatar, category) pair.
//!
//! # Invariants
//! - Seeding is idempotent: repeated runs create nothing new.
//! - All three steps run in one transaction.

use super::DbResult;
use log::info;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::Serialize;

/// Placeholder name given to the avatar created on first startup.
pub const DEFAULT_AVATAR_NAME: &str = "Unknown";
/// Category names seeded on first startup.
pub const DEFAULT_CATEGORIES: &[&str] = &["wisdom", "constitution", "reflexion", "family"];

/// Counts of rows created by one `seed_defaults` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub avatar_created: bool,
    pub categories_created: usize,
    pub avatar_categories_created: usize,
}

impl SeedReport {
    /// Returns whether this run changed nothing.
    pub fn is_noop(&self) -> bool {
        !self.avatar_created && self.categories_created == 0 && self.avatar_categories_created == 0
    }
}

/// Seeds the avatar, default categories and avatar/category join rows.
pub fn seed_defaults(conn: &mut Connection) -> DbResult<SeedReport> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut report = SeedReport::default();

    let existing_avatar: Option<i64> = tx
        .query_row("SELECT id FROM avatar ORDER BY id ASC LIMIT 1;", [], |row| {
            row.get(0)
        })
        .optional()?;
    let avatar_id = match existing_avatar {
        Some(id) => id,
        None => {
            tx.execute(
                "INSERT INTO avatar (name, level, experience) VALUES (?1, 0, 0);",
                [DEFAULT_AVATAR_NAME],
            )?;
            report.avatar_created = true;
            tx.last_insert_rowid()
        }
    };

    for name in DEFAULT_CATEGORIES {
        report.categories_created += tx.execute(
            "INSERT OR IGNORE INTO categories (category_name) VALUES (?1);",
            [name],
        )?;
    }

    report.avatar_categories_created = tx.execute(
        "INSERT OR IGNORE INTO avatar_category (avatar_id, category_id, exp_points)
         SELECT ?1, id, 0
         FROM categories;",
        params![avatar_id],
    )?;

    tx.commit()?;

    info!(
        "event=db_seed module=db status=ok avatar_id={} avatar_created={} categories_created={} avatar_categories_created={}",
        avatar_id,
        report.avatar_created,
        report.categories_created,
        report.avatar_categories_created
    );
    Ok(report)
}
