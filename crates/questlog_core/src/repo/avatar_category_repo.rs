//! Per-category experience repository contract and SQLite implementation.
//!
//! # Invariants
//! - Experience changes are applied as relative deltas in SQL, so the stored
//!   total is never overwritten from a stale read.

use crate::model::avatar::AvatarId;
use crate::model::category::{AvatarCategory, CategoryId};
use crate::repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for `avatar_category` running totals.
pub trait AvatarCategoryRepository {
    fn get_avatar_category(
        &self,
        avatar_id: AvatarId,
        category_id: CategoryId,
    ) -> RepoResult<Option<AvatarCategory>>;
    /// Lists `(category name, exp points)` for every row owned by the avatar.
    fn list_experience_by_category(&self, avatar_id: AvatarId) -> RepoResult<Vec<(String, i64)>>;
    /// Adds `delta` to the stored total and returns the new total.
    ///
    /// Returns `None` when no row exists for the pair.
    fn add_experience(
        &self,
        avatar_id: AvatarId,
        category_id: CategoryId,
        delta: i64,
    ) -> RepoResult<Option<i64>>;
}

/// SQLite-backed avatar/category experience repository.
pub struct SqliteAvatarCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAvatarCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AvatarCategoryRepository for SqliteAvatarCategoryRepository<'_> {
    fn get_avatar_category(
        &self,
        avatar_id: AvatarId,
        category_id: CategoryId,
    ) -> RepoResult<Option<AvatarCategory>> {
        let row = self
            .conn
            .query_row(
                "SELECT avatar_id, category_id, exp_points
                 FROM avatar_category
                 WHERE avatar_id = ?1 AND category_id = ?2;",
                params![avatar_id, category_id],
                |row| {
                    Ok(AvatarCategory {
                        avatar_id: row.get("avatar_id")?,
                        category_id: row.get("category_id")?,
                        exp_points: row.get("exp_points")?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn list_experience_by_category(&self, avatar_id: AvatarId) -> RepoResult<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.category_name, ac.exp_points
             FROM avatar_category ac
             INNER JOIN categories c ON c.id = ac.category_id
             WHERE ac.avatar_id = ?1
             ORDER BY c.id ASC;",
        )?;
        let mut rows = stmt.query([avatar_id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push((row.get(0)?, row.get(1)?));
        }
        Ok(entries)
    }

    fn add_experience(
        &self,
        avatar_id: AvatarId,
        category_id: CategoryId,
        delta: i64,
    ) -> RepoResult<Option<i64>> {
        let changed = self.conn.execute(
            "UPDATE avatar_category
             SET exp_points = exp_points + ?3
             WHERE avatar_id = ?1 AND category_id = ?2;",
            params![avatar_id, category_id, delta],
        )?;
        if changed == 0 {
            return Ok(None);
        }

        Ok(self
            .get_avatar_category(avatar_id, category_id)?
            .map(|row| row.exp_points))
    }
}
