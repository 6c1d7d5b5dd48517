//! Avatar repository contract and SQLite implementation.

use crate::model::avatar::{Avatar, AvatarId};
use crate::repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension, Row};

const AVATAR_SELECT_SQL: &str = "SELECT id, name, level, experience FROM avatar";

/// Repository interface for the avatar profile.
pub trait AvatarRepository {
    /// Returns the avatar with the lowest id, if any was seeded.
    fn first_avatar(&self) -> RepoResult<Option<Avatar>>;
    fn get_avatar(&self, id: AvatarId) -> RepoResult<Option<Avatar>>;
    /// Renames one avatar. Returns `false` when the id does not exist.
    fn rename_avatar(&self, id: AvatarId, name: &str) -> RepoResult<bool>;
}

/// SQLite-backed avatar repository.
pub struct SqliteAvatarRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAvatarRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AvatarRepository for SqliteAvatarRepository<'_> {
    fn first_avatar(&self) -> RepoResult<Option<Avatar>> {
        let avatar = self
            .conn
            .query_row(
                &format!("{AVATAR_SELECT_SQL} ORDER BY id ASC LIMIT 1;"),
                [],
                parse_avatar_row,
            )
            .optional()?;
        Ok(avatar)
    }

    fn get_avatar(&self, id: AvatarId) -> RepoResult<Option<Avatar>> {
        let avatar = self
            .conn
            .query_row(
                &format!("{AVATAR_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_avatar_row,
            )
            .optional()?;
        Ok(avatar)
    }

    fn rename_avatar(&self, id: AvatarId, name: &str) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE avatar SET name = ?2 WHERE id = ?1;",
            params![id, name],
        )?;
        Ok(changed > 0)
    }
}

fn parse_avatar_row(row: &Row<'_>) -> rusqlite::Result<Avatar> {
    Ok(Avatar {
        id: row.get("id")?,
        name: row.get("name")?,
        level: row.get("level")?,
        experience: row.get("experience")?,
    })
}
