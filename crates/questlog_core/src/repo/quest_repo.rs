//! Quest repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/toggle/delete APIs over `quests`.
//! - Build the joined `QuestSummary` read model with search and sort options.
//!
//! # Invariants
//! - Write paths call `NewQuest::validate()` before SQL mutations.
//! - Summary lists are always ordered deterministically (ties break on id).

use crate::model::avatar::AvatarId;
use crate::model::quest::{NewQuest, Quest, QuestId, QuestSummary};
use crate::repo::{bool_to_int, parse_bool_column, RepoResult};
use rusqlite::{params, Connection, Row};

const QUEST_SELECT_SQL: &str = "SELECT
    id,
    avatar_id,
    category_id,
    quest_name,
    due_date,
    exp_amount,
    completed
FROM quests";

const QUEST_SUMMARY_SELECT_SQL: &str = "SELECT
    q.id AS id,
    q.quest_name AS quest_name,
    q.category_id AS category_id,
    c.category_name AS category_name,
    q.due_date AS due_date,
    q.exp_amount AS exp_amount,
    q.completed AS completed
FROM quests q
INNER JOIN categories c ON c.id = q.category_id";

/// Sort key for quest lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestSort {
    /// Creation order.
    #[default]
    Id,
    /// Earliest due date first; quests without a date come last.
    DueDate,
    /// Smallest experience reward first.
    Experience,
}

/// Query options for listing an avatar's quests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestListQuery {
    /// Case-insensitive substring matched against title or category name.
    pub search: Option<String>,
    pub sort: QuestSort,
}

/// Repository interface for quest persistence.
pub trait QuestRepository {
    fn create_quest(&self, quest: &NewQuest) -> RepoResult<QuestId>;
    fn get_quest(&self, id: QuestId) -> RepoResult<Option<Quest>>;
    fn get_quest_summary(&self, id: QuestId) -> RepoResult<Option<QuestSummary>>;
    fn list_quest_summaries(
        &self,
        avatar_id: AvatarId,
        query: &QuestListQuery,
    ) -> RepoResult<Vec<QuestSummary>>;
    /// Stores the completed flag. Returns `false` when the quest does not exist.
    fn set_completed(&self, id: QuestId, completed: bool) -> RepoResult<bool>;
    /// Hard-deletes one quest. Returns `false` when the quest does not exist.
    fn delete_quest(&self, id: QuestId) -> RepoResult<bool>;
}

/// SQLite-backed quest repository.
pub struct SqliteQuestRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuestRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl QuestRepository for SqliteQuestRepository<'_> {
    fn create_quest(&self, quest: &NewQuest) -> RepoResult<QuestId> {
        quest.validate()?;

        self.conn.execute(
            "INSERT INTO quests (
                avatar_id,
                quest_name,
                category_id,
                completed,
                exp_amount,
                due_date
            ) VALUES (?1, ?2, ?3, 0, ?4, ?5);",
            params![
                quest.avatar_id,
                quest.title.as_str(),
                quest.category_id,
                quest.exp_amount,
                quest.due_date,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_quest(&self, id: QuestId) -> RepoResult<Option<Quest>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QUEST_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_quest_row(row)?));
        }
        Ok(None)
    }

    fn get_quest_summary(&self, id: QuestId) -> RepoResult<Option<QuestSummary>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QUEST_SUMMARY_SELECT_SQL} WHERE q.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_summary_row(row)?));
        }
        Ok(None)
    }

    fn list_quest_summaries(
        &self,
        avatar_id: AvatarId,
        query: &QuestListQuery,
    ) -> RepoResult<Vec<QuestSummary>> {
        let order_by = match query.sort {
            QuestSort::Id => "q.id ASC",
            QuestSort::DueDate => "q.due_date IS NULL, q.due_date ASC, q.id ASC",
            QuestSort::Experience => "q.exp_amount ASC, q.id ASC",
        };
        let mut stmt = self.conn.prepare(&format!(
            "{QUEST_SUMMARY_SELECT_SQL} WHERE q.avatar_id = ?1 ORDER BY {order_by};"
        ))?;
        let needle = query.search.as_deref().and_then(normalize_search);

        let mut rows = stmt.query([avatar_id])?;
        let mut quests = Vec::new();
        while let Some(row) = rows.next()? {
            let quest = parse_summary_row(row)?;
            if needle
                .as_deref()
                .map_or(true, |needle| matches_search(&quest, needle))
            {
                quests.push(quest);
            }
        }
        Ok(quests)
    }

    fn set_completed(&self, id: QuestId, completed: bool) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE quests SET completed = ?2 WHERE id = ?1;",
            params![id, bool_to_int(completed)],
        )?;
        Ok(changed > 0)
    }

    fn delete_quest(&self, id: QuestId) -> RepoResult<bool> {
        let changed = self.conn.execute("DELETE FROM quests WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

/// Normalizes free-text search input; blank input disables the filter.
fn normalize_search(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

// SQLite `lower()` only folds ASCII, so both sides are folded here instead.
fn matches_search(quest: &QuestSummary, needle: &str) -> bool {
    quest.title.to_lowercase().contains(needle)
        || quest.category_name.to_lowercase().contains(needle)
}

fn parse_quest_row(row: &Row<'_>) -> RepoResult<Quest> {
    Ok(Quest {
        id: row.get("id")?,
        avatar_id: row.get("avatar_id")?,
        category_id: row.get("category_id")?,
        title: row.get("quest_name")?,
        due_date: row.get("due_date")?,
        exp_amount: row.get("exp_amount")?,
        completed: parse_bool_column(row.get("completed")?, "quests.completed")?,
    })
}

fn parse_summary_row(row: &Row<'_>) -> RepoResult<QuestSummary> {
    Ok(QuestSummary {
        id: row.get("id")?,
        title: row.get("quest_name")?,
        category_id: row.get("category_id")?,
        category_name: row.get("category_name")?,
        due_date: row.get("due_date")?,
        exp_amount: row.get("exp_amount")?,
        completed: parse_bool_column(row.get("completed")?, "quests.completed")?,
    })
}
