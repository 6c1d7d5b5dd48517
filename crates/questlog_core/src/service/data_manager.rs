//! Data access facade for presentation callers.
//!
//! # Responsibility
//! - Expose the avatar/category/quest operations the UI calls.
//! - Give every operation its own transaction scope over one owned connection.
//! - Report not-found and storage failures as local values plus a log line.
//!
//! # Invariants
//! - A `Transaction` that is not committed rolls back when dropped, so every
//!   early return and error path leaves storage untouched.
//! - `swap_quest_status` and `update_experience` are separate transactions;
//!   callers must run them in that order. `toggle_quest_completion` does both
//!   in one transaction.
//! - `remove_quest` never adjusts experience; `remove_quest_reconciled` does.
//! - No locking: two handles toggling the same quest concurrently may
//!   interleave between the two-step calls.

use crate::db::{open_db, open_db_in_memory, seed_defaults, DbError, SeedReport};
use crate::model::avatar::{Avatar, AvatarId};
use crate::model::category::{Category, CategoryId};
use crate::model::quest::{parse_due_date, NewQuest, QuestId, QuestSummary, QuestValidationError};
use crate::repo::avatar_category_repo::{AvatarCategoryRepository, SqliteAvatarCategoryRepository};
use crate::repo::avatar_repo::{AvatarRepository, SqliteAvatarRepository};
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::quest_repo::{QuestListQuery, QuestRepository, SqliteQuestRepository};
use crate::repo::RepoError;
use crate::service::reconcile::apply_quest_experience;
use log::{error, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type DataResult<T> = Result<T, DataError>;

/// Error returned by `DataManager` operations.
#[derive(Debug)]
pub enum DataError {
    AvatarNotFound(AvatarId),
    /// No category carries this exact name.
    CategoryNotFound(String),
    QuestNotFound(QuestId),
    /// The avatar has no experience row for the quest category.
    AvatarCategoryNotFound {
        avatar_id: AvatarId,
        category_id: CategoryId,
    },
    /// Due date input is not `YYYY-MM-DD`.
    InvalidDueDate(String),
    Validation(QuestValidationError),
    /// Storage failure; the in-flight transaction was rolled back.
    Repo(RepoError),
}

impl DataError {
    /// Returns whether this error reports a missing row rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AvatarNotFound(_)
                | Self::CategoryNotFound(_)
                | Self::QuestNotFound(_)
                | Self::AvatarCategoryNotFound { .. }
        )
    }

    fn code(&self) -> &'static str {
        match self {
            Self::AvatarNotFound(_) => "avatar_not_found",
            Self::CategoryNotFound(_) => "category_not_found",
            Self::QuestNotFound(_) => "quest_not_found",
            Self::AvatarCategoryNotFound { .. } => "avatar_category_not_found",
            Self::InvalidDueDate(_) => "invalid_due_date",
            Self::Validation(_) => "validation_failed",
            Self::Repo(_) => "storage_failed",
        }
    }
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AvatarNotFound(id) => write!(f, "avatar not found: {id}"),
            Self::CategoryNotFound(name) => write!(f, "category not found: `{name}`"),
            Self::QuestNotFound(id) => write!(f, "quest not found: {id}"),
            Self::AvatarCategoryNotFound {
                avatar_id,
                category_id,
            } => write!(
                f,
                "no experience row for avatar {avatar_id} in category {category_id}"
            ),
            Self::InvalidDueDate(value) => {
                write!(f, "invalid due date `{value}`; expected YYYY-MM-DD")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for DataError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<DbError> for DataError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

impl From<rusqlite::Error> for DataError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

impl From<QuestValidationError> for DataError {
    fn from(value: QuestValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Outcome of an atomic completion toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestToggle {
    /// Quest state after the toggle.
    pub quest: QuestSummary,
    /// Category experience total after reconciliation.
    pub category_exp: i64,
}

/// Storage context handed to the presentation layer.
///
/// Owns one SQLite connection; each method acquires and releases its own
/// transaction on it.
pub struct DataManager {
    conn: Connection,
}

impl DataManager {
    /// Wraps an already initialized connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens the database file, creates missing tables and seeds defaults.
    pub fn open(path: impl AsRef<Path>) -> DataResult<Self> {
        let mut manager = Self::new(open_db(path)?);
        manager.seed_defaults()?;
        Ok(manager)
    }

    /// In-memory variant of [`DataManager::open`].
    pub fn open_in_memory() -> DataResult<Self> {
        let mut manager = Self::new(open_db_in_memory()?);
        manager.seed_defaults()?;
        Ok(manager)
    }

    /// Borrows the underlying connection for diagnostics.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Ensures the avatar, default categories and experience rows exist.
    pub fn seed_defaults(&mut self) -> DataResult<SeedReport> {
        seed_defaults(&mut self.conn).map_err(|err| log_failure("db_seed", err.into()))
    }

    /// Returns the single avatar, or `None` before seeding.
    pub fn get_avatar(&self) -> DataResult<Option<Avatar>> {
        self.read("avatar_get", |conn| {
            Ok(SqliteAvatarRepository::new(conn).first_avatar()?)
        })
    }

    /// Renames the avatar.
    ///
    /// Returns `false` without writing when the avatar does not exist. A blank
    /// name leaves the stored name unchanged and still returns `true`.
    pub fn update_avatar_name(&mut self, avatar_id: AvatarId, new_name: &str) -> DataResult<bool> {
        self.write("avatar_rename", |tx| {
            let repo = SqliteAvatarRepository::new(tx);
            let Some(avatar) = repo.get_avatar(avatar_id)? else {
                warn!(
                    "event=avatar_rename module=service status=not_found avatar_id={avatar_id}"
                );
                return Ok(false);
            };

            if new_name.trim().is_empty() {
                warn!(
                    "event=avatar_rename module=service status=skipped avatar_id={avatar_id} reason=blank_name"
                );
                return Ok(true);
            }

            if avatar.name != new_name {
                repo.rename_avatar(avatar_id, new_name)?;
                info!("event=avatar_rename module=service status=ok avatar_id={avatar_id}");
            }
            Ok(true)
        })
    }

    /// Lists all categories ordered by id.
    pub fn get_categories(&self) -> DataResult<Vec<Category>> {
        self.read("category_list", |conn| {
            Ok(SqliteCategoryRepository::new(conn).list_categories()?)
        })
    }

    /// Maps category name to experience for every row the avatar owns.
    ///
    /// Categories without a row are absent; callers default them to zero.
    pub fn get_avatar_experience_by_category(
        &self,
        avatar_id: AvatarId,
    ) -> DataResult<BTreeMap<String, i64>> {
        self.read("experience_by_category", |conn| {
            let entries =
                SqliteAvatarCategoryRepository::new(conn).list_experience_by_category(avatar_id)?;
            Ok(entries.into_iter().collect())
        })
    }

    /// Lists the avatar's quests in creation order.
    pub fn get_avatar_quests(&self, avatar_id: AvatarId) -> DataResult<Vec<QuestSummary>> {
        self.list_quests(avatar_id, &QuestListQuery::default())
    }

    /// Lists the avatar's quests filtered by search text and sorted.
    pub fn list_quests(
        &self,
        avatar_id: AvatarId,
        query: &QuestListQuery,
    ) -> DataResult<Vec<QuestSummary>> {
        self.read("quest_list", |conn| {
            Ok(SqliteQuestRepository::new(conn).list_quest_summaries(avatar_id, query)?)
        })
    }

    /// Creates an uncompleted quest in the named category.
    ///
    /// `due_date` must be `YYYY-MM-DD` when present. Unknown categories and
    /// avatars insert nothing.
    pub fn add_quest(
        &mut self,
        avatar_id: AvatarId,
        title: &str,
        category_name: &str,
        exp_amount: i64,
        due_date: Option<&str>,
    ) -> DataResult<QuestId> {
        self.write("quest_add", |tx| {
            let due_date = match due_date {
                Some(raw) => Some(
                    parse_due_date(raw).map_err(|_| DataError::InvalidDueDate(raw.to_string()))?,
                ),
                None => None,
            };

            if SqliteAvatarRepository::new(tx)
                .get_avatar(avatar_id)?
                .is_none()
            {
                return Err(DataError::AvatarNotFound(avatar_id));
            }

            let category = SqliteCategoryRepository::new(tx)
                .find_category_by_name(category_name)?
                .ok_or_else(|| DataError::CategoryNotFound(category_name.to_string()))?;

            let quest = NewQuest {
                avatar_id,
                category_id: category.id,
                title: title.to_string(),
                due_date,
                exp_amount,
            };
            quest.validate()?;

            let quest_id = SqliteQuestRepository::new(tx).create_quest(&quest)?;
            info!(
                "event=quest_add module=service status=ok quest_id={} avatar_id={} category_id={}",
                quest_id, avatar_id, category.id
            );
            Ok(quest_id)
        })
    }

    /// Deletes one quest without touching experience.
    pub fn remove_quest(&mut self, quest_id: QuestId) -> DataResult<()> {
        self.write("quest_remove", |tx| {
            if !SqliteQuestRepository::new(tx).delete_quest(quest_id)? {
                return Err(DataError::QuestNotFound(quest_id));
            }
            info!("event=quest_remove module=service status=ok quest_id={quest_id}");
            Ok(())
        })
    }

    /// Flips the completed flag and returns the updated quest.
    ///
    /// Returns `None` when the quest does not exist. Experience is left as is;
    /// follow with [`DataManager::update_experience`].
    pub fn swap_quest_status(&mut self, quest_id: QuestId) -> DataResult<Option<QuestSummary>> {
        self.write("quest_swap_status", |tx| {
            let repo = SqliteQuestRepository::new(tx);
            let Some(quest) = repo.get_quest(quest_id)? else {
                warn!(
                    "event=quest_swap_status module=service status=not_found quest_id={quest_id}"
                );
                return Ok(None);
            };

            repo.set_completed(quest_id, !quest.completed)?;
            info!(
                "event=quest_swap_status module=service status=ok quest_id={} completed={}",
                quest_id, !quest.completed
            );
            Ok(repo.get_quest_summary(quest_id)?)
        })
    }

    /// Applies the quest's reward to its category total according to the
    /// stored completed flag, and returns the new total.
    pub fn update_experience(&mut self, quest_id: QuestId) -> DataResult<i64> {
        self.write("experience_update", |tx| {
            let quest = SqliteQuestRepository::new(tx)
                .get_quest(quest_id)?
                .ok_or(DataError::QuestNotFound(quest_id))?;

            let total = apply_quest_experience(tx, &quest)?.ok_or(
                DataError::AvatarCategoryNotFound {
                    avatar_id: quest.avatar_id,
                    category_id: quest.category_id,
                },
            )?;
            info!(
                "event=experience_update module=service status=ok quest_id={} category_id={} exp_points={}",
                quest_id, quest.category_id, total
            );
            Ok(total)
        })
    }

    /// Flips the completed flag and reconciles experience in one transaction.
    ///
    /// Nothing is written when the quest or its experience row is missing.
    pub fn toggle_quest_completion(&mut self, quest_id: QuestId) -> DataResult<QuestToggle> {
        self.write("quest_toggle", |tx| {
            let repo = SqliteQuestRepository::new(tx);
            let mut quest = repo
                .get_quest(quest_id)?
                .ok_or(DataError::QuestNotFound(quest_id))?;

            quest.completed = !quest.completed;
            repo.set_completed(quest_id, quest.completed)?;
            let category_exp = apply_quest_experience(tx, &quest)?.ok_or(
                DataError::AvatarCategoryNotFound {
                    avatar_id: quest.avatar_id,
                    category_id: quest.category_id,
                },
            )?;

            let summary = repo
                .get_quest_summary(quest_id)?
                .ok_or(DataError::QuestNotFound(quest_id))?;
            info!(
                "event=quest_toggle module=service status=ok quest_id={} completed={} exp_points={}",
                quest_id, quest.completed, category_exp
            );
            Ok(QuestToggle {
                quest: summary,
                category_exp,
            })
        })
    }

    /// Deletes one quest after withdrawing its reward if it was completed.
    pub fn remove_quest_reconciled(&mut self, quest_id: QuestId) -> DataResult<()> {
        self.write("quest_remove_reconciled", |tx| {
            let repo = SqliteQuestRepository::new(tx);
            let mut quest = repo
                .get_quest(quest_id)?
                .ok_or(DataError::QuestNotFound(quest_id))?;

            if quest.completed {
                quest.completed = false;
                apply_quest_experience(tx, &quest)?.ok_or(DataError::AvatarCategoryNotFound {
                    avatar_id: quest.avatar_id,
                    category_id: quest.category_id,
                })?;
            }

            repo.delete_quest(quest_id)?;
            info!("event=quest_remove_reconciled module=service status=ok quest_id={quest_id}");
            Ok(())
        })
    }

    fn read<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&Connection) -> DataResult<T>,
    ) -> DataResult<T> {
        let run = || -> DataResult<T> {
            let tx = self.conn.unchecked_transaction()?;
            let value = op(&*tx)?;
            tx.commit()?;
            Ok(value)
        };
        run().map_err(|err| log_failure(event, err))
    }

    fn write<T>(
        &mut self,
        event: &'static str,
        op: impl FnOnce(&Transaction<'_>) -> DataResult<T>,
    ) -> DataResult<T> {
        let run = |conn: &mut Connection| -> DataResult<T> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let value = op(&tx)?;
            tx.commit()?;
            Ok(value)
        };
        run(&mut self.conn).map_err(|err| log_failure(event, err))
    }
}

fn log_failure(event: &'static str, err: DataError) -> DataError {
    if err.is_not_found() {
        warn!(
            "event={} module=service status=not_found error_code={} error={}",
            event,
            err.code(),
            err
        );
    } else {
        error!(
            "event={} module=service status=error error_code={} error={}",
            event,
            err.code(),
            err
        );
    }
    err
}
