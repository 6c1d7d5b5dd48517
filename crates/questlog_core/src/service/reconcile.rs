//! Experience reconciliation policy.
//!
//! # Responsibility
//! - Translate a quest's completion state into a per-category experience delta.
//! - Apply that delta to the avatar's running total for the quest category.
//!
//! # Invariants
//! - Completed quests contribute `+exp_amount`, uncompleted ones `-exp_amount`.
//! - The running total is adjusted incrementally and never recomputed, so one
//!   missed or duplicated application leaves it permanently off by the reward.

use crate::model::quest::{Quest, QuestValidationError};
use crate::repo::avatar_category_repo::{AvatarCategoryRepository, SqliteAvatarCategoryRepository};
use crate::repo::RepoResult;
use rusqlite::Connection;

/// Returns the experience change implied by a quest's current completion flag.
///
/// `None` when withdrawing `exp_amount` is not representable (`i64::MIN`).
pub fn experience_delta(completed: bool, exp_amount: i64) -> Option<i64> {
    if completed {
        Some(exp_amount)
    } else {
        exp_amount.checked_neg()
    }
}

/// Applies the delta for `quest` as currently stored.
///
/// Returns the new category total, or `None` when the avatar has no
/// `avatar_category` row for the quest category (nothing is written then).
/// A stored reward of `i64::MIN` fails with `RewardOutOfRange` before any write.
pub(crate) fn apply_quest_experience(conn: &Connection, quest: &Quest) -> RepoResult<Option<i64>> {
    let delta = experience_delta(quest.completed, quest.exp_amount)
        .ok_or(QuestValidationError::RewardOutOfRange)?;
    SqliteAvatarCategoryRepository::new(conn).add_experience(
        quest.avatar_id,
        quest.category_id,
        delta,
    )
}
