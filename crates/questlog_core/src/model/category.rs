//! Category and per-category experience models.

use crate::model::avatar::AvatarId;
use serde::{Deserialize, Serialize};

/// Row id of the `categories` table.
pub type CategoryId = i64;

/// Fixed named grouping used to bucket quests and experience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// Unique across all categories.
    pub name: String,
}

/// Running experience total of one avatar in one category.
///
/// Updated incrementally on quest completion transitions, never recomputed
/// from the set of completed quests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarCategory {
    pub avatar_id: AvatarId,
    pub category_id: CategoryId,
    pub exp_points: i64,
}
