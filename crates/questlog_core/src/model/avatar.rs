//! Avatar domain model.

use serde::{Deserialize, Serialize};

/// Row id of the `avatar` table.
pub type AvatarId = i64;

/// The single user profile tracked by the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub id: AvatarId,
    /// Display name; seeded as a placeholder and renamed by the user.
    pub name: String,
    pub level: i64,
    /// Cumulative experience. Per-category totals live in `AvatarCategory`.
    pub experience: i64,
}
