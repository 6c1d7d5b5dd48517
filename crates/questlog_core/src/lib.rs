//! Core domain logic for QuestLog.
//! This crate is the single source of truth for avatar, quest and experience
//! invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{resolve_db_path, SeedReport, DEFAULT_AVATAR_NAME, DEFAULT_CATEGORIES};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::avatar::{Avatar, AvatarId};
pub use model::category::{AvatarCategory, Category, CategoryId};
pub use model::quest::{
    format_due_date, parse_due_date, NewQuest, Quest, QuestId, QuestSummary,
    QuestValidationError, NO_DATE_LABEL,
};
pub use repo::quest_repo::{QuestListQuery, QuestSort};
pub use repo::{RepoError, RepoResult};
pub use service::data_manager::{DataError, DataManager, DataResult, QuestToggle};
pub use service::reconcile::experience_delta;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
