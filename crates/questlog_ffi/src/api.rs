//! FFI use-case API for the mobile UI.
//!
//! # Responsibility
//! - Expose the avatar/quest data-access contract to the UI via FRB.
//! - Collapse core errors into plain failure values the UI can render.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens its own connection and drops it before returning.
//! - Failures return `false`, `None`, an empty list or `ok = false`; the core
//!   layer has already logged the cause.

use log::{info, warn};
use questlog_core::db::open_db;
use questlog_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    resolve_db_path, DataManager, DataResult, QuestListQuery, QuestSort, QuestSummary,
};
use std::path::PathBuf;
use std::sync::OnceLock;

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the database file used by every later call.
///
/// Must run before the first data call; afterwards only the same path is
/// accepted. Returns an empty string on success and the error otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        info!("event=db_path_configured module=ffi status=ok");
        String::new()
    } else {
        warn!("event=db_path_configured module=ffi status=error reason=conflict");
        format!(
            "db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Avatar profile as shown on the avatar screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarView {
    pub id: i64,
    pub name: String,
    pub level: i64,
    pub experience: i64,
}

/// One selectable quest category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub id: i64,
    pub name: String,
}

/// Experience bar value for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryExperienceView {
    pub category_name: String,
    pub exp_points: i64,
}

/// One quest list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestView {
    pub id: i64,
    pub title: String,
    pub category_id: i64,
    pub category_name: String,
    /// `YYYY-MM-DD` or `No date`.
    pub due_date: String,
    pub exp_amount: i64,
    pub completed: bool,
}

/// Sort options offered by the quest list menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestSortKey {
    Created,
    DueDate,
    Experience,
}

/// Generic action response envelope for write calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected quest id, when the call targets or creates one.
    pub quest_id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, quest_id: Option<i64>) -> Self {
        Self {
            ok: true,
            quest_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            quest_id: None,
            message: message.into(),
        }
    }
}

/// Creates missing tables and seeds the avatar and default categories.
#[flutter_rust_bridge::frb(sync)]
pub fn app_startup() -> ActionResponse {
    match DataManager::open(resolve_ffi_db_path()) {
        Ok(_) => ActionResponse::success("Storage ready.", None),
        Err(err) => ActionResponse::failure(format!("app_startup failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn get_avatar() -> Option<AvatarView> {
    with_data_manager(|manager| manager.get_avatar())
        .ok()
        .flatten()
        .map(|avatar| AvatarView {
            id: avatar.id,
            name: avatar.name,
            level: avatar.level,
            experience: avatar.experience,
        })
}

/// Renames the avatar; `false` when the avatar does not exist or storage fails.
#[flutter_rust_bridge::frb(sync)]
pub fn update_avatar_name(avatar_id: i64, new_name: String) -> bool {
    with_data_manager(|manager| manager.update_avatar_name(avatar_id, new_name.as_str()))
        .unwrap_or(false)
}

#[flutter_rust_bridge::frb(sync)]
pub fn get_categories() -> Vec<CategoryView> {
    with_data_manager(|manager| manager.get_categories())
        .map(|categories| {
            categories
                .into_iter()
                .map(|category| CategoryView {
                    id: category.id,
                    name: category.name,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Lists experience per category; categories without a row are omitted and
/// should be rendered as zero.
#[flutter_rust_bridge::frb(sync)]
pub fn get_avatar_experience_by_category(avatar_id: i64) -> Vec<CategoryExperienceView> {
    with_data_manager(|manager| manager.get_avatar_experience_by_category(avatar_id))
        .map(|experience| {
            experience
                .into_iter()
                .map(|(category_name, exp_points)| CategoryExperienceView {
                    category_name,
                    exp_points,
                })
                .collect()
        })
        .unwrap_or_default()
}

#[flutter_rust_bridge::frb(sync)]
pub fn get_avatar_quests(avatar_id: i64) -> Vec<QuestView> {
    with_data_manager(|manager| manager.get_avatar_quests(avatar_id))
        .map(to_quest_views)
        .unwrap_or_default()
}

/// Lists quests filtered by free-text search and sorted by the chosen key.
#[flutter_rust_bridge::frb(sync)]
pub fn list_quests(avatar_id: i64, search: Option<String>, sort: QuestSortKey) -> Vec<QuestView> {
    let query = QuestListQuery {
        search,
        sort: match sort {
            QuestSortKey::Created => QuestSort::Id,
            QuestSortKey::DueDate => QuestSort::DueDate,
            QuestSortKey::Experience => QuestSort::Experience,
        },
    };
    with_data_manager(|manager| manager.list_quests(avatar_id, &query))
        .map(to_quest_views)
        .unwrap_or_default()
}

/// Creates a quest. `due_date` is `YYYY-MM-DD` or `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn add_quest(
    avatar_id: i64,
    title: String,
    category_name: String,
    exp_amount: i64,
    due_date: Option<String>,
) -> ActionResponse {
    let due_date = due_date.filter(|value| !value.trim().is_empty());
    match with_data_manager(|manager| {
        manager.add_quest(
            avatar_id,
            title.trim(),
            category_name.as_str(),
            exp_amount,
            due_date.as_deref(),
        )
    }) {
        Ok(quest_id) => ActionResponse::success("Quest added.", Some(quest_id)),
        Err(err) => ActionResponse::failure(format!("add_quest failed: {err}")),
    }
}

/// Deletes a quest without adjusting experience.
#[flutter_rust_bridge::frb(sync)]
pub fn remove_quest(quest_id: i64) -> bool {
    with_data_manager(|manager| manager.remove_quest(quest_id)).is_ok()
}

/// Flips the completed flag only; follow with `update_experience`.
#[flutter_rust_bridge::frb(sync)]
pub fn swap_quest_status(quest_id: i64) -> Option<QuestView> {
    with_data_manager(|manager| manager.swap_quest_status(quest_id))
        .ok()
        .flatten()
        .map(to_quest_view)
}

/// Applies the quest reward according to its stored completed flag.
#[flutter_rust_bridge::frb(sync)]
pub fn update_experience(quest_id: i64) -> bool {
    with_data_manager(|manager| manager.update_experience(quest_id)).is_ok()
}

/// Flips the completed flag and reconciles experience atomically.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_quest_completion(quest_id: i64) -> ActionResponse {
    match with_data_manager(|manager| manager.toggle_quest_completion(quest_id)) {
        Ok(toggle) => ActionResponse::success(
            if toggle.quest.completed {
                "Quest completed."
            } else {
                "Quest reopened."
            },
            Some(quest_id),
        ),
        Err(err) => ActionResponse::failure(format!("toggle_quest_completion failed: {err}")),
    }
}

/// Deletes a quest after withdrawing its reward if it was completed.
#[flutter_rust_bridge::frb(sync)]
pub fn remove_quest_reconciled(quest_id: i64) -> bool {
    with_data_manager(|manager| manager.remove_quest_reconciled(quest_id)).is_ok()
}

fn resolve_ffi_db_path() -> PathBuf {
    DB_PATH.get_or_init(resolve_db_path).clone()
}

fn with_data_manager<T>(f: impl FnOnce(&mut DataManager) -> DataResult<T>) -> DataResult<T> {
    let conn = open_db(resolve_ffi_db_path())?;
    let mut manager = DataManager::new(conn);
    f(&mut manager)
}

fn to_quest_views(quests: Vec<QuestSummary>) -> Vec<QuestView> {
    quests.into_iter().map(to_quest_view).collect()
}

fn to_quest_view(quest: QuestSummary) -> QuestView {
    QuestView {
        due_date: quest.due_date_label(),
        id: quest.id,
        title: quest.title,
        category_id: quest.category_id,
        category_name: quest.category_name,
        exp_amount: quest.exp_amount,
        completed: quest.completed,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        add_quest, app_startup, configure_db_path, core_version, get_avatar,
        get_avatar_experience_by_category, get_avatar_quests, get_categories, init_logging,
        list_quests, ping, remove_quest, remove_quest_reconciled, swap_quest_status,
        toggle_quest_completion, update_avatar_name, update_experience, QuestSortKey,
    };
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEST_DB: OnceLock<tempfile::TempDir> = OnceLock::new();

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/questlog-logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_db_path_rejects_blank_and_conflicting_paths() {
        ready_db();
        assert!(!configure_db_path("  ".to_string()).is_empty());
        assert!(!configure_db_path("/somewhere/else.db".to_string()).is_empty());
    }

    #[test]
    fn startup_seeds_avatar_and_categories() {
        ready_db();
        let avatar = get_avatar().expect("avatar should be seeded");
        assert!(!avatar.name.is_empty());

        let names: Vec<String> = get_categories().into_iter().map(|c| c.name).collect();
        for expected in ["wisdom", "constitution", "reflexion", "family"] {
            assert!(names.iter().any(|name| name == expected));
        }
    }

    #[test]
    fn add_quest_with_unknown_category_fails() {
        ready_db();
        let avatar = get_avatar().unwrap();
        let response = add_quest(
            avatar.id,
            unique_token("unknown-category"),
            "no such category".to_string(),
            10,
            None,
        );
        assert!(!response.ok);
        assert!(response.quest_id.is_none());
        assert!(response.message.contains("category"));
    }

    #[test]
    fn added_quest_shows_up_in_list_with_date_label() {
        ready_db();
        let avatar = get_avatar().unwrap();
        let title = unique_token("dated-quest");
        let response = add_quest(
            avatar.id,
            title.clone(),
            "wisdom".to_string(),
            15,
            Some("2025-06-01".to_string()),
        );
        assert!(response.ok, "{}", response.message);
        let quest_id = response.quest_id.unwrap();

        let quest = get_avatar_quests(avatar.id)
            .into_iter()
            .find(|quest| quest.id == quest_id)
            .expect("quest should be listed");
        assert_eq!(quest.title, title);
        assert_eq!(quest.due_date, "2025-06-01");
        assert!(!quest.completed);

        let searched = list_quests(avatar.id, Some(title.to_uppercase()), QuestSortKey::DueDate);
        assert_eq!(searched.len(), 1);
        assert!(remove_quest(quest_id));
        assert!(!remove_quest(quest_id));
    }

    #[test]
    fn two_step_and_atomic_toggles_keep_quest_state_in_sync() {
        ready_db();
        let avatar = get_avatar().unwrap();
        let response = add_quest(
            avatar.id,
            unique_token("toggle-quest"),
            "family".to_string(),
            10,
            Some("   ".to_string()),
        );
        assert!(response.ok, "{}", response.message);
        let quest_id = response.quest_id.unwrap();

        let swapped = swap_quest_status(quest_id).expect("quest should exist");
        assert!(swapped.completed);
        assert_eq!(swapped.due_date, "No date");
        assert!(update_experience(quest_id));

        let toggled = toggle_quest_completion(quest_id);
        assert!(toggled.ok, "{}", toggled.message);
        assert_eq!(toggled.message, "Quest reopened.");

        assert!(remove_quest_reconciled(quest_id));
        assert!(swap_quest_status(quest_id).is_none());
        assert!(!update_experience(quest_id));
        assert!(!get_avatar_experience_by_category(avatar.id).is_empty());
    }

    #[test]
    fn update_avatar_name_returns_false_for_unknown_avatar() {
        ready_db();
        assert!(!update_avatar_name(i64::MAX, "Nobody".to_string()));
    }

    fn ready_db() {
        TEST_DB.get_or_init(|| {
            let dir = tempfile::tempdir().expect("temp dir");
            let path = dir.path().join("questlog-ffi.db");
            let error = configure_db_path(path.to_string_lossy().into_owned());
            assert!(error.is_empty(), "{error}");
            let startup = app_startup();
            assert!(startup.ok, "{}", startup.message);
            dir
        });
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
