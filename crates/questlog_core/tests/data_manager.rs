use questlog_core::db::open_db_in_memory;
use questlog_core::{
    Avatar, DataError, DataManager, QuestValidationError, DEFAULT_AVATAR_NAME,
    DEFAULT_CATEGORIES,
};

#[test]
fn open_in_memory_seeds_single_avatar() {
    let manager = DataManager::open_in_memory().unwrap();

    let avatar = manager.get_avatar().unwrap().expect("avatar should be seeded");
    assert_eq!(avatar.name, DEFAULT_AVATAR_NAME);
    assert_eq!(avatar.level, 0);
    assert_eq!(avatar.experience, 0);
}

#[test]
fn get_avatar_is_none_before_seeding() {
    let manager = DataManager::new(open_db_in_memory().unwrap());
    assert!(manager.get_avatar().unwrap().is_none());
}

#[test]
fn seeding_twice_through_manager_keeps_one_row_per_pair() {
    let mut manager = DataManager::open_in_memory().unwrap();
    let report = manager.seed_defaults().unwrap();
    assert!(report.is_noop());

    assert_eq!(count(&manager, "SELECT COUNT(*) FROM avatar;"), 1);
    assert_eq!(
        count(&manager, "SELECT COUNT(*) FROM avatar_category;"),
        DEFAULT_CATEGORIES.len() as i64
    );
}

#[test]
fn update_avatar_name_renames_existing_avatar() {
    let mut manager = DataManager::open_in_memory().unwrap();
    let avatar = seeded_avatar(&manager);

    assert!(manager.update_avatar_name(avatar.id, "Aragorn").unwrap());
    assert_eq!(seeded_avatar(&manager).name, "Aragorn");
}

#[test]
fn update_avatar_name_with_current_name_is_idempotent() {
    let mut manager = DataManager::open_in_memory().unwrap();
    let avatar = seeded_avatar(&manager);

    assert!(manager.update_avatar_name(avatar.id, &avatar.name).unwrap());
    assert_eq!(seeded_avatar(&manager), avatar);
}

#[test]
fn update_avatar_name_returns_false_for_unknown_avatar() {
    let mut manager = DataManager::open_in_memory().unwrap();
    let before = seeded_avatar(&manager);

    assert!(!manager.update_avatar_name(before.id + 100, "Ghost").unwrap());
    assert_eq!(seeded_avatar(&manager), before);
}

#[test]
fn update_avatar_name_ignores_blank_name() {
    let mut manager = DataManager::open_in_memory().unwrap();
    let before = seeded_avatar(&manager);

    assert!(manager.update_avatar_name(before.id, "   ").unwrap());
    assert_eq!(seeded_avatar(&manager).name, before.name);
}

#[test]
fn get_categories_lists_defaults_in_seed_order() {
    let manager = DataManager::open_in_memory().unwrap();

    let names: Vec<String> = manager
        .get_categories()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names, DEFAULT_CATEGORIES);
}

#[test]
fn experience_map_omits_categories_without_row() {
    let manager = DataManager::open_in_memory().unwrap();
    let avatar_id = seeded_avatar(&manager).id;
    manager
        .connection()
        .execute_batch(
            "UPDATE avatar_category SET exp_points = 30
             WHERE category_id = (SELECT id FROM categories WHERE category_name = 'wisdom');
             DELETE FROM avatar_category
             WHERE category_id IN (
                SELECT id FROM categories WHERE category_name IN ('constitution', 'reflexion')
             );",
        )
        .unwrap();

    let experience = manager.get_avatar_experience_by_category(avatar_id).unwrap();

    assert_eq!(experience.len(), 2);
    assert_eq!(experience.get("wisdom"), Some(&30));
    assert_eq!(experience.get("family"), Some(&0));
    assert!(!experience.contains_key("constitution"));
}

#[test]
fn experience_map_is_empty_for_unknown_avatar() {
    let manager = DataManager::open_in_memory().unwrap();
    assert!(manager
        .get_avatar_experience_by_category(999)
        .unwrap()
        .is_empty());
}

#[test]
fn add_quest_with_unknown_category_inserts_nothing() {
    let mut manager = DataManager::open_in_memory().unwrap();
    let avatar_id = seeded_avatar(&manager).id;

    let err = manager
        .add_quest(avatar_id, "Lift weights", "strength", 10, None)
        .unwrap_err();

    assert!(matches!(err, DataError::CategoryNotFound(ref name) if name == "strength"));
    assert!(err.is_not_found());
    assert_eq!(quest_count(&manager), 0);
}

#[test]
fn add_quest_with_unknown_avatar_inserts_nothing() {
    let mut manager = DataManager::open_in_memory().unwrap();

    let err = manager
        .add_quest(404, "Call mom", "family", 5, None)
        .unwrap_err();

    assert!(matches!(err, DataError::AvatarNotFound(404)));
    assert_eq!(quest_count(&manager), 0);
}

#[test]
fn add_quest_rejects_malformed_due_date() {
    let mut manager = DataManager::open_in_memory().unwrap();
    let avatar_id = seeded_avatar(&manager).id;

    let err = manager
        .add_quest(avatar_id, "Meditate", "reflexion", 5, Some("06/01/2025"))
        .unwrap_err();

    assert!(matches!(err, DataError::InvalidDueDate(ref raw) if raw == "06/01/2025"));
    assert_eq!(quest_count(&manager), 0);
}

#[test]
fn add_quest_rejects_blank_title() {
    let mut manager = DataManager::open_in_memory().unwrap();
    let avatar_id = seeded_avatar(&manager).id;

    let err = manager
        .add_quest(avatar_id, "  ", "wisdom", 5, None)
        .unwrap_err();

    assert!(matches!(
        err,
        DataError::Validation(QuestValidationError::BlankTitle)
    ));
    assert_eq!(quest_count(&manager), 0);
}

#[test]
fn add_quest_without_due_date_reads_back_sentinel() {
    let mut manager = DataManager::open_in_memory().unwrap();
    let avatar_id = seeded_avatar(&manager).id;

    let quest_id = manager
        .add_quest(avatar_id, "Run 5k", "constitution", 20, None)
        .unwrap();

    let quests = manager.get_avatar_quests(avatar_id).unwrap();
    assert_eq!(quests.len(), 1);
    assert_eq!(quests[0].id, quest_id);
    assert_eq!(quests[0].due_date, None);
    assert_eq!(quests[0].due_date_label(), "No date");
    assert_eq!(quests[0].category_name, "constitution");
}

#[test]
fn remove_quest_deletes_existing_quest() {
    let mut manager = DataManager::open_in_memory().unwrap();
    let avatar_id = seeded_avatar(&manager).id;
    let quest_id = manager
        .add_quest(avatar_id, "Journal", "reflexion", 5, None)
        .unwrap();

    manager.remove_quest(quest_id).unwrap();

    assert_eq!(quest_count(&manager), 0);
}

#[test]
fn remove_quest_with_unknown_id_reports_failure_and_keeps_table() {
    let mut manager = DataManager::open_in_memory().unwrap();
    let avatar_id = seeded_avatar(&manager).id;
    manager
        .add_quest(avatar_id, "Journal", "reflexion", 5, None)
        .unwrap();

    let err = manager.remove_quest(12_345).unwrap_err();

    assert!(matches!(err, DataError::QuestNotFound(12_345)));
    assert_eq!(quest_count(&manager), 1);
}

#[test]
fn swap_quest_status_returns_none_for_unknown_quest() {
    let mut manager = DataManager::open_in_memory().unwrap();
    assert!(manager.swap_quest_status(77).unwrap().is_none());
}

#[test]
fn swap_quest_status_flips_flag_without_touching_experience() {
    let mut manager = DataManager::open_in_memory().unwrap();
    let avatar_id = seeded_avatar(&manager).id;
    let quest_id = manager
        .add_quest(avatar_id, "Read a chapter", "wisdom", 10, None)
        .unwrap();

    let swapped = manager.swap_quest_status(quest_id).unwrap().unwrap();
    assert!(swapped.completed);
    assert_eq!(swapped.id, quest_id);

    let experience = manager.get_avatar_experience_by_category(avatar_id).unwrap();
    assert_eq!(experience["wisdom"], 0);
}

#[test]
fn read_a_book_end_to_end() {
    let mut manager = DataManager::open_in_memory().unwrap();
    let avatar_id = seeded_avatar(&manager).id;

    manager
        .add_quest(avatar_id, "Read a book", "wisdom", 15, Some("2025-06-01"))
        .unwrap();

    let quests = manager.get_avatar_quests(avatar_id).unwrap();
    assert_eq!(quests.len(), 1);
    let quest = &quests[0];
    assert_eq!(quest.title, "Read a book");
    assert_eq!(quest.due_date_label(), "2025-06-01");
    assert!(!quest.completed);
    assert_eq!(quest.exp_amount, 15);

    manager.swap_quest_status(quest.id).unwrap();
    let total = manager.update_experience(quest.id).unwrap();

    assert_eq!(total, 15);
    let experience = manager.get_avatar_experience_by_category(avatar_id).unwrap();
    assert_eq!(experience["wisdom"], 15);
}

fn seeded_avatar(manager: &DataManager) -> Avatar {
    manager.get_avatar().unwrap().expect("seeded avatar")
}

fn quest_count(manager: &DataManager) -> i64 {
    count(manager, "SELECT COUNT(*) FROM quests;")
}

fn count(manager: &DataManager, sql: &str) -> i64 {
    manager
        .connection()
        .query_row(sql, [], |row| row.get(0))
        .unwrap()
}
