//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `questlog_core` linkage and storage.
//! - Keep output deterministic for quick local sanity checks.

use log::error;
use questlog_core::logging::init_logging_from_env;
use questlog_core::{resolve_db_path, DataManager, DataResult};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("questlog_core ping={}", questlog_core::ping());
    println!("questlog_core version={}", questlog_core::core_version());

    if let Err(err) = init_logging_from_env() {
        eprintln!("logging disabled: {err}");
    }

    let db_path = resolve_db_path();
    println!("db_path={}", db_path.display());
    match report(DataManager::open(&db_path)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_probe module=cli status=error error={err}");
            eprintln!("storage probe failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn report(manager: DataResult<DataManager>) -> DataResult<()> {
    let manager = manager?;
    let Some(avatar) = manager.get_avatar()? else {
        println!("avatar=<none>");
        return Ok(());
    };
    println!("avatar name={} level={}", avatar.name, avatar.level);

    let experience = manager.get_avatar_experience_by_category(avatar.id)?;
    for category in manager.get_categories()? {
        let points = experience.get(&category.name).copied().unwrap_or(0);
        println!("category {}={}", category.name, points);
    }

    let quests = manager.get_avatar_quests(avatar.id)?;
    let open = quests.iter().filter(|quest| !quest.completed).count();
    println!("quests total={} open={}", quests.len(), open);
    Ok(())
}
