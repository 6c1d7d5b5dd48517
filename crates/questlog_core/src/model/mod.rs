//! Domain model for the avatar, its categories and quests.
//!
//! # Responsibility
//! - Define the typed records persisted by core and returned to callers.
//! - Keep presence validation next to the data it guards.
//!
//! # Invariants
//! - Identifiers are SQLite row ids and never reused for another row.
//! - Read models are immutable snapshots; mutation goes through `DataManager`.

pub mod avatar;
pub mod category;
pub mod quest;
