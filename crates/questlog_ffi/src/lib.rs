//! Flutter-facing bindings for the quest log core.

pub mod api;
