//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into transaction-scoped use-case APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod data_manager;
pub mod reconcile;
