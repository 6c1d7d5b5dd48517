//! Quest domain model and its list read model.
//!
//! # Responsibility
//! - Define the stored quest record and the insert request shape.
//! - Define `QuestSummary`, the typed row handed to presentation callers.
//! - Own the `YYYY-MM-DD` due date wire format.
//!
//! # Invariants
//! - New quests always start with `completed = false`.
//! - A quest title must not be blank.
//! - A quest reward can always be negated, so it can be withdrawn again.
//! - Absent due dates render as the `No date` label, never as an empty string.

use crate::model::avatar::AvatarId;
use crate::model::category::CategoryId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Row id of the `quests` table.
pub type QuestId = i64;

/// Format used for due dates exchanged with callers and stored in SQLite.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";
/// Label rendered in place of a missing due date.
pub const NO_DATE_LABEL: &str = "No date";

/// Presence check failures for quest input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestValidationError {
    /// Title is empty or whitespace only.
    BlankTitle,
    /// Reward has no negation in `i64`, so it could never be withdrawn.
    RewardOutOfRange,
}

impl Display for QuestValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "quest title must not be blank"),
            Self::RewardOutOfRange => {
                write!(f, "quest reward must be greater than {}", i64::MIN)
            }
        }
    }
}

impl Error for QuestValidationError {}

/// Stored quest record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub avatar_id: AvatarId,
    pub category_id: CategoryId,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    /// Experience granted to the category when the quest is completed.
    pub exp_amount: i64,
    pub completed: bool,
}

/// Insert request for a quest whose category has already been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuest {
    pub avatar_id: AvatarId,
    pub category_id: CategoryId,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub exp_amount: i64,
}

impl NewQuest {
    pub fn validate(&self) -> Result<(), QuestValidationError> {
        if self.title.trim().is_empty() {
            return Err(QuestValidationError::BlankTitle);
        }
        if self.exp_amount.checked_neg().is_none() {
            return Err(QuestValidationError::RewardOutOfRange);
        }
        Ok(())
    }
}

/// Quest row joined with its category name, as listed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestSummary {
    pub id: QuestId,
    pub title: String,
    pub category_id: CategoryId,
    pub category_name: String,
    pub due_date: Option<NaiveDate>,
    pub exp_amount: i64,
    pub completed: bool,
}

impl QuestSummary {
    /// Renders the due date as `YYYY-MM-DD`, or `No date` when absent.
    pub fn due_date_label(&self) -> String {
        format_due_date(self.due_date)
    }
}

/// Parses a caller-supplied `YYYY-MM-DD` due date.
pub fn parse_due_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), DUE_DATE_FORMAT)
}

/// Formats an optional due date with the `No date` fallback.
pub fn format_due_date(value: Option<NaiveDate>) -> String {
    match value {
        Some(date) => date.format(DUE_DATE_FORMAT).to_string(),
        None => NO_DATE_LABEL.to_string(),
    }
}
