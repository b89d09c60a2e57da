use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TodoId(pub i64);

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A persisted TODO record. `id` and `created_at` are assigned once by the
/// repository and never change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// The record's human-readable label.
    pub fn label(&self) -> &str {
        &self.title
    }

    /// The record's mutable fields, as a draft for a subsequent update.
    pub fn draft(&self) -> TodoDraft {
        TodoDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
            is_resolved: self.is_resolved,
        }
    }
}

/// A validated, not-yet-persisted field set. Produced by
/// `validation::validate`; identity and creation time never pass through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub is_resolved: bool,
}
