use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::todo::{Todo, TodoDraft};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw form input, exactly as an HTML form posts it: every field optional,
/// every value a string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTodoInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub is_resolved: Option<String>,
}

/// Validation failures keyed by input field name.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0.entry(field.to_string()).or_default().push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

/// Checkbox semantics: a handful of truthy spellings, everything else false.
/// Malformed input is never a validation error.
pub fn parse_checkbox(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "on" | "true" | "1" | "yes")
}

/// Turns raw form input into a draft ready for persistence, or the per-field
/// errors to re-display.
///
/// With `existing` set (edit mode) the draft starts from that record's
/// values: an omitted `description` or `due_date` means "unchanged", while an
/// empty `due_date` string clears the date. `is_resolved` is not merged --
/// an unchecked checkbox posts nothing, which means false.
pub fn validate(input: &RawTodoInput, existing: Option<&Todo>) -> Result<TodoDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = input.title.as_deref().map(str::trim).unwrap_or("");
    if title.is_empty() {
        errors.add("title", "This field is required.");
    }

    let description = match &input.description {
        Some(d) => d.clone(),
        None => existing.map(|t| t.description.clone()).unwrap_or_default(),
    };

    let due_date = match input.due_date.as_deref().map(str::trim) {
        None => existing.and_then(|t| t.due_date),
        Some("") => None,
        Some(raw) => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.add("due_date", "Enter a valid date.");
                None
            }
        },
    };

    let is_resolved = input.is_resolved.as_deref().map(parse_checkbox).unwrap_or(false);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(TodoDraft {
        title: title.to_string(),
        description,
        due_date,
        is_resolved,
    })
}
