use serde::Serialize;

use crate::domain::todo::{Todo, TodoId};
use crate::domain::validation::{parse_checkbox, FieldErrors, RawTodoInput};

/// What a handler decided, independent of any HTTP runtime. The http layer
/// turns these into responses; tests branch on them directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Render(Page),
    Redirect { to: String, notice: Option<String> },
    NotFound,
}

impl Outcome {
    pub fn redirect_home(notice: Option<&str>) -> Self {
        Outcome::Redirect {
            to: "/".to_string(),
            notice: notice.map(String::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home { todos: Vec<Todo> },
    Form { action: FormAction, todo_id: Option<TodoId>, values: FormValues, errors: FieldErrors },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Create,
    Edit,
}

impl FormAction {
    pub fn label(self) -> &'static str {
        match self {
            FormAction::Create => "Create",
            FormAction::Edit => "Edit",
        }
    }
}

/// What the form template echoes back into its inputs: either the record
/// being edited, or the raw submission being re-displayed with errors.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct FormValues {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub is_resolved: bool,
}

impl FormValues {
    pub fn from_input(input: &RawTodoInput) -> Self {
        Self {
            title: input.title.clone().unwrap_or_default(),
            description: input.description.clone().unwrap_or_default(),
            due_date: input.due_date.clone().unwrap_or_default(),
            is_resolved: input.is_resolved.as_deref().map(parse_checkbox).unwrap_or(false),
        }
    }

    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone(),
            due_date: todo.due_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            is_resolved: todo.is_resolved,
        }
    }
}
