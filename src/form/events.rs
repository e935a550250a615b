//! Input the host feeds into the session.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::models::{OptionItem, RowField, RowIndex};

/// Selected value(s) of a control. Multi-selects send a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    One(String),
    Many(Vec<String>),
}

impl FieldValue {
    /// First selected value, or empty.
    pub fn first(&self) -> &str {
        match self {
            FieldValue::One(value) => value,
            FieldValue::Many(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// All non-empty selected values.
    pub fn into_vec(self) -> Vec<String> {
        let values = match self {
            FieldValue::One(value) => vec![value],
            FieldValue::Many(values) => values,
        };
        values.into_iter().filter(|v| !v.is_empty()).collect()
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::One(value.to_string())
    }
}

/// State of an assignment row already rendered by the server (edit page).
#[derive(Debug, Clone, Deserialize)]
pub struct RowSnapshot {
    pub row: RowIndex,
    #[serde(default)]
    pub point: String,
    #[serde(default)]
    pub personnel_type: String,
    #[serde(default)]
    pub brigades: Vec<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub brigade_options: Vec<OptionItem>,
    #[serde(default)]
    pub role_options: Vec<OptionItem>,
}

/// Something happened on the page.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FormEvent {
    /// Page is ready; carries the initial field values and rows
    Load {
        #[serde(default)]
        values: HashMap<String, String>,
        #[serde(default)]
        rows: Vec<RowSnapshot>,
    },
    /// A top-level field committed a new value (selects, blur)
    FieldChanged { field: String, value: String },
    /// A text field produced `value` after a keystroke's default handling
    Input { field: String, value: String },
    /// A control inside an assignment row changed
    RowChanged {
        row: RowIndex,
        field: RowField,
        value: FieldValue,
    },
    /// A control changed and is only known by its DOM id
    ControlChanged { control_id: String, value: FieldValue },
    /// The delete button of a list row was clicked
    DeleteRequested { entity_id: String },
    /// The confirmation dialog closed
    ConfirmResolved { confirmed: bool },
    Submit,
    /// The clear button was clicked
    Clear,
}

/// Work to resume once the current input event has settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    Uppercase { field: String },
}

/// A continuation and how long the host should wait before resuming it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled {
    pub continuation: Continuation,
    pub delay: Duration,
}
